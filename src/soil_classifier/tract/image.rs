use image::{imageops, DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Stretches to exactly `width`x`height`; the aspect ratio is not preserved.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, imageops::FilterType::CatmullRom)
}

/// Drops alpha (without compositing) and expands grayscale, so every mode ends up as RGB8.
pub fn to_rgb(image: &DynamicImage) -> RgbImage {
    image.to_rgb8()
}

/// NHWC tensor of shape `[1, height, width, 3]` with channels scaled to `[0, 1]`.
pub fn image_to_tensor(rgb: &RgbImage) -> Tensor {
    let (width, height) = rgb.dimensions();

    tract_ndarray::Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            pixel[c] as f32 / 255.0
        },
    )
    .into_tensor()
}

pub fn resize_image_to_tensor(image: &DynamicImage, width: u32, height: u32) -> Tensor {
    let resized = resize_image(image, width, height);
    let rgb = to_rgb(&resized);

    image_to_tensor(&rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, Rgba};

    const SIZE: usize = 299;

    fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_landscape_photo_is_stretched_to_input_shape() {
        let image = solid_rgb(640, 480, [200, 150, 100]);

        let tensor = resize_image_to_tensor(&image, 299, 299);

        assert_eq!(tensor.shape(), &[1, SIZE, SIZE, 3]);
    }

    #[test]
    fn test_values_are_in_unit_range() {
        let mut img = ImageBuffer::new(37, 91);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 7) as u8, (y * 3) as u8, ((x + y) % 256) as u8]);
        }
        let image = DynamicImage::ImageRgb8(img);

        let tensor = resize_image_to_tensor(&image, 299, 299);
        let slice = tensor.as_slice::<f32>().unwrap();

        assert_eq!(slice.len(), SIZE * SIZE * 3);
        assert!(slice.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_rgba_input_loses_alpha_channel() {
        let img = ImageBuffer::from_pixel(120, 80, Rgba([255u8, 0, 0, 10]));
        let image = DynamicImage::ImageRgba8(img);

        let tensor = resize_image_to_tensor(&image, 299, 299);
        assert_eq!(tensor.shape(), &[1, SIZE, SIZE, 3]);

        // alpha is dropped, not blended
        let img = ImageBuffer::from_pixel(299, 299, Rgba([255u8, 0, 0, 10]));
        let tensor = resize_image_to_tensor(&DynamicImage::ImageRgba8(img), 299, 299);
        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(&slice[0..3], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_grayscale_input_is_expanded_to_rgb() {
        let img: GrayImage = ImageBuffer::from_pixel(50, 50, Luma([64u8]));
        let image = DynamicImage::ImageLuma8(img);

        let tensor = resize_image_to_tensor(&image, 299, 299);
        assert_eq!(tensor.shape(), &[1, SIZE, SIZE, 3]);

        let slice = tensor.as_slice::<f32>().unwrap();
        let expected = 64.0 / 255.0;
        assert!(slice[0..3].iter().all(|v| (v - expected).abs() < 0.0001));
    }

    #[test]
    fn test_channels_are_interleaved_per_pixel() {
        let image = solid_rgb(299, 299, [255, 128, 0]);

        let tensor = resize_image_to_tensor(&image, 299, 299);
        let slice = tensor.as_slice::<f32>().unwrap();

        // NHWC: pixel (0, 0) occupies the first three values
        assert_eq!(slice[0], 1.0);
        assert!((slice[1] - 128.0 / 255.0).abs() < 0.0001);
        assert_eq!(slice[2], 0.0);

        // last pixel
        let last = (SIZE * SIZE - 1) * 3;
        assert_eq!(slice[last], 1.0);
        assert_eq!(slice[last + 2], 0.0);
    }

    #[test]
    fn test_preprocessing_is_deterministic() {
        let image = solid_rgb(333, 222, [10, 20, 30]);

        let a = resize_image_to_tensor(&image, 299, 299);
        let b = resize_image_to_tensor(&image, 299, 299);

        assert_eq!(a.as_slice::<f32>().unwrap(), b.as_slice::<f32>().unwrap());
    }

    #[test]
    fn test_tiny_image_is_upscaled() {
        let image = solid_rgb(1, 1, [0, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 299, 299);

        assert_eq!(tensor.shape(), &[1, SIZE, SIZE, 3]);
        assert!(tensor.as_slice::<f32>().unwrap().iter().all(|v| *v == 0.0));
    }
}
