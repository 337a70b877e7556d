use crate::config::Config;
use crate::prediction::{format_percent, Prediction};
use crate::soil_app::core::State;
use crate::soil_class::SoilClass;
use crate::upload::Upload;
use image::DynamicImage;
use std::sync::Arc;

const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(46, 160, 67);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(218, 54, 51);
const INFO_COLOR: egui::Color32 = egui::Color32::from_rgb(56, 139, 253);

/// Things the user asked for during this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    PickFile,
    RetryModelLoad,
    ClearUpload,
}

pub struct Render {
    config: Config,
    preview: Option<(u64, egui::TextureHandle)>,
}

impl Render {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            preview: None,
        }
    }

    pub fn render(&mut self, ctx: &egui::Context, state: &State) -> Vec<UiAction> {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("🌱 Klasifikasi Citra Jenis Tanah");
                ui.label("Upload foto tanah untuk mengetahui jenis tanahnya!");
                ui.add_space(8.0);

                if !self.render_model_status(ui, state, &mut actions) {
                    return;
                }

                self.render_upload_controls(ui, state, &mut actions);
                ui.add_space(8.0);
                self.render_session(ctx, ui, state);

                ui.add_space(12.0);
                render_help(ui);
                ui.separator();
            });
        });

        actions
    }

    /// Returns false when nothing below the model status should be drawn.
    fn render_model_status(
        &self,
        ui: &mut egui::Ui,
        state: &State,
        actions: &mut Vec<UiAction>,
    ) -> bool {
        match state {
            State::LoadingModel => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Memuat model...");
                });
                false
            }
            State::ModelUnavailable { message, hint } => {
                ui.colored_label(ERROR_COLOR, format!("❌ {}", message));
                if let Some(hint) = hint {
                    ui.colored_label(INFO_COLOR, hint);
                }
                ui.colored_label(
                    ERROR_COLOR,
                    "❌ Model tidak dapat dimuat. Silakan coba lagi nanti.",
                );
                if ui.button("Coba lagi").clicked() {
                    actions.push(UiAction::RetryModelLoad);
                }
                false
            }
            _ => {
                ui.colored_label(SUCCESS_COLOR, "✅ Model berhasil dimuat!");
                true
            }
        }
    }

    fn render_upload_controls(
        &self,
        ui: &mut egui::Ui,
        state: &State,
        actions: &mut Vec<UiAction>,
    ) {
        let formats = self
            .config
            .accepted_extensions
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");

        ui.horizontal(|ui| {
            if ui
                .button("Pilih foto tanah")
                .on_hover_text(format!("Format yang didukung: {}", formats))
                .clicked()
            {
                actions.push(UiAction::PickFile);
            }
            if !matches!(state, State::Idle) && ui.button("Hapus").clicked() {
                actions.push(UiAction::ClearUpload);
            }
        });
        ui.small(format!("atau seret file ke jendela ini ({})", formats));
    }

    fn render_session(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, state: &State) {
        match state {
            State::Decoding { upload } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Membuka {}...", upload.file_name));
                });
            }
            State::Analyzing { upload, image } => {
                let texture = self.preview_texture(ctx, upload, image);
                ui.columns(2, |columns| {
                    render_preview(&mut columns[0], &texture);
                    columns[1].horizontal(|ui| {
                        ui.spinner();
                        ui.label("Menganalisis gambar...");
                    });
                });
            }
            State::Done {
                upload,
                image,
                prediction,
            } => {
                let texture = self.preview_texture(ctx, upload, image);
                ui.columns(2, |columns| {
                    render_preview(&mut columns[0], &texture);
                    render_prediction(&mut columns[1], prediction);
                });
            }
            State::Failed {
                upload,
                image,
                message,
            } => {
                if let (Some(upload), Some(image)) = (upload, image) {
                    let texture = self.preview_texture(ctx, upload, image);
                    render_preview(ui, &texture);
                }
                ui.colored_label(ERROR_COLOR, format!("❌ {}", message));
            }
            _ => {
                self.preview = None;
            }
        }
    }

    /// One texture per upload, rebuilt only when a new upload arrives.
    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        upload: &Upload,
        image: &Arc<DynamicImage>,
    ) -> egui::TextureHandle {
        if let Some((id, texture)) = &self.preview {
            if *id == upload.id {
                return texture.clone();
            }
        }

        let color_image = to_color_image(image, self.config.preview_max_side);
        let texture = ctx.load_texture(
            format!("preview-{}", upload.id),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.preview = Some((upload.id, texture.clone()));
        texture
    }
}

pub fn to_color_image(image: &DynamicImage, max_side: u32) -> egui::ColorImage {
    let image = if image.width() > max_side || image.height() > max_side {
        image.thumbnail(max_side, max_side)
    } else {
        image.clone()
    };
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];

    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

fn render_preview(ui: &mut egui::Ui, texture: &egui::TextureHandle) {
    let max_width = ui.available_width();
    ui.add(
        egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
            .max_width(max_width),
    );
    ui.small("Foto yang diunggah");
}

fn render_prediction(ui: &mut egui::Ui, prediction: &Prediction) {
    ui.colored_label(SUCCESS_COLOR, "✅ Analisis selesai!");
    ui.label(egui::RichText::new(prediction.headline()).strong());
    ui.label(egui::RichText::new(prediction.confidence_text()).strong());

    let confidence = prediction.confidence().clamp(0.0, 1.0);
    ui.add(egui::ProgressBar::new(confidence).text(format_percent(confidence)));

    egui::CollapsingHeader::new("Lihat detail probabilitas")
        .default_open(false)
        .show(ui, |ui| {
            for class_probability in prediction.breakdown() {
                ui.label(class_probability.to_display_string());
            }
        });
}

fn render_help(ui: &mut egui::Ui) {
    egui::CollapsingHeader::new("ℹ️ Informasi Aplikasi")
        .default_open(false)
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Cara Menggunakan:").strong());
            ui.label("1. Upload foto tanah menggunakan tombol di atas");
            ui.label("2. Tunggu proses analisis selesai");
            ui.label("3. Lihat hasil prediksi dan tingkat confidence");
            ui.add_space(6.0);

            ui.label(egui::RichText::new("Jenis Tanah yang Dapat Dideteksi:").strong());
            for row in SoilClass::ALL.chunks(4) {
                let names = row.iter().map(|c| c.label()).collect::<Vec<_>>();
                ui.label(format!("- {}", names.join(", ")));
            }
            ui.add_space(6.0);

            ui.label(egui::RichText::new("Tips untuk Hasil Terbaik:").strong());
            ui.label("- Gunakan foto dengan pencahayaan yang baik");
            ui.label("- Pastikan tanah terlihat jelas");
            ui.label("- Hindari bayangan atau pantulan");
        });
}
