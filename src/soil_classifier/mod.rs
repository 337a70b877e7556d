#[cfg(test)]
pub mod impl_fake;
pub mod impl_tract_onnx;
pub mod interface;
pub mod model_loader;
pub mod models;
pub mod tract;
