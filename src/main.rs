use config::Config;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use soil_app::main::SoilApp;
use soil_classifier::model_loader::ModelLoader;
use std::sync::Arc;

mod config;
mod error;
mod library;
mod prediction;
mod soil_app;
mod soil_class;
mod soil_classifier;
mod upload;

const APP_TITLE: &str = "Klasifikasi Jenis Tanah";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let model_loader = Arc::new(ModelLoader::new(config.model.clone(), logger.clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(config.window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let _ = logger.info(&format!(
        "Starting with model {}",
        config.model.onnx_model_path.display()
    ));

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            Box::new(SoilApp::new(
                config,
                logger,
                model_loader,
                cc.egui_ctx.clone(),
            ))
        }),
    )?;

    Ok(())
}
