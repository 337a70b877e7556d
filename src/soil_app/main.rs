use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::soil_app::core::{init, transition, Event, State};
use crate::soil_app::render::{Render, UiAction};
use crate::soil_app::run_effect::RunEffect;
use crate::soil_classifier::model_loader::ModelLoader;
use crate::upload::Upload;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

pub struct SoilApp {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    state: State,
    event_receiver: Receiver<Event>,
    run_effect: RunEffect,
    render: Render,
    next_upload_id: u64,
}

impl SoilApp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<ModelLoader>,
        ctx: egui::Context,
    ) -> Self {
        let logger = logger.with_namespace("app");
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(logger.clone(), model_loader, event_sender)
            .with_waker(move || ctx.request_repaint());

        let (state, effects) = init();
        run_effect.spawn_effects(effects);

        Self {
            render: Render::new(config.clone()),
            config,
            logger,
            state,
            event_receiver,
            run_effect,
            next_upload_id: 0,
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        let _ = self.logger.info(&format!(
            "{} + {}",
            self.state.to_display_string(),
            event.to_display_string()
        ));

        let (new_state, effects) = transition(&self.config, self.state.clone(), event);

        let _ = self.logger.info(&format!(
            "-> {} {:?}",
            new_state.to_display_string(),
            effects
                .iter()
                .map(|effect| effect.to_display_string())
                .collect::<Vec<_>>()
        ));

        self.state = new_state;
        self.run_effect.spawn_effects(effects);
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dispatch(event);
        }
    }

    fn next_upload_id(&mut self) -> u64 {
        self.next_upload_id += 1;
        self.next_upload_id
    }

    fn upload_from_path(&mut self, path: &Path) {
        let id = self.next_upload_id();
        let event = match Upload::from_path(id, path) {
            Ok(upload) => Event::UploadSelected(upload),
            Err(e) => Event::UploadReadFailed(e),
        };
        self.dispatch(event);
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());

        // Single-image tool: only the last dropped file counts.
        let Some(file) = dropped.into_iter().last() else {
            return;
        };

        match (file.bytes, file.path) {
            (Some(bytes), _) => {
                let id = self.next_upload_id();
                self.dispatch(Event::UploadSelected(Upload::new(id, file.name, bytes)));
            }
            (None, Some(path)) => self.upload_from_path(&path),
            (None, None) => {}
        }
    }

    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Pilih foto tanah")
            .add_filter("Foto tanah", self.config.accepted_extensions.as_slice())
            .pick_file();

        if let Some(path) = picked {
            self.upload_from_path(&path);
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::PickFile => self.pick_file(),
            UiAction::RetryModelLoad => self.dispatch(Event::RetryModelLoad),
            UiAction::ClearUpload => self.dispatch(Event::ClearUpload),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[cfg(test)]
    pub fn pump(&mut self, timeout: std::time::Duration) -> bool {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(_) => false,
        }
    }
}

impl eframe::App for SoilApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        if self.state.is_ready() {
            self.collect_dropped_files(ctx);
        }

        let actions = self.render.render(ctx, &self.state);
        for action in actions {
            self.handle_action(action);
        }
    }
}
