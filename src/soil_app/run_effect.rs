use crate::error::SoilError;
use crate::library::logger::interface::Logger;
use crate::soil_app::core::{Effect, Event};
use crate::soil_classifier::model_loader::ModelLoader;
use image::error::{DecodingError, ImageFormatHint};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;

type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    model_loader: Arc<ModelLoader>,
    event_sender: Sender<Event>,
    waker: Option<Waker>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<ModelLoader>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("effect"),
            model_loader,
            event_sender,
            waker: None,
        }
    }

    /// Called after every event is sent, so the window can repaint right away.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }

    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.error("Event receiver dropped");
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    /// Runs `work`, turning a panic into the error built by `on_panic` so the
    /// result event is always sent.
    fn guarded<T>(
        &self,
        work: impl FnOnce() -> Result<T, SoilError>,
        on_panic: impl FnOnce(String) -> SoilError,
    ) -> Result<T, SoilError> {
        catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            let _ = self.logger.error(&format!("Effect panicked: {}", message));
            Err(on_panic(message))
        })
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::LoadModel => {
                let loaded = self.guarded(
                    || self.model_loader.load().map(|_| ()),
                    SoilError::ModelLoad,
                );
                self.send(Event::ModelLoadDone(loaded));
            }
            Effect::DecodeUpload { upload } => {
                let decoded = self
                    .guarded(
                        || upload.decode(),
                        |message| {
                            SoilError::ImageDecode(image::ImageError::Decoding(
                                DecodingError::new(ImageFormatHint::Unknown, message),
                            ))
                        },
                    )
                    .map(Arc::new);
                if let Err(e) = &decoded {
                    let _ = self
                        .logger
                        .error(&format!("Decoding {} failed: {}", upload.file_name, e));
                }
                self.send(Event::DecodeDone {
                    upload_id: upload.id,
                    result: decoded,
                });
            }
            Effect::ClassifyImage { upload_id, image } => {
                let classified = self.guarded(
                    || {
                        self.model_loader
                            .load()
                            .and_then(|classifier| classifier.classify(&image))
                    },
                    SoilError::Inference,
                );
                if let Err(e) = &classified {
                    let _ = self.logger.error(&format!("Classification failed: {}", e));
                }
                self.send(Event::ClassifyDone {
                    upload_id,
                    result: classified,
                });
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
