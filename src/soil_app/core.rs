use crate::config::Config;
use crate::error::SoilError;
use crate::prediction::Prediction;
use crate::upload::Upload;
use image::DynamicImage;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum State {
    LoadingModel,
    ModelUnavailable {
        message: String,
        hint: Option<String>,
    },
    Idle,
    Decoding {
        upload: Upload,
    },
    Analyzing {
        upload: Upload,
        image: Arc<DynamicImage>,
    },
    Done {
        upload: Upload,
        image: Arc<DynamicImage>,
        prediction: Prediction,
    },
    Failed {
        upload: Option<Upload>,
        image: Option<Arc<DynamicImage>>,
        message: String,
    },
}

impl State {
    /// True once the model is loaded and uploads are accepted.
    pub fn is_ready(&self) -> bool {
        !matches!(
            self,
            State::LoadingModel | State::ModelUnavailable { .. }
        )
    }

    fn current_upload_id(&self) -> Option<u64> {
        match self {
            State::Decoding { upload }
            | State::Analyzing { upload, .. }
            | State::Done { upload, .. } => Some(upload.id),
            State::Failed {
                upload: Some(upload),
                ..
            } => Some(upload.id),
            _ => None,
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            State::LoadingModel => "LoadingModel".to_string(),
            State::ModelUnavailable { message, .. } => format!("ModelUnavailable({})", message),
            State::Idle => "Idle".to_string(),
            State::Decoding { upload } => format!("Decoding({})", upload.file_name),
            State::Analyzing { upload, .. } => format!("Analyzing({})", upload.file_name),
            State::Done {
                upload, prediction, ..
            } => format!(
                "Done({}, {}, {:.3})",
                upload.file_name,
                prediction.predicted_class(),
                prediction.confidence()
            ),
            State::Failed { message, .. } => format!("Failed({})", message),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ModelLoadDone(Result<(), SoilError>),
    RetryModelLoad,
    UploadSelected(Upload),
    UploadReadFailed(SoilError),
    DecodeDone {
        upload_id: u64,
        result: Result<Arc<DynamicImage>, SoilError>,
    },
    ClassifyDone {
        upload_id: u64,
        result: Result<Prediction, SoilError>,
    },
    ClearUpload,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::UploadSelected(upload) => format!("UploadSelected({:?})", upload),
            Event::DecodeDone {
                upload_id,
                result: Ok(image),
            } => format!(
                "DecodeDone({}, Ok({}x{}))",
                upload_id,
                image.width(),
                image.height()
            ),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadModel,
    DecodeUpload { upload: Upload },
    ClassifyImage { upload_id: u64, image: Arc<DynamicImage> },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::LoadModel => "LoadModel".to_string(),
            Effect::DecodeUpload { upload } => format!("DecodeUpload({:?})", upload),
            Effect::ClassifyImage { upload_id, .. } => format!("ClassifyImage({})", upload_id),
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::LoadingModel, vec![Effect::LoadModel])
}

fn model_unavailable(error: &SoilError) -> State {
    let hint = match error {
        SoilError::ModelNotFound { path } => Some(format!(
            "Pastikan file {} ada di folder yang sama dengan aplikasi",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        )),
        _ => None,
    };

    State::ModelUnavailable {
        message: error.to_string(),
        hint,
    }
}

fn processing_failed(
    upload: Option<Upload>,
    image: Option<Arc<DynamicImage>>,
    error: &SoilError,
) -> State {
    State::Failed {
        upload,
        image,
        message: format!("Error dalam memproses gambar: {}", error),
    }
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    // Results for an upload the user has already replaced are dropped.
    match &event {
        Event::DecodeDone { upload_id, .. } | Event::ClassifyDone { upload_id, .. }
            if state.current_upload_id() != Some(*upload_id) =>
        {
            return (state, vec![]);
        }
        _ => {}
    }

    match (state, event) {
        // Model lifecycle
        (State::LoadingModel, Event::ModelLoadDone(Ok(()))) => (State::Idle, vec![]),
        (State::LoadingModel, Event::ModelLoadDone(Err(e))) => (model_unavailable(&e), vec![]),
        (State::ModelUnavailable { .. }, Event::RetryModelLoad) => {
            (State::LoadingModel, vec![Effect::LoadModel])
        }

        // Uploads
        (state, Event::UploadSelected(upload)) if state.is_ready() => {
            match upload.validate(&config.accepted_extensions) {
                Ok(()) => (
                    State::Decoding {
                        upload: upload.clone(),
                    },
                    vec![Effect::DecodeUpload { upload }],
                ),
                Err(e) => (processing_failed(Some(upload), None, &e), vec![]),
            }
        }
        (state, Event::UploadReadFailed(e)) if state.is_ready() => {
            (processing_failed(None, None, &e), vec![])
        }
        (state, Event::ClearUpload) if state.is_ready() => (State::Idle, vec![]),

        // Analysis
        (State::Decoding { upload }, Event::DecodeDone { result, .. }) => match result {
            Ok(image) => {
                let upload_id = upload.id;
                (
                    State::Analyzing {
                        upload,
                        image: Arc::clone(&image),
                    },
                    vec![Effect::ClassifyImage { upload_id, image }],
                )
            }
            Err(e) => (processing_failed(Some(upload), None, &e), vec![]),
        },
        (State::Analyzing { upload, image }, Event::ClassifyDone { result, .. }) => match result {
            Ok(prediction) => (
                State::Done {
                    upload,
                    image,
                    prediction,
                },
                vec![],
            ),
            Err(e) if e.is_model_error() => (model_unavailable(&e), vec![]),
            Err(e) => (processing_failed(Some(upload), Some(image), &e), vec![]),
        },

        // Default case
        (state, _) => (state, vec![]),
    }
}
