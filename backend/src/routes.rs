use actix_cors::Cors;
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError, web};
use futures::TryStreamExt;
use log::{error, warn};
use shared::ErrorResponse;

use crate::inference::{self, Classifier, InferenceError};

pub const LIVENESS_MESSAGE: &str = "✅ AI Health Companion Backend is Running!";
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image uploaded")]
    MissingImage,
    #[error("Image exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("Malformed multipart payload: {0}")]
    Multipart(MultipartError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        match err {
            // Not a multipart form at all, so there is no image field either.
            MultipartError::ContentTypeMissing | MultipartError::ContentTypeIncompatible => {
                ApiError::MissingImage
            }
            other => ApiError::Multipart(other),
        }
    }
}

impl ApiError {
    fn client_message(&self) -> &'static str {
        match self {
            ApiError::MissingImage => "No image uploaded",
            ApiError::PayloadTooLarge(_) => "Image too large",
            ApiError::Multipart(_) => "Malformed multipart payload",
            ApiError::Inference(InferenceError::Decode(_)) => "Invalid image file",
            ApiError::Inference(_) => "Model inference failed",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage
            | ApiError::Multipart(_)
            | ApiError::Inference(InferenceError::Decode(_)) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.client_message().to_string(),
        })
    }
}

pub fn cors(max_age: usize) -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(max_age)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/upload").route(web::post().to(upload_image)));
}

async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_MESSAGE)
}

async fn upload_image(
    classifier: web::Data<dyn Classifier>,
    limits: web::Data<UploadLimits>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let image_data = read_image_field(&mut payload, limits.max_bytes)
        .await?
        .ok_or(ApiError::MissingImage)?;

    let report = inference::analyze(classifier.get_ref(), &image_data, &mut rand::rng())
        .inspect_err(|e| match e {
            InferenceError::Decode(err) => warn!("Rejected upload: {}", err),
            other => error!("Model inference error: {}", other),
        })?;

    Ok(HttpResponse::Ok().json(report))
}

/// Collects the bytes of the first `image` field. Every other field is drained
/// and discarded.
async fn read_image_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<Vec<u8>>, ApiError> {
    let mut image = None;

    while let Some(mut field) = payload.try_next().await? {
        let wanted = image.is_none() && field.name() == Some(IMAGE_FIELD);
        let mut data = Vec::new();

        while let Some(chunk) = field.try_next().await? {
            if !wanted {
                continue;
            }
            if data.len() + chunk.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }

        if wanted {
            image = Some(data);
        }
    }

    Ok(image)
}
