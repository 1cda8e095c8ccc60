use actix_multipart::form::{bytes::Bytes, MultipartForm};
use actix_web::{web, HttpResponse, Responder};

use crate::{
    entities::media::{DeleteMediaRequest, DeleteMediaResponse, DestroyOutcome, MediaFile},
    errors::{AppError, MediaError},
    use_cases::extractors::AuthIdentity,
    AppState,
};

#[derive(MultipartForm)]
pub struct UploadForm {
    pub my_file: Bytes,
}

pub async fn upload(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let file = MediaFile {
        data: form.my_file.data.to_vec(),
        content_type: form.my_file.content_type.map(|mime| mime.to_string()),
        file_name: form.my_file.file_name,
    };
    tracing::debug!(subject = %identity.0.subject, "Upload requested");

    match state.media_handler.upload(file).await {
        Ok(uploaded) => HttpResponse::Ok().json(uploaded),
        Err(e) => AppError::from(e).to_http_response(),
    }
}

pub async fn delete(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    request: web::Json<DeleteMediaRequest>,
) -> impl Responder {
    tracing::debug!(subject = %identity.0.subject, public_id = %request.public_id, "Media delete requested");

    match state.media_handler.delete(&request.public_id).await {
        Ok(DestroyOutcome::Deleted) => HttpResponse::Ok().json(DeleteMediaResponse {
            success: true,
            message: None,
        }),
        Ok(DestroyOutcome::NotDeleted(_)) => HttpResponse::BadRequest().json(DeleteMediaResponse {
            success: false,
            message: Some("Image deletion failed".to_string()),
        }),
        Err(MediaError::InvalidInput(msg)) => HttpResponse::BadRequest().json(DeleteMediaResponse {
            success: false,
            message: Some(msg),
        }),
        Err(MediaError::NotConfigured) => HttpResponse::ServiceUnavailable().json(DeleteMediaResponse {
            success: false,
            message: Some("Media host is not configured".to_string()),
        }),
        Err(e) => {
            tracing::error!("Media delete failed: {}", e);
            HttpResponse::InternalServerError().json(DeleteMediaResponse {
                success: false,
                message: Some("Something went wrong".to_string()),
            })
        }
    }
}
