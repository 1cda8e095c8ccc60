use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::{
    entities::{document::ListQuery, resource::Resource},
    errors::AppError,
    use_cases::extractors::AuthIdentity,
    AppState,
};

// The mounted `Resource` travels as scope data, so one set of handlers
// serves every collection.

pub async fn list_documents(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match state.resource_handler.list(**resource, &query).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => e.to_http_response(),
    }
}

pub async fn get_document(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    id: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.resource_handler.get(**resource, id).await {
        Ok(document) => HttpResponse::Ok().json(document),
        Err(e) => e.to_http_response(),
    }
}

pub async fn create_document(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    tracing::debug!(subject = %identity.0.subject, resource = %**resource, "Create requested");

    match state.resource_handler.create(**resource, body.into_inner()).await {
        Ok(document) => HttpResponse::Created().json(document),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_document(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    id: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };
    tracing::debug!(subject = %identity.0.subject, resource = %**resource, %id, "Update requested");

    match state.resource_handler.update(**resource, id, body.into_inner()).await {
        Ok(document) => HttpResponse::Ok().json(document),
        Err(e) => e.to_http_response(),
    }
}

pub async fn delete_document(
    identity: AuthIdentity,
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    id: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };
    tracing::debug!(subject = %identity.0.subject, resource = %**resource, %id, "Delete requested");

    match state.resource_handler.delete(**resource, id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("{} has been deleted", resource.display_name())
        })),
        Err(e) => e.to_http_response(),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid document id".into()))
}
