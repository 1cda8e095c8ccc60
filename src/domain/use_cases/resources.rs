use serde_json::Value;
use uuid::Uuid;

use crate::{
    entities::{
        document::{Document, DocumentBody, DocumentPage, ListQuery},
        resource::Resource,
    },
    errors::AppError,
    repositories::document::DocumentRepository,
};

/// CRUD over the document collections backing the content resources.
pub struct ResourceHandler<R>
where
    R: DocumentRepository,
{
    pub document_repo: R,
}

impl<R> ResourceHandler<R>
where
    R: DocumentRepository,
{
    pub fn new(document_repo: R) -> Self {
        ResourceHandler { document_repo }
    }

    pub async fn create(&self, resource: Resource, body: Value) -> Result<Document, AppError> {
        let body = DocumentBody::try_from(body)?;
        let document = self.document_repo
            .insert_document(resource.collection(), body.as_map())
            .await?;

        tracing::info!(%resource, id = %document.id, "Created document");
        Ok(document)
    }

    pub async fn list(&self, resource: Resource, query: &ListQuery) -> Result<DocumentPage, AppError> {
        let (page, per_page) = query.normalized();
        let collection = resource.collection();

        let data = self.document_repo.list_documents(collection, page, per_page).await?;
        let total = self.document_repo.count_documents(collection).await?;

        Ok(DocumentPage { data, page, per_page, total })
    }

    pub async fn get(&self, resource: Resource, id: Uuid) -> Result<Document, AppError> {
        self.document_repo
            .get_document(resource.collection(), &id)
            .await?
            .ok_or_else(|| not_found(resource))
    }

    pub async fn update(&self, resource: Resource, id: Uuid, patch: Value) -> Result<Document, AppError> {
        let patch = DocumentBody::try_from(patch)?;
        let document = self.document_repo
            .update_document(resource.collection(), &id, patch.as_map())
            .await?
            .ok_or_else(|| not_found(resource))?;

        tracing::info!(%resource, %id, "Updated document");
        Ok(document)
    }

    pub async fn delete(&self, resource: Resource, id: Uuid) -> Result<(), AppError> {
        if !self.document_repo.delete_document(resource.collection(), &id).await? {
            return Err(not_found(resource));
        }

        tracing::info!(%resource, %id, "Deleted document");
        Ok(())
    }
}

fn not_found(resource: Resource) -> AppError {
    AppError::NotFound(format!("{} not found", resource.display_name()))
}
