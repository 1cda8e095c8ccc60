pub mod credential;
pub mod document;
pub mod media;
pub mod sqlx_repo;
pub mod token;
