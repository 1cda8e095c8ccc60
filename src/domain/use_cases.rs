pub mod auth;
pub mod extractors;
pub mod media;
pub mod resources;
