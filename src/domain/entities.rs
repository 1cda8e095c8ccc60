pub mod credential;
pub mod document;
pub mod media;
pub mod resource;
pub mod token;
