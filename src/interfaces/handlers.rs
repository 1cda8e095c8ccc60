pub mod auth;
pub mod home;
pub mod media;
pub mod resources;
pub mod system;
