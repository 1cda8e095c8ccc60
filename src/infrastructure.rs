pub mod auth;
pub mod db;
pub mod http;
pub mod limiter;
pub mod media;
pub mod utils;
