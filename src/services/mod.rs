pub mod auth;
pub mod download;
pub mod upload;
pub mod vendors;
