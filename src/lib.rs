pub mod app;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod models;
pub mod render;
pub mod tmdb;
pub mod utils;
