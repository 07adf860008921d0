//! HTTP shell: sessions, route guarding, and page descriptions for the view layer.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod sessions;
