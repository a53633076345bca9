//! HTTP handlers, one module per resource.

pub mod auth;
pub mod chat;
pub mod courses;
pub mod learning_paths;
pub mod profile;
pub mod recommend;
