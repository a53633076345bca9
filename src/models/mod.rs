//! Request/response schemas and database row types.

pub mod chat;
pub mod course;
pub mod learning_path;
pub mod profile;
pub mod recommendation;
pub mod user;

pub use chat::*;
pub use course::*;
pub use learning_path::*;
pub use profile::*;
pub use recommendation::*;
pub use user::*;
