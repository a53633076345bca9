//! Services: SQL persistence behind the handlers, one struct of associated fns per resource.

mod catalog;
mod chat;
mod learning_paths;
mod profiles;
mod recommendations;
mod users;
mod validation;

pub use catalog::CatalogService;
pub use chat::ChatLogService;
pub use learning_paths::LearningPathService;
pub use profiles::ProfileService;
pub use recommendations::RecommendationService;
pub use users::UserService;
pub use validation::{NewUser, RequestValidator, MAX_CHAT_MESSAGE_CHARS, MAX_TITLE_CHARS, MIN_PASSWORD_LEN};
