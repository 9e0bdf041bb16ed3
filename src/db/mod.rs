//! Database module
//!
//! Connection pool bootstrap, schema creation and the
//! parameterized queries used by the services.

pub mod models;
pub mod operations;
pub mod schema;

pub use models::{MessageWithAuthor, NewMessage, NewUser, Role, User, UserSummary};
pub use operations::{DbOperations, DbPoolStatus};
