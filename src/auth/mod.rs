//! Authentication module
//!
//! Registration, login, logout and the admin authorization policy.
//! Successful registration or login always starts a session.

pub mod handlers;
pub mod password;
pub mod policy;
mod service;

pub use policy::authorize_admin;
pub use service::{AuthService, Registration};
