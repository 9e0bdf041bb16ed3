//! Contact form submissions from logged-in users.

pub mod handlers;
mod service;

pub use service::{ContactForm, ContactService};
