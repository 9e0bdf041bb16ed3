//! Admin dashboard: paginated listings of every user and contact message.

pub mod handlers;
pub mod pagination;
mod service;

pub use pagination::{PageRequest, Paginated, PER_PAGE};
pub use service::{AdminDashboard, AdminService};
