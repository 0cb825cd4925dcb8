//! Consultation web UI: one server-rendered form plus a small JSON API

pub mod handler;
pub mod page;

pub use handler::{serve, WebState};
