//! Admin panel form validation
//!
//! Validation engine for the panel's sign-in screen and user dialog:
//! synchronous field rules, debounced per-field passes, remote uniqueness
//! checks and a latest-value race guard, plus the REST client and submit
//! flows around them.

pub mod api;
pub mod check;
pub mod error;
pub mod forms;
pub mod model;
pub mod notify;
pub mod session;
pub mod toast;
pub mod validation;

mod client;

pub use client::*;
