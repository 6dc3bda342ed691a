//! Wire records exchanged with the panel backend

mod user;

pub use user::*;
