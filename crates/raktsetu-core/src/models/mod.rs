//! Domain models for the blood-request dashboard.

mod notification;
mod request;

pub use notification::*;
pub use request::*;
