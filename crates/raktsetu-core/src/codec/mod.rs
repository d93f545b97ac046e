//! Identifier codec: RTID generation and QR payload encoding.
//!
//! Both halves are pure functions over a request or a date string; the
//! store decides when to call them.

mod identifier;
mod payload;

pub use identifier::*;
pub use payload::*;
