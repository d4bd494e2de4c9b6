//! Utilities shared by the Natter crates: logging setup and clock abstraction.

pub mod logger;
pub mod time;
