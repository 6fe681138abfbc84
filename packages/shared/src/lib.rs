//! Utilities shared by the Lanai packages: logging setup and time handling.

pub mod logger;
pub mod time;
