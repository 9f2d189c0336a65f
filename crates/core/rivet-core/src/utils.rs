//! Utility functions and helpers

pub mod logger;

pub use self::logger::Logger;
