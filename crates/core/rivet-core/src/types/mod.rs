//! Wire and domain types shared by the client components

pub mod chat;
pub mod configuration;

pub use chat::*;
pub use configuration::*;

/// Value the backend uses to signal success in `message`/`status` fields
pub const SUCCESS: &str = "success";
