pub mod authority;
pub mod config;
pub mod error;
pub mod expiry;
pub mod inventory;
pub mod lifecycle;
pub mod tracked;
pub mod vault;

pub use error::{Result, TokenwatchError};
