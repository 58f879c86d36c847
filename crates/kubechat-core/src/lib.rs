pub mod bindings;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod message;

pub use error::{KubechatError, Result};
