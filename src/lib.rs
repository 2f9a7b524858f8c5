// Library modules
pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod jupiter;
pub mod models;
pub mod orchestrator;
pub mod quote;
pub mod submit;
pub mod swap;
pub mod utils;
pub mod wallet;

pub use error::{SwapError, SwapErrorKind};
pub use models::*;
