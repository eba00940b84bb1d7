pub mod error;
pub mod necklace;
pub mod codeset;
pub mod assign;
pub mod geometry;
pub mod layout;
pub mod validate;
pub mod config;
pub mod render;
pub mod engine;

pub use engine::{Engine, Prepared};
pub use error::Error;
