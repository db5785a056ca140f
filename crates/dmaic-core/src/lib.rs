pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod project;
pub mod recommend;
pub mod rules;
pub mod sequence;
pub mod types;

pub use error::{DmaicError, Result};
