pub mod error;
pub mod worker;

pub use error::{Error, Result};
