#![warn(clippy::pedantic)]

pub mod config;
pub mod driver;
pub mod error;
pub mod render_log;
pub mod render_minimal;

mod hex;

pub use config::{DriverConfig, OutputMode};
pub use driver::{DefaultDriver, ReplayDriver};
pub use error::DriverError;
