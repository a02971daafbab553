pub mod api;
pub mod args;
mod config;
mod dates;
mod error;
pub mod model;
pub mod report;

pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
