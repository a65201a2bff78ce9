pub mod config;
pub mod dns;
pub mod error;
pub mod secrets;
pub mod transport;

pub use error::{DnsError, Result};
