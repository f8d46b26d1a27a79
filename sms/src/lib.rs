//! Client for the SMS service.

pub mod client;
pub mod config;
pub mod errors;
pub mod job;
pub mod report;

pub use client::Client;
pub use config::Config;
pub use errors::SmsError;
pub use job::{Encoding, InvalidCharacters, Job, Message, Options, Qos, Recipient};
pub use report::{Report, SmsStatus};
