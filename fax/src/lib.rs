//! Client for the fax service.
//!
//! Jobs are submitted through the region's HA address. Reports are read and
//! deleted across all mirrors and reconciled into one answer.

pub mod client;
pub mod config;
pub mod errors;
pub mod job;
pub mod report;

pub use client::Client;
pub use config::Config;
pub use errors::FaxError;
pub use fanout::protocol::{DeleteFailureReason, DeleteReport};
pub use job::*;
pub use report::{RecipientStatus, Report};
