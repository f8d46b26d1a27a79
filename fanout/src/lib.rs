//! Fan-out dispatch and reconciliation across mirrored service endpoints.
//!
//! A logical request is sent to every mirror of an [`EndpointSet`]
//! concurrently. The per-mirror [`Outcome`]s are then folded by a
//! [`Policy`] into one authoritative result.

pub mod dispatcher;
pub mod endpoints;
pub mod errors;
pub mod metrics_defs;
pub mod outcome;
pub mod protocol;
pub mod reconcile;
pub mod request;
pub mod status;

pub use dispatcher::{Dispatcher, REQUEST_TIMEOUT};
pub use endpoints::{CatalogEntry, EndpointCatalog, EndpointSet, Region, Service};
pub use errors::{FanoutError, Result, TransportFailure};
pub use outcome::{MirrorResponse, Outcome};
pub use reconcile::{BulkDelete, BulkLookup, Policy, SingleDelete, SingleLookup};
pub use request::{Credentials, OutboundRequest};
pub use status::{DomainError, DomainErrorKind};
