//! Endpoint sets and the catalog that resolves them.
//!
//! # Model
//!
//! Every (region, service) pair maps to one [`EndpointSet`]:
//!
//! ```text
//! (Europe, fax) → EndpointSet {
//!     ha_address: https://faxws-ha.de.retarus.com/rest/v1/
//!     mirrors:    [https://faxws.de2.retarus.com/rest/v1/,
//!                  https://faxws.de1.retarus.com/rest/v1/]
//! }
//! ```
//!
//! The HA address takes single-target writes. Mirrors take fan-out reads and
//! deletes. The [`EndpointCatalog`] is built once at startup, either from the
//! built-in table or from configuration, and is read-only afterwards.

use crate::errors::{FanoutError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Region {
    Europe,
    America,
    Switzerland,
    Singapore,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Europe,
        Region::America,
        Region::Switzerland,
        Region::Singapore,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Region::Europe => "Europe",
            Region::America => "America",
            Region::Switzerland => "Switzerland",
            Region::Singapore => "Singapore",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown region: {s}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Fax,
    Sms,
}

impl Service {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Service::Fax => "fax",
            Service::Sms => "sms",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [Service::Fax, Service::Sms]
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown service: {s}"))
    }
}

#[derive(Debug, PartialEq, Eq)]
struct EndpointSetInner {
    ha_address: Url,
    /// Ordered as configured; fan-out does not depend on this order.
    mirrors: Vec<Url>,
}

/// One HA address plus a non-empty list of mirrors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointSet {
    inner: Arc<EndpointSetInner>,
}

impl EndpointSet {
    pub fn new(ha_address: Url, mirrors: Vec<Url>) -> Result<Self> {
        if mirrors.is_empty() {
            return Err(FanoutError::InvalidCatalog(format!(
                "endpoint set for {ha_address} has no mirrors"
            )));
        }

        Ok(Self {
            inner: Arc::new(EndpointSetInner {
                ha_address,
                mirrors,
            }),
        })
    }

    pub fn ha_address(&self) -> &Url {
        &self.inner.ha_address
    }

    pub fn mirrors(&self) -> &[Url] {
        &self.inner.mirrors
    }
}

/// Catalog entry as it appears in configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub region: Region,
    pub service: Service,
    /// Note: `url::Url` rejects malformed addresses during deserialization.
    pub ha_address: Url,
    pub mirrors: Vec<Url>,
}

const BUILTIN: &[(Region, Service, &str, &[&str])] = &[
    (
        Region::Europe,
        Service::Fax,
        "https://faxws-ha.de.retarus.com/rest/v1/",
        &[
            "https://faxws.de2.retarus.com/rest/v1/",
            "https://faxws.de1.retarus.com/rest/v1/",
        ],
    ),
    (
        Region::America,
        Service::Fax,
        "https://faxws-ha.us.retarus.com/rest/v1/",
        &[
            "https://faxws.us2.retarus.com/rest/v1/",
            "https://faxws.us1.retarus.com/rest/v1/",
        ],
    ),
    (
        Region::Switzerland,
        Service::Fax,
        "https://faxws-ha.ch.retarus.com/rest/v1/",
        &["https://faxws.ch1.retarus.com/rest/v1/"],
    ),
    (
        Region::Singapore,
        Service::Fax,
        "https://faxws.sg1.retarus.com/rest/v1/",
        &["https://faxws.sg1.retarus.com/rest/v1/"],
    ),
    (
        Region::Europe,
        Service::Sms,
        "https://sms4a.eu.retarus.com/rest/v1",
        &[
            "https://sms4a.de1.retarus.com/rest/v1",
            "https://sms4a.de2.retarus.com/rest/v1",
        ],
    ),
];

/// Maps (region, service) pairs to endpoint sets
#[derive(Clone, Debug)]
pub struct EndpointCatalog {
    /// Insertion order is kept so listings match the configuration.
    entries: IndexMap<(Region, Service), EndpointSet>,
}

impl EndpointCatalog {
    /// The production endpoint table.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(region, service, ha, mirrors)| {
                Ok(CatalogEntry {
                    region: *region,
                    service: *service,
                    ha_address: Url::parse(ha)?,
                    mirrors: mirrors
                        .iter()
                        .map(|m| Url::parse(m))
                        .collect::<std::result::Result<Vec<_>, url::ParseError>>()?,
                })
            })
            .collect::<std::result::Result<Vec<_>, url::ParseError>>()
            .expect("builtin endpoint table holds valid URLs");

        Self::from_config(entries).expect("builtin endpoint table is consistent")
    }

    /// Build a catalog from configuration entries.
    ///
    /// Rejects duplicate (region, service) pairs and entries without mirrors.
    pub fn from_config(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(entries.len());

        for entry in entries {
            let key = (entry.region, entry.service);
            if map.contains_key(&key) {
                return Err(FanoutError::InvalidCatalog(format!(
                    "duplicate entry for service {} in region {}",
                    entry.service, entry.region
                )));
            }

            let endpoints = EndpointSet::new(entry.ha_address, entry.mirrors)?;
            map.insert(key, endpoints);
        }

        Ok(Self { entries: map })
    }

    /// Resolve the endpoint set for a region and service.
    ///
    /// This is a pure lookup; it never touches the network.
    pub fn resolve(&self, region: Region, service: Service) -> Result<EndpointSet> {
        self.entries
            .get(&(region, service))
            .cloned()
            .ok_or(FanoutError::UnknownEndpoint { region, service })
    }

    pub fn entries(&self) -> impl Iterator<Item = (Region, Service, &EndpointSet)> {
        self.entries
            .iter()
            .map(|((region, service), endpoints)| (*region, *service, endpoints))
    }
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
