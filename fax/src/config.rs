use crate::errors::{FaxError, Result};
use fanout::{Credentials, EndpointCatalog, EndpointSet, Region, Service};

pub const ENV_USERNAME: &str = "retarus_fax_username";
pub const ENV_PASSWORD: &str = "retarus_fax_password";
pub const ENV_CUSTOMER_NUMBER: &str = "retarus_cuno";

/// Fax client configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub customer_number: String,
    pub endpoints: EndpointSet,
}

impl Config {
    /// Resolve the fax endpoints for `region` and bundle them with the account.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        customer_number: impl Into<String>,
        region: Region,
        catalog: &EndpointCatalog,
    ) -> Result<Self> {
        let endpoints = catalog.resolve(region, Service::Fax)?;
        Ok(Self {
            credentials: Credentials::new(user, password),
            customer_number: customer_number.into(),
            endpoints,
        })
    }

    /// Read the account from `retarus_fax_username`, `retarus_fax_password`
    /// and `retarus_cuno`.
    pub fn from_env(region: Region, catalog: &EndpointCatalog) -> Result<Self> {
        Self::from_lookup(region, catalog, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(region: Region, catalog: &EndpointCatalog, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(FaxError::MissingEnv(key))
        };

        let user = require(ENV_USERNAME)?;
        let password = require(ENV_PASSWORD)?;
        let customer_number = require(ENV_CUSTOMER_NUMBER)?;

        Self::new(user, password, customer_number, region, catalog)
    }
}
