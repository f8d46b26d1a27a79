use crate::errors::{Result, SmsError};
use fanout::{Credentials, EndpointCatalog, EndpointSet, Region, Service};

pub const ENV_USERNAME: &str = "retarus_sms_username";
pub const ENV_PASSWORD: &str = "retarus_sms_password";

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: EndpointSet,
}

impl Config {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        region: Region,
        catalog: &EndpointCatalog,
    ) -> Result<Self> {
        Ok(Self {
            credentials: Credentials::new(user, password),
            endpoints: catalog.resolve(region, Service::Sms)?,
        })
    }

    /// Read the account from `retarus_sms_username` and `retarus_sms_password`.
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
                .ok_or(SmsError::MissingEnv(key))
        };

        let user = require(ENV_USERNAME)?;
        let password = require(ENV_PASSWORD)?;

        Self::new(user, password, region, catalog)
    }
}
