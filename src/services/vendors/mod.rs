use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::VendorError;
use crate::ports::vendor::{Vendor, VendorClient};

pub mod bugs;
pub mod pending;

pub use bugs::BugsHttpAdapter;
pub use pending::PendingAdapter;

/// Shared HTTP client handed to every adapter.
pub fn http_client(config: &Config) -> Result<Client, VendorError> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?)
}

/// A fresh client with its own, empty session.
pub fn create_client(vendor: Vendor, http: &Client) -> Box<dyn VendorClient> {
    match vendor {
        Vendor::Bugs => Box::new(BugsHttpAdapter::new(http.clone())),
        Vendor::Melon | Vendor::Genie => Box::new(PendingAdapter::new(vendor)),
    }
}
