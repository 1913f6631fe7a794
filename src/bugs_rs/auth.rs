use reqwest::Client;
use serde::Deserialize;

use super::{BugsSession, endpoint};
use crate::error::VendorError;

#[derive(Debug, Deserialize)]
pub struct BugsLoginStatus {
    #[serde(rename = "isLogged", default)]
    pub is_logged: bool,
}

/// Asks the notice counter endpoint whether the cookies belong to a live login.
///
/// The endpoint answers for anonymous visitors too, so only `isLogged` tells
/// the two apart.
pub async fn check_login(client: &Client, session: &BugsSession) -> Result<bool, VendorError> {
    let url = endpoint("bugsnotice/ajax/listcount")?;

    let response = client
        .post(url)
        .header("Cookie", session.cookie_header())
        .form(&[("notice_period", "3650"), ("like_period", "7")])
        .send()
        .await?;

    if !response.status().is_success() {
        tracing::debug!("Bugs login check answered {}", response.status());
        return Ok(false);
    }

    let status: BugsLoginStatus = response.json().await.map_err(|error| {
        VendorError::UnexpectedResponse(format!("Failed to parse Bugs login status: {}", error))
    })?;

    Ok(status.is_logged)
}
