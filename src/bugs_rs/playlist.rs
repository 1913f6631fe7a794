use std::collections::HashMap;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use super::{BugsSession, decode_html_entities, endpoint};
use crate::error::VendorError;

/* ---------- Personal album list ---------- */

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BugsMyAlbum {
    #[serde(deserialize_with = "string_or_number")]
    pub playlist_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct BugsMyAlbumList {
    #[serde(rename = "myAlbumList", default)]
    my_album_list: Vec<BugsMyAlbum>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

/// The list endpoint answers JSONP with an empty callback, i.e. `({...})`.
pub fn parse_my_album_list(body: &str) -> Result<Vec<BugsMyAlbum>, VendorError> {
    let json = body.trim().trim_start_matches('(').trim_end_matches(')');
    let list: BugsMyAlbumList = serde_json::from_str(json).map_err(|error| {
        VendorError::UnexpectedResponse(format!("Failed to parse Bugs album list: {}", error))
    })?;
    Ok(list.my_album_list)
}

pub async fn get_my_albums(
    client: &Client,
    session: &BugsSession,
) -> Result<Vec<BugsMyAlbum>, VendorError> {
    let mut url = endpoint("user/library/ajax/myalbum/list")?;
    url.query_pairs_mut()
        .append_pair("callback", "")
        .append_pair("page", "1");

    let body = client
        .get(url)
        .header("Cookie", session.cookie_header())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_my_album_list(&body)
}

/* ---------- Album tracks ---------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugsAlbumTrack {
    pub track_id: String,
    pub title: String,
    pub artist: String,
}

fn attributes(tag: &str, attribute_re: &Regex) -> HashMap<String, String> {
    attribute_re
        .captures_iter(tag)
        .map(|captures| {
            (
                captures[1].to_ascii_lowercase(),
                decode_html_entities(&captures[2]),
            )
        })
        .collect()
}

/// Pulls tracks out of the album page: every `<tr rowtype="track">` row carries
/// the track id, and its `USER_ALBUM_TRACK` anchor carries title and artist.
pub fn parse_album_tracks(html: &str) -> Result<Vec<BugsAlbumTrack>, VendorError> {
    let regex_error =
        |error: regex::Error| VendorError::UnexpectedResponse(format!("Bad track pattern: {}", error));
    let row_re = Regex::new(r#"(?is)<tr\b([^>]*)>(.*?)</tr>"#).map_err(regex_error)?;
    let anchor_re = Regex::new(r#"(?is)<a\b([^>]*)>"#).map_err(regex_error)?;
    let attribute_re =
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:]*)\s*=\s*"([^"]*)""#).map_err(regex_error)?;

    let mut tracks = Vec::new();
    for row in row_re.captures_iter(html) {
        let row_attributes = attributes(&row[1], &attribute_re);
        if row_attributes.get("rowtype").map(String::as_str) != Some("track") {
            continue;
        }
        let Some(track_id) = row_attributes.get("trackid") else {
            continue;
        };

        let anchor = anchor_re
            .captures_iter(&row[2])
            .map(|anchor| attributes(&anchor[1], &attribute_re))
            .find(|anchor| anchor.get("layer_type").map(String::as_str) == Some("USER_ALBUM_TRACK"));

        match anchor {
            Some(anchor) => tracks.push(BugsAlbumTrack {
                track_id: track_id.clone(),
                title: anchor.get("track_title").cloned().unwrap_or_default().trim().to_string(),
                artist: anchor
                    .get("artist_disp_nm")
                    .cloned()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            }),
            None => tracing::debug!("Bugs track row {} has no track anchor", track_id),
        }
    }

    Ok(tracks)
}

pub async fn get_my_album_tracks(
    client: &Client,
    session: &BugsSession,
    playlist_id: &str,
) -> Result<Vec<BugsAlbumTrack>, VendorError> {
    let mut url = endpoint(&format!("user/library/ajax/myalbum/{}", playlist_id))?;
    url.query_pairs_mut()
        .append_pair("playlistId", playlist_id)
        .append_pair("page", "1")
        .append_pair("size", "1000");

    let html = client
        .get(url)
        .header("Cookie", session.cookie_header())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_album_tracks(&html)
}
