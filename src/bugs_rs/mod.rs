use std::collections::HashMap;

use url::Url;

use crate::error::VendorError;

pub mod auth;
pub mod playlist;

pub use auth::check_login;
pub use playlist::{BugsMyAlbum, get_my_album_tracks, get_my_albums};

pub const COOKIE_DOMAIN: &str = ".bugs.co.kr";

const BASE_URL: &str = "https://music.bugs.co.kr/";

/// Cookie jar of a signed-in Bugs account.
#[derive(Debug, Clone)]
pub struct BugsSession {
    cookies: HashMap<String, String>,
}

impl BugsSession {
    pub fn new(cookies: HashMap<String, String>) -> Self {
        Self { cookies }
    }

    /// Value for the `Cookie` request header, sorted for stable requests.
    pub fn cookie_header(&self) -> String {
        let mut pairs: Vec<(&String, &String)> = self.cookies.iter().collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn endpoint(path: &str) -> Result<Url, VendorError> {
    Url::parse(BASE_URL)
        .and_then(|base| base.join(path))
        .map_err(|error| VendorError::UnexpectedResponse(format!("Bad Bugs url {}: {}", path, error)))
}

fn decode_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(decimal) = entity.strip_prefix('#') {
        decimal.parse().ok()?
    } else {
        return match entity {
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "nbsp" => Some('\u{A0}'),
            _ => None,
        };
    };
    char::from_u32(code)
}

/// Decodes named and numeric (`&#8217;`, `&#x27;`) entities in one pass.
/// Unknown or malformed entities are kept as written.
pub(crate) fn decode_html_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];
        let entity = rest[1..]
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&rest[1..=end]).map(|c| (c, end)));
        match entity {
            Some((c, end)) => {
                decoded.push(c);
                rest = &rest[end + 2..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}
