use std::collections::HashMap;
use std::fmt;

use crate::error::VendorError;
use crate::song::Song;

/// The fixed registry of streaming vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Vendor {
    Melon,
    Genie,
    Bugs,
}

impl Vendor {
    pub const ALL: [Vendor; 3] = [Vendor::Melon, Vendor::Genie, Vendor::Bugs];

    pub fn name(&self) -> &'static str {
        match self {
            Vendor::Melon => "melon",
            Vendor::Genie => "genie",
            Vendor::Bugs => "bugs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|vendor| vendor.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaylistType {
    /// One personal playlist, addressed by id.
    PersonalSingle,
    /// Every personal playlist of the signed-in account, concatenated.
    PersonalAll,
}

impl PlaylistType {
    pub fn label(&self) -> &'static str {
        match self {
            PlaylistType::PersonalSingle => "personal-single",
            PlaylistType::PersonalAll => "personal-all",
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, PlaylistType::PersonalSingle | PlaylistType::PersonalAll)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, PlaylistType::PersonalAll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigninMethod {
    IdPassword,
    ImportedCookies,
}

impl SigninMethod {
    pub const ALL: [SigninMethod; 2] = [SigninMethod::IdPassword, SigninMethod::ImportedCookies];

    pub fn label(&self) -> &'static str {
        match self {
            SigninMethod::IdPassword => "id-password",
            SigninMethod::ImportedCookies => "imported-cookies",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    IdPassword {
        account_id: String,
        password: String,
    },
    Cookies(HashMap<String, String>),
}

impl Credentials {
    pub fn method(&self) -> SigninMethod {
        match self {
            Credentials::IdPassword { .. } => SigninMethod::IdPassword,
            Credentials::Cookies(_) => SigninMethod::ImportedCookies,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::IdPassword { account_id, .. } => f
                .debug_struct("IdPassword")
                .field("account_id", account_id)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Cookies(cookies) => {
                let mut names: Vec<&String> = cookies.keys().collect();
                names.sort();
                f.debug_tuple("Cookies").field(&names).finish()
            }
        }
    }
}

/// Port trait every vendor adapter implements.
///
/// Implementations live in `services::vendors` (production) or test mocks. Each
/// instance owns its own session; nothing here touches another vendor's state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VendorClient: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn supported_playlist_types(&self) -> Vec<PlaylistType>;

    fn supported_signin_methods(&self) -> Vec<SigninMethod>;

    /// Domain whose entries are picked out of the local cookie cache.
    fn cookie_domain(&self) -> Option<&'static str>;

    async fn signin(&mut self, credentials: Credentials) -> Result<(), VendorError>;

    fn is_signed_in(&self) -> bool;

    async fn get_playlist(
        &self,
        playlist_type: PlaylistType,
        playlist_id: Option<String>,
    ) -> Result<Vec<Song>, VendorError>;

    /// Candidates in the vendor's own ranking order.
    async fn search_song(&self, keyword: &str) -> Result<Vec<Song>, VendorError>;

    fn keyword_for(&self, song: &Song) -> String;

    async fn create_personal_playlist(&self, name: &str) -> Result<String, VendorError>;

    async fn add_song_to_personal_playlist(
        &self,
        playlist_id: &str,
        song: &Song,
    ) -> Result<(), VendorError>;
}

/// Default search keyword: normalized "title artist".
pub fn title_artist_keyword(song: &Song) -> String {
    crate::song::normalize(&format!("{} {}", song.title, song.artist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_from_name() {
        assert_eq!(Vendor::from_name("bugs"), Some(Vendor::Bugs));
        assert_eq!(Vendor::from_name(" Melon "), Some(Vendor::Melon));
        assert_eq!(Vendor::from_name("spotify"), None);
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let credentials = Credentials::IdPassword {
            account_id: "me".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("me"));
        assert!(!printed.contains("hunter2"));

        let cookies = Credentials::Cookies(HashMap::from([("sid".into(), "secret".into())]));
        let printed = format!("{:?}", cookies);
        assert!(printed.contains("sid"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_keyword_normalizes_composition_variants() {
        let decomposed = Song {
            id: "1".into(),
            title: "\u{1112}\u{1161}\u{11AB}".into(),
            artist: "IU".into(),
            playlist_name: "p".into(),
        };
        let composed = Song {
            id: "2".into(),
            title: "\u{D55C}".into(),
            artist: "IU".into(),
            playlist_name: "p".into(),
        };

        assert_eq!(
            title_artist_keyword(&decomposed),
            title_artist_keyword(&composed)
        );
        assert_eq!(title_artist_keyword(&composed), "\u{D55C} IU");
    }
}
