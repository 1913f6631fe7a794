use crate::error::VendorError;
use crate::ports::vendor::{
    Credentials, PlaylistType, SigninMethod, Vendor, VendorClient, title_artist_keyword,
};
use crate::song::Song;

/// Registry entry for a vendor whose adapter has not been written yet. It
/// advertises no playlist types and answers every call as unsupported.
pub struct PendingAdapter {
    vendor: Vendor,
}

impl PendingAdapter {
    pub fn new(vendor: Vendor) -> Self {
        Self { vendor }
    }

    fn unsupported<T>(&self, capability: &str) -> Result<T, VendorError> {
        Err(VendorError::unsupported(self.vendor, capability))
    }
}

#[async_trait::async_trait]
impl VendorClient for PendingAdapter {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn supported_playlist_types(&self) -> Vec<PlaylistType> {
        Vec::new()
    }

    fn supported_signin_methods(&self) -> Vec<SigninMethod> {
        vec![SigninMethod::IdPassword]
    }

    fn cookie_domain(&self) -> Option<&'static str> {
        match self.vendor {
            Vendor::Melon => Some(".melon.com"),
            Vendor::Genie => Some(".genie.co.kr"),
            Vendor::Bugs => None,
        }
    }

    async fn signin(&mut self, _credentials: Credentials) -> Result<(), VendorError> {
        self.unsupported("Sign in")
    }

    fn is_signed_in(&self) -> bool {
        false
    }

    async fn get_playlist(
        &self,
        playlist_type: PlaylistType,
        _playlist_id: Option<String>,
    ) -> Result<Vec<Song>, VendorError> {
        self.unsupported(playlist_type.label())
    }

    async fn search_song(&self, _keyword: &str) -> Result<Vec<Song>, VendorError> {
        self.unsupported("Song search")
    }

    fn keyword_for(&self, song: &Song) -> String {
        title_artist_keyword(song)
    }

    async fn create_personal_playlist(&self, _name: &str) -> Result<String, VendorError> {
        self.unsupported("Playlist creation")
    }

    async fn add_song_to_personal_playlist(
        &self,
        _playlist_id: &str,
        _song: &Song,
    ) -> Result<(), VendorError> {
        self.unsupported("Playlist editing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_is_unsupported() {
        let mut adapter = PendingAdapter::new(Vendor::Melon);

        assert!(adapter.supported_playlist_types().is_empty());
        let result = adapter
            .signin(Credentials::IdPassword {
                account_id: "me".into(),
                password: "pw".into(),
            })
            .await;
        assert!(matches!(
            result,
            Err(VendorError::UnsupportedCapability {
                vendor: Vendor::Melon,
                ..
            })
        ));
        assert!(!adapter.is_signed_in());
        assert!(adapter.search_song("x").await.is_err());
    }
}
