use reqwest::Client;

use crate::bugs_rs::{
    BugsMyAlbum, BugsSession, COOKIE_DOMAIN, check_login, get_my_album_tracks, get_my_albums,
};
use crate::error::VendorError;
use crate::ports::vendor::{
    Credentials, PlaylistType, SigninMethod, Vendor, VendorClient, title_artist_keyword,
};
use crate::song::Song;

/// Bugs adapter. Signs in with cookies imported from a browser session.
pub struct BugsHttpAdapter {
    client: Client,
    session: Option<BugsSession>,
}

impl BugsHttpAdapter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            session: None,
        }
    }

    fn session(&self) -> Result<&BugsSession, VendorError> {
        self.session.as_ref().ok_or(VendorError::AuthenticationRequired)
    }

    async fn album_songs(
        &self,
        session: &BugsSession,
        album: &BugsMyAlbum,
    ) -> Result<Vec<Song>, VendorError> {
        let tracks = get_my_album_tracks(&self.client, session, &album.playlist_id).await?;
        tracing::debug!(
            "Bugs album '{}' ({}) has {} tracks",
            album.title,
            album.playlist_id,
            tracks.len()
        );
        Ok(tracks
            .into_iter()
            .map(|track| Song::new(track.track_id, &track.title, &track.artist, &album.title))
            .collect())
    }
}

#[async_trait::async_trait]
impl VendorClient for BugsHttpAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Bugs
    }

    fn supported_playlist_types(&self) -> Vec<PlaylistType> {
        vec![PlaylistType::PersonalSingle, PlaylistType::PersonalAll]
    }

    fn supported_signin_methods(&self) -> Vec<SigninMethod> {
        vec![SigninMethod::ImportedCookies]
    }

    fn cookie_domain(&self) -> Option<&'static str> {
        Some(COOKIE_DOMAIN)
    }

    async fn signin(&mut self, credentials: Credentials) -> Result<(), VendorError> {
        let cookies = match credentials {
            Credentials::Cookies(cookies) => cookies,
            Credentials::IdPassword { .. } => {
                return Err(VendorError::AuthenticationFailed {
                    reason: "Bugs only accepts imported cookies".into(),
                });
            }
        };

        let session = BugsSession::new(cookies);
        if !check_login(&self.client, &session).await? {
            return Err(VendorError::AuthenticationFailed {
                reason: "the cookies do not belong to a signed-in Bugs account".into(),
            });
        }

        self.session = Some(session);
        Ok(())
    }

    fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    async fn get_playlist(
        &self,
        playlist_type: PlaylistType,
        playlist_id: Option<String>,
    ) -> Result<Vec<Song>, VendorError> {
        let session = self.session()?;
        let albums = get_my_albums(&self.client, session).await?;

        match playlist_type {
            PlaylistType::PersonalSingle => {
                let playlist_id = playlist_id.unwrap_or_default();
                let album = albums
                    .iter()
                    .find(|album| album.playlist_id == playlist_id)
                    .ok_or(VendorError::InvalidPlaylistReference { playlist_id })?;
                self.album_songs(session, album).await
            }
            PlaylistType::PersonalAll => {
                let mut songs = Vec::new();
                for album in &albums {
                    songs.extend(self.album_songs(session, album).await?);
                }
                Ok(songs)
            }
        }
    }

    async fn search_song(&self, _keyword: &str) -> Result<Vec<Song>, VendorError> {
        Err(VendorError::unsupported(Vendor::Bugs, "Song search"))
    }

    fn keyword_for(&self, song: &Song) -> String {
        title_artist_keyword(song)
    }

    async fn create_personal_playlist(&self, _name: &str) -> Result<String, VendorError> {
        Err(VendorError::unsupported(Vendor::Bugs, "Playlist creation"))
    }

    async fn add_song_to_personal_playlist(
        &self,
        _playlist_id: &str,
        _song: &Song,
    ) -> Result<(), VendorError> {
        Err(VendorError::unsupported(Vendor::Bugs, "Playlist editing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_playlist_requires_session() {
        let adapter = BugsHttpAdapter::new(Client::new());

        let result = adapter.get_playlist(PlaylistType::PersonalAll, None).await;

        assert!(matches!(result, Err(VendorError::AuthenticationRequired)));
        assert!(!adapter.is_signed_in());
    }

    #[tokio::test]
    async fn test_id_password_is_rejected_locally() {
        let mut adapter = BugsHttpAdapter::new(Client::new());

        let result = adapter
            .signin(Credentials::IdPassword {
                account_id: "me".into(),
                password: "pw".into(),
            })
            .await;

        assert!(matches!(result, Err(VendorError::AuthenticationFailed { .. })));
        assert!(!adapter.is_signed_in());
    }

    #[tokio::test]
    async fn test_write_capabilities_are_unsupported() {
        let adapter = BugsHttpAdapter::new(Client::new());
        let song = Song::new("1", "t", "a", "p");

        assert!(matches!(
            adapter.search_song("t a").await,
            Err(VendorError::UnsupportedCapability { .. })
        ));
        assert!(matches!(
            adapter.create_personal_playlist("p").await,
            Err(VendorError::UnsupportedCapability { .. })
        ));
        assert!(matches!(
            adapter.add_song_to_personal_playlist("1", &song).await,
            Err(VendorError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn test_capabilities() {
        let adapter = BugsHttpAdapter::new(Client::new());

        assert_eq!(adapter.supported_signin_methods(), vec![SigninMethod::ImportedCookies]);
        assert!(adapter.supported_playlist_types().contains(&PlaylistType::PersonalAll));
        assert_eq!(adapter.cookie_domain(), Some(".bugs.co.kr"));
    }
}
