use std::path::PathBuf;

use crate::error::{TransferError, VendorError};
use crate::playlist_file::{CsvRow, write_playlist_file};
use crate::ports::progress::ProgressReporter;
use crate::ports::prompt::{Prompter, input_until, is_numeric_id};
use crate::ports::vendor::{PlaylistType, VendorClient};
use crate::services::auth::Authenticator;

const FETCH_WEIGHT: f64 = 60.0;
const SERIALIZE_WEIGHT: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSummary {
    pub song_count: usize,
    pub path: PathBuf,
}

/// Pulls one playlist (or all personal playlists) from a vendor into a file.
pub struct DownloadService<'a, C: VendorClient + ?Sized> {
    client: &'a mut C,
    prompter: &'a dyn Prompter,
    progress: &'a dyn ProgressReporter,
    authenticator: Authenticator<'a>,
    output: Option<PathBuf>,
}

impl<'a, C: VendorClient + ?Sized> DownloadService<'a, C> {
    pub fn new(
        client: &'a mut C,
        prompter: &'a dyn Prompter,
        progress: &'a dyn ProgressReporter,
        cookie_file: Option<PathBuf>,
    ) -> Self {
        Self {
            client,
            prompter,
            progress,
            authenticator: Authenticator::new(prompter, cookie_file),
            output: None,
        }
    }

    /// Skips the output path question.
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub async fn run(&mut self) -> Result<DownloadSummary, TransferError> {
        let supported = self.client.supported_playlist_types();
        if supported.is_empty() {
            return Err(VendorError::unsupported(self.client.vendor(), "Playlist download").into());
        }

        loop {
            match self.attempt(&supported).await {
                Ok(summary) => return Ok(summary),
                Err(TransferError::Vendor(VendorError::AuthenticationRequired)) => {
                    tracing::info!("Download needs a session, signing in and retrying");
                    self.authenticator.authenticate(self.client).await?;
                }
                Err(TransferError::Vendor(VendorError::InvalidPlaylistReference {
                    playlist_id,
                })) => {
                    self.prompter.warn(&format!(
                        "Playlist {} is not one of your playlists, please choose again.",
                        playlist_id
                    ));
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt(&mut self, supported: &[PlaylistType]) -> Result<DownloadSummary, TransferError> {
        let choices: Vec<String> = supported
            .iter()
            .map(|playlist_type| playlist_type.label().to_string())
            .collect();
        let playlist_type = supported[self.prompter.select("Choose a playlist type", &choices)?];

        if playlist_type.requires_session() {
            self.authenticator.ensure_signed_in(self.client).await?;
        }

        let playlist_id = if playlist_type.is_aggregate() {
            None
        } else {
            Some(input_until(
                self.prompter,
                "Playlist id to download",
                "Please enter a numeric playlist id.",
                is_numeric_id,
            )?)
        };

        let output = match &self.output {
            Some(output) => output.clone(),
            None => PathBuf::from(input_until(
                self.prompter,
                "File name to save to",
                "Please enter a file name.",
                |value| !value.is_empty(),
            )?),
        };

        self.progress.stage("Fetching playlist");
        tracing::info!(
            "Fetching {} playlist {:?} from {}",
            playlist_type.label(),
            playlist_id,
            self.client.vendor()
        );
        let songs = self.client.get_playlist(playlist_type, playlist_id).await?;
        self.progress.advance(FETCH_WEIGHT);

        self.progress.stage("Writing file");
        let vendor_name = self.client.vendor().name();
        let rows: Vec<CsvRow> = songs
            .iter()
            .map(|song| CsvRow::from_song(vendor_name, song))
            .collect();
        write_playlist_file(&output, &rows)?;
        self.progress.advance(SERIALIZE_WEIGHT);

        let path = std::fs::canonicalize(&output)?;
        tracing::info!("Saved {} songs to {}", songs.len(), path.display());

        Ok(DownloadSummary {
            song_count: songs.len(),
            path,
        })
    }
}
