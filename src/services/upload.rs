use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{TransferError, VendorError};
use crate::playlist_file::{CsvRow, read_playlist_file, write_playlist_file};
use crate::ports::progress::{ProgressReporter, even_share};
use crate::ports::prompt::{Prompter, input_until};
use crate::ports::vendor::{Vendor, VendorClient};
use crate::services::auth::Authenticator;
use crate::song::Song;

const LOAD_WEIGHT: f64 = 10.0;
const MATCH_WEIGHT: f64 = 50.0;
const CREATE_WEIGHT: f64 = 10.0;
const POPULATE_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowReason {
    NotFound,
    AddFailed,
}

impl fmt::Display for OverflowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowReason::NotFound => f.write_str("Not found"),
            OverflowReason::AddFailed => f.write_str("Add failed"),
        }
    }
}

/// Outcome of one upload run.
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub loaded: usize,
    /// Target-vendor songs, each stamped with its source playlist name.
    pub matched: Vec<Song>,
    /// Source rows the target vendor had no candidate for, normalized like every Song.
    pub unmatched: Vec<CsvRow>,
    /// Matched songs the target vendor refused to add.
    pub add_failed: Vec<Song>,
    /// Playlists created on the target, keyed by name.
    pub playlists: HashMap<String, String>,
    pub overflow_path: PathBuf,
}

impl UploadReport {
    pub fn registered(&self) -> usize {
        self.matched.len() - self.add_failed.len()
    }

    /// Every row that ended up in the overflow file, tagged with why.
    pub fn overflow(&self, target_vendor: &str) -> Vec<(OverflowReason, CsvRow)> {
        self.unmatched
            .iter()
            .map(|row| (OverflowReason::NotFound, row.clone()))
            .chain(
                self.add_failed
                    .iter()
                    .map(|song| (OverflowReason::AddFailed, CsvRow::from_song(target_vendor, song))),
            )
            .collect()
    }
}

struct MatchOutcome {
    matched: Vec<Song>,
    unmatched: Vec<CsvRow>,
}

/// Recreates the playlists of a playlist file on a target vendor.
pub struct UploadService<'a, C: VendorClient + ?Sized> {
    client: &'a mut C,
    prompter: &'a dyn Prompter,
    progress: &'a dyn ProgressReporter,
    authenticator: Authenticator<'a>,
    overflow_path: PathBuf,
    input: Option<PathBuf>,
}

impl<'a, C: VendorClient + ?Sized> UploadService<'a, C> {
    pub fn new(
        client: &'a mut C,
        prompter: &'a dyn Prompter,
        progress: &'a dyn ProgressReporter,
        cookie_file: Option<PathBuf>,
        overflow_path: PathBuf,
    ) -> Self {
        Self {
            client,
            prompter,
            progress,
            authenticator: Authenticator::new(prompter, cookie_file),
            overflow_path,
            input: None,
        }
    }

    /// Skips the input path question.
    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = Some(input);
        self
    }

    pub async fn run(&mut self) -> Result<UploadReport, TransferError> {
        // Every stage talks to the account, so the session comes first.
        self.authenticator.ensure_signed_in(self.client).await?;

        let input = match &self.input {
            Some(input) => input.clone(),
            None => PathBuf::from(input_until(
                self.prompter,
                "Playlist file to upload (with path)",
                "Please enter an existing file.",
                |value| Path::new(value).is_file(),
            )?),
        };

        self.progress.stage("Loading file");
        let rows = read_playlist_file(&input)?;
        self.progress.advance(LOAD_WEIGHT);
        tracing::info!("Loaded {} songs from {}", rows.len(), input.display());

        if rows.is_empty() {
            self.progress
                .advance(MATCH_WEIGHT + CREATE_WEIGHT + POPULATE_WEIGHT);
            let report = UploadReport {
                overflow_path: self.overflow_path.clone(),
                ..UploadReport::default()
            };
            self.write_overflow(&report)?;
            return Ok(report);
        }

        self.progress.stage("Searching songs");
        let MatchOutcome { matched, unmatched } = self.match_songs(&rows).await?;

        self.progress.stage("Creating playlists");
        let playlists = self.create_playlists(&matched).await?;
        self.progress.advance(CREATE_WEIGHT);

        self.progress.stage("Adding songs");
        let add_failed = self.populate(&matched, &playlists).await?;

        let report = UploadReport {
            loaded: rows.len(),
            matched,
            unmatched,
            add_failed,
            playlists,
            overflow_path: self.overflow_path.clone(),
        };
        self.write_overflow(&report)?;

        Ok(report)
    }

    async fn match_songs(&self, rows: &[CsvRow]) -> Result<MatchOutcome, TransferError> {
        let target = self.client.vendor();
        let share = even_share(MATCH_WEIGHT, rows.len());
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for row in rows {
            let source = row.to_song();

            // Ids from the target vendor itself are already valid there.
            if Vendor::from_name(&row.vendor_name) == Some(target) {
                matched.push(source);
                self.progress.advance(share);
                continue;
            }

            let keyword = self.client.keyword_for(&source);
            let candidates = self.client.search_song(&keyword).await?;
            match candidates.into_iter().next() {
                Some(found) => {
                    tracing::debug!("Matched {} to {}", source, found);
                    matched.push(found.with_playlist_name(&source.playlist_name));
                }
                None => {
                    tracing::debug!("No candidate for {}", source);
                    unmatched.push(CsvRow::from_song(&row.vendor_name, &source));
                }
            }
            self.progress.advance(share);
        }

        Ok(MatchOutcome { matched, unmatched })
    }

    async fn create_playlists(
        &self,
        matched: &[Song],
    ) -> Result<HashMap<String, String>, TransferError> {
        let mut playlists: HashMap<String, String> = HashMap::new();

        for song in matched {
            if playlists.contains_key(&song.playlist_name) {
                continue;
            }
            let playlist_id = self
                .client
                .create_personal_playlist(&song.playlist_name)
                .await?;
            tracing::info!(
                "Created playlist '{}' ({}) on {}",
                song.playlist_name,
                playlist_id,
                self.client.vendor()
            );
            playlists.insert(song.playlist_name.clone(), playlist_id);
        }

        Ok(playlists)
    }

    async fn populate(
        &self,
        matched: &[Song],
        playlists: &HashMap<String, String>,
    ) -> Result<Vec<Song>, TransferError> {
        if matched.is_empty() {
            self.progress.advance(POPULATE_WEIGHT);
            return Ok(Vec::new());
        }

        let share = even_share(POPULATE_WEIGHT, matched.len());
        let mut add_failed = Vec::new();

        for song in matched {
            let result = match playlists.get(&song.playlist_name) {
                Some(playlist_id) => {
                    self.client
                        .add_song_to_personal_playlist(playlist_id, song)
                        .await
                }
                None => Err(VendorError::AddFailed {
                    song_id: song.id.clone(),
                    reason: format!("no playlist was created for '{}'", song.playlist_name),
                }),
            };

            match result {
                Ok(()) => {}
                Err(error @ VendorError::UnsupportedCapability { .. }) => return Err(error.into()),
                Err(error) => {
                    tracing::warn!("Failed to add {}: {}", song, error);
                    add_failed.push(song.clone());
                }
            }
            self.progress.advance(share);
        }

        Ok(add_failed)
    }

    fn write_overflow(&self, report: &UploadReport) -> Result<(), TransferError> {
        let rows: Vec<CsvRow> = report
            .overflow(self.client.vendor().name())
            .into_iter()
            .map(|(_, row)| row)
            .collect();
        write_playlist_file(&self.overflow_path, &rows)?;
        tracing::info!(
            "Wrote {} unregistered songs to {}",
            rows.len(),
            self.overflow_path.display()
        );
        Ok(())
    }
}
