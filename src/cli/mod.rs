use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::config::Config;
use crate::error::TransferError;
use crate::ports::prompt::Prompter;
use crate::ports::vendor::Vendor;
use crate::services::download::{DownloadService, DownloadSummary};
use crate::services::upload::{UploadReport, UploadService};
use crate::services::vendors::create_client;

pub mod progress;
pub mod prompt;

use progress::IndicatifProgress;
use prompt::DialoguerPrompter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Download,
    Upload,
    Quit,
}

impl Action {
    const ALL: [Action; 3] = [Action::Download, Action::Upload, Action::Quit];

    fn label(&self) -> &'static str {
        match self {
            Action::Download => "Download playlist",
            Action::Upload => "Upload playlist",
            Action::Quit => "Quit",
        }
    }
}

/// Runs actions against the vendor registry and prints their outcome.
pub struct CliApplication {
    config: Config,
    http: Client,
    prompter: DialoguerPrompter,
}

impl CliApplication {
    pub fn new(config: Config, http: Client) -> Self {
        Self {
            config,
            http,
            prompter: DialoguerPrompter,
        }
    }

    /// Action selection loop. Leaves on Quit, Esc or Ctrl-C at the action menu.
    pub async fn run_interactive(&self) {
        loop {
            let action = match self.select_action() {
                Ok(Action::Quit) | Err(TransferError::Cancelled) => break,
                Ok(action) => action,
                Err(error) => {
                    self.report_error(&error);
                    break;
                }
            };

            let vendor = match self.select_vendor(action) {
                Ok(vendor) => vendor,
                Err(TransferError::Cancelled) => continue,
                Err(error) => {
                    self.report_error(&error);
                    continue;
                }
            };

            self.run_action(action, vendor, None).await;
        }
        tracing::debug!("Leaving interactive loop");
    }

    fn select_action(&self) -> Result<Action, TransferError> {
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();
        let index = self.prompter.select("What would you like to do?", &labels)?;
        Ok(Action::ALL[index])
    }

    fn select_vendor(&self, action: Action) -> Result<Vendor, TransferError> {
        let message = match action {
            Action::Upload => "Upload to which vendor?",
            _ => "Download from which vendor?",
        };
        let names: Vec<String> = Vendor::ALL.iter().map(|v| v.name().to_string()).collect();
        let index = self.prompter.select(message, &names)?;
        Ok(Vendor::ALL[index])
    }

    /// One download or upload with a fresh client. Failures are printed, never returned.
    pub async fn run_action(&self, action: Action, vendor: Vendor, path: Option<PathBuf>) {
        let mut client = create_client(vendor, &self.http);
        let progress = IndicatifProgress::new();
        let cookie_file = Some(self.config.cookie_file_path());
        tracing::info!("Starting {:?} with {}", action, vendor);

        match action {
            Action::Download => {
                let mut service = DownloadService::new(
                    client.as_mut(),
                    &self.prompter,
                    &progress,
                    cookie_file,
                );
                if let Some(output) = path {
                    service = service.with_output(output);
                }
                match service.run().await {
                    Ok(summary) => {
                        progress.finish();
                        print_download_summary(&summary);
                    }
                    Err(error) => {
                        progress.abandon();
                        self.report_error(&error);
                    }
                }
            }
            Action::Upload => {
                let mut service = UploadService::new(
                    client.as_mut(),
                    &self.prompter,
                    &progress,
                    cookie_file,
                    self.config.overflow_file_path(),
                );
                if let Some(input) = path {
                    service = service.with_input(input);
                }
                match service.run().await {
                    Ok(report) => {
                        progress.finish();
                        print_upload_report(&report, vendor);
                    }
                    Err(error) => {
                        progress.abandon();
                        self.report_error(&error);
                    }
                }
            }
            Action::Quit => {}
        }
    }

    fn report_error(&self, error: &TransferError) {
        match error {
            TransferError::Cancelled => self.prompter.notify("Cancelled."),
            error if error.is_unsupported() => {
                self.prompter.warn(&error.to_string());
            }
            error => {
                tracing::warn!("Action failed: {:?}", error);
                self.prompter.warn(&format!("An error occurred: {}", error));
            }
        }
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn print_download_summary(summary: &DownloadSummary) {
    println!(
        "Saved {} songs to {}",
        summary.song_count,
        display_path(&summary.path)
    );
}

fn print_upload_report(report: &UploadReport, vendor: Vendor) {
    println!("Loaded songs: {}", report.loaded);
    println!("Matched songs: {}", report.matched.len());

    let overflow = report.overflow(vendor.name());
    for (reason, row) in &overflow {
        println!(">>> {} - {}", reason, row.to_song());
    }

    println!("Registered songs: {}", report.registered());
    if !report.playlists.is_empty() {
        let mut names: Vec<&String> = report.playlists.keys().collect();
        names.sort();
        for name in names {
            println!("  playlist: {}", name);
        }
    }
    if !overflow.is_empty() {
        println!(
            "{} songs were not registered, see {}",
            overflow.len(),
            display_path(&report.overflow_path)
        );
    }
}
