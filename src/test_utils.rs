use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::TransferError;
use crate::ports::progress::ProgressReporter;
use crate::ports::prompt::Prompter;
use crate::ports::vendor::{MockVendorClient, PlaylistType, SigninMethod, Vendor};
use crate::song::Song;

#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Text(String),
    Cancel,
}

impl Answer {
    pub fn text(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

/// Prompter that replays a fixed list of answers and records what it printed.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    notices: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            notices: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
        }
    }

    fn next(&self, message: &str) -> Answer {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("No scripted answer left for prompt: {}", message))
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, choices: &[String]) -> Result<usize, TransferError> {
        match self.next(message) {
            Answer::Select(index) => {
                assert!(
                    index < choices.len(),
                    "Scripted choice {} out of range for {:?}",
                    index,
                    choices
                );
                Ok(index)
            }
            Answer::Cancel => Err(TransferError::Cancelled),
            Answer::Text(text) => panic!("Expected a selection for {}, got text {}", message, text),
        }
    }

    fn input(&self, message: &str) -> Result<String, TransferError> {
        match self.next(message) {
            Answer::Text(text) => Ok(text),
            Answer::Cancel => Err(TransferError::Cancelled),
            Answer::Select(index) => {
                panic!("Expected text for {}, got selection {}", message, index)
            }
        }
    }

    fn password(&self, message: &str) -> Result<String, TransferError> {
        self.input(message)
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Progress reporter that sums every advance.
#[derive(Default)]
pub struct RecordingProgress {
    total: Mutex<f64>,
    stages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn total(&self) -> f64 {
        *self.total.lock().unwrap()
    }

    pub fn stages(&self) -> Vec<String> {
        self.stages.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn stage(&self, description: &str) {
        self.stages.lock().unwrap().push(description.to_string());
    }

    fn advance(&self, percent: f64) {
        *self.total.lock().unwrap() += percent;
    }
}

pub fn assert_progress_complete(progress: &RecordingProgress) {
    assert!(
        (progress.total() - 100.0).abs() < 1e-6,
        "progress ended at {}",
        progress.total()
    );
}

pub fn song(id: &str, title: &str, artist: &str, playlist_name: &str) -> Song {
    Song::new(id, title, artist, playlist_name)
}

/// Mock client with the capability and identity queries already answered.
pub fn mock_vendor(
    vendor: Vendor,
    playlist_types: Vec<PlaylistType>,
    signin_methods: Vec<SigninMethod>,
) -> MockVendorClient {
    let mut client = MockVendorClient::new();
    client.expect_vendor().return_const(vendor);
    client
        .expect_supported_playlist_types()
        .returning(move || playlist_types.clone());
    client
        .expect_supported_signin_methods()
        .returning(move || signin_methods.clone());
    client
        .expect_keyword_for()
        .returning(crate::ports::vendor::title_artist_keyword);
    client
}
