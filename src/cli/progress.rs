use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ports::progress::ProgressReporter;

// Tenths of a percent, so uneven per-song shares still move the bar.
const SCALE: f64 = 10.0;
const LENGTH: u64 = 1000;

/// Terminal progress bar, drawn on the first stage of an action.
#[derive(Default)]
pub struct IndicatifProgress {
    bar: Mutex<Option<ProgressBar>>,
    percent: Mutex<f64>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&self) -> ProgressBar {
        let mut bar = self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(LENGTH);
            match ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40.cyan/blue}] {percent:>3}%")
            {
                Ok(style) => pb.set_style(style.progress_chars("##-")),
                Err(error) => tracing::debug!("Falling back to default progress style: {}", error),
            }
            pb
        })
        .clone()
    }

    pub fn finish(&self) {
        if let Some(bar) = self.current() {
            bar.finish();
        }
    }

    pub fn abandon(&self) {
        if let Some(bar) = self.current() {
            bar.abandon();
        }
    }

    fn current(&self) -> Option<ProgressBar> {
        self.bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressReporter for IndicatifProgress {
    fn stage(&self, description: &str) {
        self.bar().set_message(description.to_string());
    }

    fn advance(&self, percent: f64) {
        let mut total = self.percent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *total = (*total + percent).clamp(0.0, 100.0);
        self.bar().set_position((*total * SCALE).round() as u64);
    }
}
