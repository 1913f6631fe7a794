use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Folds composition variants (e.g. decomposed Hangul jamo) into a single form.
///
/// Text is compatibility-decomposed first and then canonically recomposed, so
/// strings that only differ in how their syllables were encoded compare equal.
pub fn normalize(text: &str) -> String {
    text.nfkd().nfc().collect()
}

/// Vendor-neutral song record.
///
/// `id` is only meaningful to the vendor that issued it. `playlist_name` is the
/// grouping key carried across vendors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub playlist_name: String,
}

impl Song {
    /// Builds a song from vendor or file text, normalizing every text field.
    pub fn new(
        id: impl Into<String>,
        title: &str,
        artist: &str,
        playlist_name: &str,
    ) -> Self {
        Self {
            id: id.into(),
            title: normalize(title),
            artist: normalize(artist),
            playlist_name: normalize(playlist_name),
        }
    }

    /// Returns the song regrouped under `playlist_name`.
    pub fn with_playlist_name(mut self, playlist_name: &str) -> Self {
        self.playlist_name = playlist_name.to_string();
        self
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} ({})",
            self.playlist_name, self.title, self.artist, self.id
        )
    }
}
