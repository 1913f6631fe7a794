use crate::ports::vendor::Vendor;

/// Failures a vendor adapter reports back to the transfer engine.
#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    #[error("Sign in is required")]
    AuthenticationRequired,
    #[error("Sign in was rejected: {reason}")]
    AuthenticationFailed { reason: String },
    #[error("{capability} is not yet available for {vendor}")]
    UnsupportedCapability { vendor: Vendor, capability: String },
    #[error("Playlist {playlist_id} does not belong to the signed-in account")]
    InvalidPlaylistReference { playlist_id: String },
    #[error("Failed to add song {song_id}: {reason}")]
    AddFailed { song_id: String, reason: String },
    #[error("Failed to send http request: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response from vendor: {0}")]
    UnexpectedResponse(String),
}

impl VendorError {
    pub fn unsupported(vendor: Vendor, capability: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            vendor,
            capability: capability.into(),
        }
    }
}

/// Failures that end (or restart) a download or upload action.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Cancelled by operator")]
    Cancelled,
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error("Failed to process playlist file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read operator input: {0}")]
    Prompt(String),
}

impl TransferError {
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            TransferError::Vendor(VendorError::UnsupportedCapability { .. })
        )
    }
}
