use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{TransferError, VendorError};
use crate::ports::prompt::{Prompter, input_until};
use crate::ports::vendor::{Credentials, SigninMethod, VendorClient};

/// One entry of a browser cookie export (EditThisCookie and friends).
#[derive(Debug, Clone, Deserialize)]
pub struct CookieEntry {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Parses an exported cookie array, keeping every entry.
pub fn parse_cookie_export(text: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    let entries: Vec<CookieEntry> = serde_json::from_str(text.trim())?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.name, entry.value))
        .collect())
}

/// Reads the local cookie cache, keeping only entries for `domain`.
pub fn load_cookie_cache(path: &Path, domain: &str) -> Option<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path).ok()?;
    let entries: Vec<CookieEntry> = match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!("Ignoring unreadable cookie file {}: {}", path.display(), error);
            return None;
        }
    };

    let cookies: HashMap<String, String> = entries
        .into_iter()
        .filter(|entry| entry.domain.as_deref() == Some(domain))
        .map(|entry| (entry.name, entry.value))
        .collect();

    if cookies.is_empty() { None } else { Some(cookies) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SelectMethod,
    AwaitCredentials(SigninMethod),
    Authenticating(Credentials),
    Authenticated,
    Cancelled,
}

/// Drives the sign-in state machine until the client holds a session or the
/// operator cancels.
pub struct Authenticator<'a> {
    prompter: &'a dyn Prompter,
    cookie_file: Option<PathBuf>,
    cookie_file_tried: bool,
}

impl<'a> Authenticator<'a> {
    pub fn new(prompter: &'a dyn Prompter, cookie_file: Option<PathBuf>) -> Self {
        Self {
            prompter,
            cookie_file,
            cookie_file_tried: false,
        }
    }

    /// Signs in only when the client has no session yet.
    pub async fn ensure_signed_in<C: VendorClient + ?Sized>(
        &mut self,
        client: &mut C,
    ) -> Result<(), TransferError> {
        if client.is_signed_in() {
            return Ok(());
        }
        self.authenticate(client).await
    }

    pub async fn authenticate<C: VendorClient + ?Sized>(
        &mut self,
        client: &mut C,
    ) -> Result<(), TransferError> {
        self.prompter
            .warn(&format!("Sign in to {} is required.", client.vendor()));

        let mut state = AuthState::SelectMethod;
        loop {
            state = match state {
                AuthState::Authenticated => return Ok(()),
                AuthState::Cancelled => return Err(TransferError::Cancelled),
                state => self.step(state, client).await?,
            };
        }
    }

    async fn step<C: VendorClient + ?Sized>(
        &mut self,
        state: AuthState,
        client: &mut C,
    ) -> Result<AuthState, TransferError> {
        match state {
            AuthState::SelectMethod => {
                let choices: Vec<String> = SigninMethod::ALL
                    .iter()
                    .map(|method| method.label().to_string())
                    .collect();
                let index = match self.prompter.select("Choose a sign-in method", &choices) {
                    Err(TransferError::Cancelled) => return Ok(AuthState::Cancelled),
                    other => other?,
                };
                let method = SigninMethod::ALL[index];

                if client.supported_signin_methods().contains(&method) {
                    Ok(AuthState::AwaitCredentials(method))
                } else {
                    self.prompter.warn(&format!(
                        "{} does not support signing in with {} yet.",
                        client.vendor(),
                        method.label()
                    ));
                    Ok(AuthState::SelectMethod)
                }
            }
            AuthState::AwaitCredentials(SigninMethod::IdPassword) => {
                let account_id = match input_until(
                    self.prompter,
                    "Account id or email",
                    "Please enter an account id or email.",
                    |value| !value.is_empty(),
                ) {
                    Err(TransferError::Cancelled) => return Ok(AuthState::Cancelled),
                    other => other?,
                };
                let password = match self.prompter.password("Password") {
                    Err(TransferError::Cancelled) => return Ok(AuthState::Cancelled),
                    other => other?,
                };
                if password.is_empty() {
                    self.prompter.warn("Please enter a password.");
                    return Ok(AuthState::AwaitCredentials(SigninMethod::IdPassword));
                }

                Ok(AuthState::Authenticating(Credentials::IdPassword {
                    account_id,
                    password,
                }))
            }
            AuthState::AwaitCredentials(SigninMethod::ImportedCookies) => {
                if let Some(cookies) = self.cached_cookies(client.cookie_domain()) {
                    return Ok(AuthState::Authenticating(Credentials::Cookies(cookies)));
                }

                let pasted = match self
                    .prompter
                    .input("Export your cookies as JSON (e.g. with EditThisCookie) and paste them here")
                {
                    Err(TransferError::Cancelled) => return Ok(AuthState::Cancelled),
                    other => other?,
                };

                match parse_cookie_export(&pasted) {
                    Ok(cookies) if !cookies.is_empty() => {
                        Ok(AuthState::Authenticating(Credentials::Cookies(cookies)))
                    }
                    Ok(_) => {
                        self.prompter.warn("The pasted cookie list is empty.");
                        Ok(AuthState::AwaitCredentials(SigninMethod::ImportedCookies))
                    }
                    Err(error) => {
                        self.prompter
                            .warn(&format!("Could not read the pasted cookies: {}", error));
                        Ok(AuthState::AwaitCredentials(SigninMethod::ImportedCookies))
                    }
                }
            }
            AuthState::Authenticating(credentials) => {
                tracing::info!(
                    "Signing in to {} with {}",
                    client.vendor(),
                    credentials.method().label()
                );
                match client.signin(credentials).await {
                    Ok(()) if client.is_signed_in() => {
                        self.prompter.notify("Signed in.");
                        Ok(AuthState::Authenticated)
                    }
                    Ok(()) => {
                        self.prompter.warn("The vendor did not open a session.");
                        Ok(AuthState::SelectMethod)
                    }
                    Err(error @ VendorError::UnsupportedCapability { .. }) => Err(error.into()),
                    Err(error) => {
                        tracing::warn!("Sign in to {} failed: {}", client.vendor(), error);
                        self.prompter.warn(&format!("Sign in failed: {}", error));
                        Ok(AuthState::SelectMethod)
                    }
                }
            }
            AuthState::Authenticated | AuthState::Cancelled => Ok(state),
        }
    }

    /// The cookie cache is consulted once per action; a rejected cache falls
    /// through to the paste prompt.
    fn cached_cookies(&mut self, domain: Option<&str>) -> Option<HashMap<String, String>> {
        if self.cookie_file_tried {
            return None;
        }
        self.cookie_file_tried = true;

        let path = self.cookie_file.as_deref()?;
        let domain = domain?;
        let cookies = load_cookie_cache(path, domain)?;
        tracing::debug!("Using {} cached cookies from {}", cookies.len(), path.display());
        Some(cookies)
    }
}
