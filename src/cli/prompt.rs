use std::io::ErrorKind;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use crate::error::TransferError;
use crate::ports::prompt::Prompter;

/// Interactive terminal prompts. Esc on a list or Ctrl-C anywhere cancels the action.
pub struct DialoguerPrompter;

fn prompt_error(error: dialoguer::Error) -> TransferError {
    let dialoguer::Error::IO(error) = error;
    if error.kind() == ErrorKind::Interrupted {
        TransferError::Cancelled
    } else {
        TransferError::Prompt(error.to_string())
    }
}

impl Prompter for DialoguerPrompter {
    fn select(&self, message: &str, choices: &[String]) -> Result<usize, TransferError> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or(TransferError::Cancelled)
    }

    fn input(&self, message: &str) -> Result<String, TransferError> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }

    fn password(&self, message: &str) -> Result<String, TransferError> {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", message);
    }
}
