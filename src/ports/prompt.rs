use crate::error::TransferError;

/// Port trait for everything the pipelines ask the operator.
///
/// Every question may answer `TransferError::Cancelled`, which ends the whole
/// action. The terminal implementation lives in `cli::prompt`.
pub trait Prompter: Send + Sync {
    /// Returns the index of the chosen entry.
    fn select(&self, message: &str, choices: &[String]) -> Result<usize, TransferError>;

    fn input(&self, message: &str) -> Result<String, TransferError>;

    fn password(&self, message: &str) -> Result<String, TransferError>;

    /// Status text for the operator.
    fn notify(&self, message: &str);

    /// Problem text for the operator; the action keeps going.
    fn warn(&self, message: &str);
}

/// Asks until `is_valid` accepts the answer, warning with `invalid_message` in between.
pub fn input_until(
    prompter: &dyn Prompter,
    message: &str,
    invalid_message: &str,
    is_valid: impl Fn(&str) -> bool,
) -> Result<String, TransferError> {
    loop {
        let answer = prompter.input(message)?;
        let answer = answer.trim();
        if is_valid(answer) {
            return Ok(answer.to_string());
        }
        prompter.warn(invalid_message);
    }
}

pub fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Answer, ScriptedPrompter};

    #[test]
    fn test_input_until_reprompts_on_invalid_answer() {
        let prompter = ScriptedPrompter::new(vec![
            Answer::text("abc"),
            Answer::text(""),
            Answer::text(" 123 "),
        ]);

        let answer = input_until(&prompter, "id?", "bad id", is_numeric_id).unwrap();

        assert_eq!(answer, "123");
        assert_eq!(prompter.warnings(), vec!["bad id", "bad id"]);
    }

    #[test]
    fn test_input_until_propagates_cancel() {
        let prompter = ScriptedPrompter::new(vec![Answer::Cancel]);

        let result = input_until(&prompter, "id?", "bad id", is_numeric_id);

        assert!(matches!(result, Err(TransferError::Cancelled)));
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("0042"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("12a"));
        assert!(!is_numeric_id("-1"));
    }
}
