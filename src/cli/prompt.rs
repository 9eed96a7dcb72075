//! Line-based console prompts.

use console::style;
use std::io::{self, BufRead, Write};

/// Asks the user questions one line at a time.
pub trait Prompter {
    /// Show `question` and read one line of input, trimmed.
    ///
    /// Returns `None` once input is exhausted.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

/// Prompter backed by the process's stdin/stdout.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        print!("{} {} ", style("?").cyan(), question);
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            println!();
            return Ok(None);
        }

        Ok(Some(input.trim().to_string()))
    }
}

/// Whether an answer to a y/n question is affirmative.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        assert!(is_yes(" y "));
        assert!(!is_yes("yes"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
