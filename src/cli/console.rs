//! Line-oriented console I/O and input validation for the interactive menu.
//!
//! [`Console`] wraps any buffered reader and writer so the menu can be driven by stdin and
//! stdout in production and by scripted input in tests. End of input is reported as `None`
//! from every prompt, which the menus treat as "go back".

use crate::errors::Result;
use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // The pattern is a compile-time constant
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Prompt-and-read wrapper around an input and an output stream.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console reading from `input` and writing to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    /// Shows `prompt` and reads one trimmed line. Returns `None` at end of input.
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Console::prompt`], but asks again until the answer is non-empty.
    pub fn prompt_required(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.prompt(prompt)? {
                None => return Ok(None),
                Some(answer) if answer.is_empty() => {
                    self.say("Input cannot be empty. Please try again.")?;
                }
                Some(answer) => return Ok(Some(answer)),
            }
        }
    }

    /// Asks until the answer is non-empty and accepted by `parse`.
    ///
    /// Parse failures are shown to the user and the question is repeated.
    pub fn prompt_parsed<T, F>(&mut self, prompt: &str, parse: F) -> Result<Option<T>>
    where
        F: Fn(&str) -> std::result::Result<T, String>,
    {
        loop {
            let Some(answer) = self.prompt_required(prompt)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => self.say(format!("Error: {message}"))?,
            }
        }
    }

    /// Asks a yes/no question; only an explicit `yes` counts as agreement.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} (yes/no): "))?;
        Ok(answer.is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }

    /// Consumes the console and hands back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Checks that `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Parser for [`Console::prompt_parsed`] that accepts well-formed emails.
pub fn parse_email(input: &str) -> std::result::Result<String, String> {
    if is_valid_email(input) {
        Ok(input.to_string())
    } else {
        Err("Please enter a valid email address".to_string())
    }
}

/// Parser for record identifiers.
pub fn parse_id(input: &str) -> std::result::Result<i64, String> {
    input
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| "Please enter a valid ID".to_string())
}

/// Parses a strictly positive, finite money amount.
pub fn parse_positive_amount(input: &str) -> std::result::Result<f64, String> {
    let amount: f64 = input
        .parse()
        .map_err(|_| "Please enter a valid number".to_string())?;
    if !amount.is_finite() {
        return Err("Please enter a valid number".to_string());
    }
    if amount <= 0.0 {
        return Err("Amount must be positive".to_string());
    }
    Ok(amount)
}

/// Interprets the optional budget answer.
///
/// An empty answer means no budget. Unparsable or negative answers also fall back to no
/// budget; the second element then carries the note to show the user.
#[must_use]
pub fn parse_budget(input: &str) -> (f64, Option<&'static str>) {
    if input.is_empty() {
        return (0.0, None);
    }
    match input.parse::<f64>() {
        Ok(limit) if !limit.is_finite() => (0.0, Some("Invalid budget amount. Setting to 0.")),
        Ok(limit) if limit < 0.0 => (0.0, Some("Budget limit cannot be negative. Setting to 0.")),
        Ok(limit) => (limit, None),
        Err(_) => (0.0, Some("Invalid budget amount. Setting to 0.")),
    }
}
