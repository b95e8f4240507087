use std::io::{self, BufRead, Write};

use crate::ops::inbox_ops::Prompter;

/// Prompts on stderr, answers from stdin, messages on stdout
pub struct StdinPrompter<R> {
    input: R,
}

impl StdinPrompter<io::StdinLock<'static>> {
    pub fn new() -> Self {
        StdinPrompter {
            input: io::stdin().lock(),
        }
    }
}

impl Default for StdinPrompter<io::StdinLock<'static>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinPrompter<R> {
    pub fn from_reader(input: R) -> Self {
        StdinPrompter { input }
    }

    /// Ask a yes/no question. Only `y` or `yes` counts as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(&format!("{} [y/N] ", question))?
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

impl<R: BufRead> Prompter for StdinPrompter<R> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        eprint!("{}", question);
        io::stderr().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            eprintln!();
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        eprintln!("warning: {}", message);
    }
}
