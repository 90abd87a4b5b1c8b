//! Integer I/O for the `GET` and `PRINT` built-ins
//!
//! - [`StdConsole`]: standard input and output of the process
//! - [`ScriptedConsole`]: queued input and captured output, used by tests

use crate::interpreter::constants::INPUT_PROMPT;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Source of input integers and sink of output integers
pub trait Console {
    /// Next input integer, or `None` when input is exhausted or malformed
    fn read_int(&mut self) -> Option<i32>;

    /// Emit one integer
    fn write_int(&mut self, value: i32);
}

/// Console backed by the process's stdin and stdout.
///
/// Input is read as whitespace-separated integers, a line at a time, with a
/// prompt on stderr before each value. Every output integer is written on its
/// own line and flushed immediately.
#[derive(Debug, Default)]
pub struct StdConsole {
    pending: VecDeque<String>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&mut self) -> Option<String> {
        let stdin = io::stdin();
        while self.pending.is_empty() {
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_string)),
                Err(err) => {
                    warn!(%err, "failed to read standard input");
                    return None;
                }
            }
        }
        self.pending.pop_front()
    }
}

impl Console for StdConsole {
    fn read_int(&mut self) -> Option<i32> {
        if self.pending.is_empty() {
            let mut stderr = io::stderr().lock();
            if let Err(err) = write!(stderr, "{}", INPUT_PROMPT).and_then(|_| stderr.flush()) {
                warn!(%err, "failed to write input prompt");
            }
        }

        let token = self.next_token()?;
        match token.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(token = %token, "input is not an integer");
                None
            }
        }
    }

    fn write_int(&mut self, value: i32) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", value).and_then(|_| stdout.flush()) {
            warn!(%err, "failed to write standard output");
        }
    }
}

/// In-memory console with a fixed input script
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    input: VecDeque<i32>,
    output: Vec<i32>,
}

impl ScriptedConsole {
    pub fn new(input: impl IntoIterator<Item = i32>) -> Self {
        ScriptedConsole {
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }

    /// Everything written so far, in order
    pub fn output(&self) -> &[i32] {
        &self.output
    }

    /// Input values not consumed yet
    #[cfg(test)]
    pub(crate) fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_int(&mut self) -> Option<i32> {
        self.input.pop_front()
    }

    fn write_int(&mut self, value: i32) {
        self.output.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console() {
        let mut console = ScriptedConsole::new([4, -2]);
        assert_eq!(console.read_int(), Some(4));
        console.write_int(10);
        assert_eq!(console.remaining_input(), 1);
        assert_eq!(console.read_int(), Some(-2));
        assert_eq!(console.read_int(), None);
        assert_eq!(console.output(), &[10]);
    }
}
