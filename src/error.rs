// ABOUTME: Error types for the lexing, parsing, and evaluation pipeline

use std::fmt;
use thiserror::Error;

/// A record of one user-function invocation: the function's declared name
/// and the call site's position.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    pub name: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Error)]
pub enum LuxError {
    #[error("LexerError: {message} at {file}:{line}:{column}")]
    Lexer {
        message: String,
        file: String,
        line: u32,
        column: u32,
    },

    #[error("ParseError: {message} at {file}:{line}:{column}")]
    Parse {
        message: String,
        file: String,
        line: u32,
        column: u32,
    },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// A runtime failure enriched with its throw site and a snapshot of the
/// call-frame stack taken at throw time. User code catching the error via
/// `try`/`catch` sees only `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub stack: Vec<CallFrame>,
}

impl RuntimeError {
    /// An error with no position yet. The evaluator attributes it to the
    /// offending node before it propagates.
    pub fn bare(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
            file: String::new(),
            line: 0,
            column: 0,
            stack: Vec::new(),
        }
    }

    pub fn is_positioned(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuntimeError: {} at {}:{}:{}",
            self.message, self.file, self.line, self.column
        )?;
        // Innermost call first, like a conventional stack trace.
        for frame in self.stack.iter().rev() {
            write!(
                f,
                "\n  at {} ({}:{}:{})",
                frame.name, frame.file, frame.line, frame.column
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}
