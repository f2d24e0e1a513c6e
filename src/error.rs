use std::fmt;
use thiserror::Error;

/// Location in source code for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// All error types for tinyawk
#[derive(Error, Debug)]
pub enum Error {
    #[error("lexical error at {location}: illegal character '{character}'")]
    Lexical {
        character: char,
        location: SourceLocation,
    },

    #[error("syntax error at {location}: {message}")]
    Syntax {
        message: String,
        location: SourceLocation,
    },

    #[error("type error: cannot increment or decrement '{name}' holding non-numeric value \"{found}\"")]
    RuntimeType { name: String, found: String },

    #[error("error applying operator '{operator}': {cause}")]
    Operator { operator: &'static str, cause: String },

    #[error("break at {location} is not inside a for loop")]
    UnhandledBreak { location: SourceLocation },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn lexical(character: char, line: usize, column: usize) -> Self {
        Self::Lexical {
            character,
            location: SourceLocation::new(line, column),
        }
    }

    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Syntax {
            message: message.into(),
            location,
        }
    }

    pub fn operator(operator: &'static str, cause: impl Into<String>) -> Self {
        Self::Operator {
            operator,
            cause: cause.into(),
        }
    }

    /// True for errors raised while running a program, as opposed to
    /// building one from source.
    pub fn is_runtime(&self) -> bool {
        !matches!(self, Error::Lexical { .. } | Error::Syntax { .. })
    }
}

/// Result type alias for tinyawk operations
pub type Result<T> = std::result::Result<T, Error>;
