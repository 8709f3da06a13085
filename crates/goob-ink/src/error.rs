use std::fmt;

/// An error raised while lexing, parsing, or executing an `.ink` script.
#[derive(Debug, Clone, PartialEq)]
pub enum InkError {
    /// Invalid character, directive, or indentation.
    Lex {
        message: String,
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        col: usize,
    },
    /// Token stream does not match the grammar.
    Parse {
        message: String,
        line: usize,
        col: usize,
    },
    /// Unknown name or invalid assignment target at execution time.
    Runtime { message: String },
}

impl InkError {
    pub(crate) fn lex(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self::Lex { message: msg.into(), line, col }
    }

    pub(crate) fn parse(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self::Parse { message: msg.into(), line, col }
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime { message: msg.into() }
    }

    /// Source position of the error, when it has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Lex { line, col, .. } | Self::Parse { line, col, .. } => Some((*line, *col)),
            Self::Runtime { .. } => None,
        }
    }
}

impl fmt::Display for InkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { message, line, col } => {
                write!(f, "ink lex error at {line}:{col}: {message}")
            }
            Self::Parse { message, line, col } => {
                write!(f, "ink parse error at {line}:{col}: {message}")
            }
            Self::Runtime { message } => write!(f, "ink runtime error: {message}"),
        }
    }
}

impl std::error::Error for InkError {}
