use std::result;
use std::fmt::{self, Display};

pub type Result<T> = result::Result<T, Error>;

/// The sink the scanner hands lexical errors to.
///
/// The scanner never prints or stops on its own; whoever owns the reporter
/// decides what to do once the scan has finished.
pub trait Reporter {
    fn report(&mut self, line: usize, message: &str);
}

impl <F> Reporter for F where F: FnMut(usize, &str) {
    fn report(&mut self, line: usize, message: &str) {
        self(line, message)
    }
}

impl Reporter for Vec<Error> {
    fn report(&mut self, line: usize, message: &str) {
        self.push(Error::lexical(line, message));
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Lexical { line: usize },
    Io(std::io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical<S: Into<String>>(line: usize, message: S) -> Error {
        let kind = ErrorKind::Lexical { line };
        Error { kind, message: message.into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<usize> {
        match self.kind() {
            ErrorKind::Lexical { line } => Some(*line),
            ErrorKind::Io(_) => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ErrorKind::Lexical { line } => write!(f, "[line {}] Error: {}", line, self.message),
            ErrorKind::Io(e) => write!(f, "{}: {}", self.message, e),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        use std::io::ErrorKind::*;
        match e.kind {
            ErrorKind::Io(inner) => inner,
            _ => std::io::Error::new(Other, e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error { kind: ErrorKind::Io(e), message: "IO error".into() }
    }
}
