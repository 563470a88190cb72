pub mod error;
pub mod scanner;
pub mod token;

pub use crate::error::{Error, ErrorKind, Reporter, Result};
pub use crate::scanner::{scan, Scanner};
pub use crate::token::{Literal, Token, TokenKind};
