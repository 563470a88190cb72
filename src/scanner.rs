use crate::{
    error::Reporter,
    token::{Literal, Token, TokenKind},
};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::{iter::FusedIterator, str::CharIndices};
use tracing::{debug, trace};

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "class" => TokenKind::Class,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

/// Looks `text` up in the reserved word table.
pub fn keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}

/// Scans all of `source`, handing any lexical errors to `reporter`.
///
/// The result always ends in exactly one `EndOfFile` token.
pub fn scan<'a, R>(source: &'a str, reporter: &mut R) -> Vec<Token<'a>>
where
    R: Reporter + ?Sized,
{
    Scanner::new(source, reporter).scan_tokens()
}

/// Single pass tokenizer over an in-memory source buffer.
///
/// Iterating a `Scanner` yields every token in order, then one
/// `EndOfFile` token, then nothing.
pub struct Scanner<'a, 'r, R: ?Sized> {
    source: &'a str,
    src: PeekMoreIterator<CharIndices<'a>>,
    reporter: &'r mut R,
    start: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    error_count: usize,
    finished: bool,
}

impl <'a, 'r, R: Reporter + ?Sized> Iterator for Scanner<'a, 'r, R> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.is_at_end() {
                if self.finished {
                    return None;
                }
                self.finished = true;
                return Some(self.end_of_file());
            }

            self.start = self.current();
            self.start_line = self.line;
            self.start_column = self.column;

            if let Some(token) = self.next_token() {
                return Some(token);
            }
        }
    }
}

impl <'a, 'r, R: Reporter + ?Sized> FusedIterator for Scanner<'a, 'r, R> {}

impl <'a, 'r, R: Reporter + ?Sized> Scanner<'a, 'r, R> {
    pub fn new(source: &'a str, reporter: &'r mut R) -> Self {
        Self {
            source,
            src: source.char_indices().peekmore(),
            reporter,
            start: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            error_count: 0,
            finished: false,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(len = self.source.len()))]
    pub fn scan_tokens(mut self) -> Vec<Token<'a>> {
        let tokens: Vec<Token<'a>> = self.by_ref().collect();
        debug!(tokens = tokens.len(), errors = self.error_count, "scan complete");
        tokens
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        let next_char = self.advance()?;

        use TokenKind::*;
        let kind = match next_char {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,
            '!' => if self.does_next_match('=') { BangEqual } else { Bang },
            '=' => if self.does_next_match('=') { EqualEqual } else { Equal },
            '<' => if self.does_next_match('=') { LessEqual } else { Less },
            '>' => if self.does_next_match('=') { GreaterEqual } else { Greater },
            '/' => {
                if self.does_next_match('/') { // comments run to the end of the line
                    self.advance_until(|n| n == '\n');
                    return None;
                }
                Slash
            },
            ' ' | '\r' | '\t' | '\n' => return None,
            '"' => return self.extract_string(),
            c if c.is_ascii_digit() => return self.extract_number(),
            c if can_start_identifier(c) => self.extract_identifier(),
            c => {
                self.error(format!("Unexpected character '{}'.", c));
                return None;
            },
        };

        Some(self.make_token(kind, None))
    }

    fn extract_string(&mut self) -> Option<Token<'a>> {
        self.advance_until(|n| n == '"');

        if self.advance().is_none() {
            self.error("Unterminated string.");
            return None;
        }

        // Both quotes are single bytes.
        let end = self.current() - 1;
        let source = self.source;
        let value = &source[self.start + 1..end];
        let literal = Literal::String(value.to_string());
        Some(self.make_token(TokenKind::String, Some(literal)))
    }

    fn extract_number(&mut self) -> Option<Token<'a>> {
        self.advance_until(|n| !n.is_ascii_digit());

        let has_fraction = self.peek() == Some('.')
            && self.peek_next().map_or(false, |n| n.is_ascii_digit());
        if has_fraction {
            self.advance();
            self.advance_until(|n| !n.is_ascii_digit());
        }

        // Digits with an optional fraction always parse; huge values round.
        let lexeme = self.lexeme();
        match lexeme.parse() {
            Ok(number) => Some(self.make_token(TokenKind::Number, Some(Literal::Number(number)))),
            Err(_) => {
                self.error(format!("Could not convert {} into a number.", lexeme));
                None
            },
        }
    }

    fn extract_identifier(&mut self) -> TokenKind {
        self.advance_until(|n| !is_part_of_valid_identifier(n));
        keyword(self.lexeme()).unwrap_or(TokenKind::Identifier)
    }

    fn make_token(&mut self, kind: TokenKind, literal: Option<Literal>) -> Token<'a> {
        Token {
            kind,
            lexeme: self.lexeme(),
            literal,
            line: self.start_line,
            column: self.start_column,
            offset: self.start,
        }
    }

    fn end_of_file(&self) -> Token<'a> {
        Token {
            kind: TokenKind::EndOfFile,
            lexeme: "",
            literal: None,
            line: self.line,
            column: self.column,
            offset: self.source.len(),
        }
    }

    fn error<S: AsRef<str>>(&mut self, message: S) {
        let message = message.as_ref();
        trace!(line = self.line, reason = message, "lexical error");
        self.error_count += 1;
        self.reporter.report(self.line, message);
    }

    fn lexeme(&mut self) -> &'a str {
        let source = self.source;
        &source[self.start..self.current()]
    }

    /// Byte offset of the next unconsumed character.
    fn current(&mut self) -> usize {
        self.src.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn is_at_end(&mut self) -> bool {
        self.src.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.src.peek().map(|&(_, c)| c)
    }

    fn peek_next(&mut self) -> Option<char> {
        self.src.peek_nth(1).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.src.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn does_next_match(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_until(&mut self, should_stop: impl Fn(char) -> bool) {
        while let Some(next) = self.peek() {
            if should_stop(next) {
                break;
            }
            self.advance();
        }
    }
}

fn can_start_identifier(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_part_of_valid_identifier(c: char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}
