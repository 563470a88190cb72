use lox_scanner::{scan, Error, Literal, Token, TokenKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scan_all(source: &str) -> (Vec<Token<'_>>, Vec<Error>) {
    let mut errors: Vec<Error> = Vec::new();
    let tokens = scan(source, &mut errors);
    (tokens, errors)
}

/// Returns true when `gap` is nothing but whitespace and line comments.
fn is_trivia(gap: &str) -> bool {
    let mut rest = gap;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ' ' || c == '\t' || c == '\r' || c == '\n');
        if rest.is_empty() {
            return true;
        }
        if !rest.starts_with("//") {
            return false;
        }
        rest = match rest.find('\n') {
            Some(i) => &rest[i..],
            None => "",
        };
    }
}

/// Error-free sources built from operators, words, comments and string
/// literals, some of which span lines.
fn clean_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z0-9_ \t\r\n(){},.;+*!=<>-]{1,8}",
            "\"[a-z @#/\n]{0,10}\"",
            "//[^\n\"]{0,10}\n",
            Just(" / ".to_string()),
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

#[test]
fn scans_a_small_program() {
    use TokenKind::*;
    let source = "fun add(a, b) {\n  return a + b; // sum\n}\nprint add(1, 2.5) >= \"x\";\n";
    let (tokens, errors) = scan_all(source);
    assert!(errors.is_empty());

    let summary: Vec<_> = tokens.iter().map(|t| (t.kind(), t.lexeme(), t.line())).collect();
    assert_eq!(
        vec![
            (Fun, "fun", 1), (Identifier, "add", 1), (LeftParen, "(", 1), (Identifier, "a", 1),
            (Comma, ",", 1), (Identifier, "b", 1), (RightParen, ")", 1), (LeftBrace, "{", 1),
            (Return, "return", 2), (Identifier, "a", 2), (Plus, "+", 2), (Identifier, "b", 2),
            (Semicolon, ";", 2),
            (RightBrace, "}", 3),
            (Print, "print", 4), (Identifier, "add", 4), (LeftParen, "(", 4), (Number, "1", 4),
            (Comma, ",", 4), (Number, "2.5", 4), (RightParen, ")", 4), (GreaterEqual, ">=", 4),
            (String, "\"x\"", 4), (Semicolon, ";", 4),
            (EndOfFile, "", 5),
        ],
        summary
    );
    assert_eq!(Some(&Literal::Number(2.5)), tokens[19].literal());
    assert_eq!(Some(&Literal::String("x".to_string())), tokens[22].literal());
}

#[test]
fn errors_do_not_stop_the_scan() {
    let (tokens, errors) = scan_all("var a = @;\n\"open");
    let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
    assert_eq!(
        vec![
            TokenKind::Var, TokenKind::Identifier, TokenKind::Equal,
            TokenKind::Semicolon, TokenKind::EndOfFile,
        ],
        kinds
    );
    let lines: Vec<_> = errors.iter().map(|e| e.line()).collect();
    assert_eq!(vec![Some(1), Some(2)], lines);
    assert_eq!("[line 2] Error: Unterminated string.", errors[1].to_string());
}

proptest! {
    #[test]
    fn always_ends_with_a_single_end_of_file(source in "(?s).{0,80}") {
        let (tokens, _) = scan_all(&source);
        let last = tokens.last().map(Token::kind);
        prop_assert_eq!(Some(TokenKind::EndOfFile), last);
        let eofs = tokens.iter().filter(|t| t.kind() == TokenKind::EndOfFile).count();
        prop_assert_eq!(1, eofs);
    }

    #[test]
    fn lexemes_are_the_source_at_their_offset(source in "(?s).{0,80}") {
        let (tokens, _) = scan_all(&source);
        for token in tokens.iter().filter(|t| t.kind() != TokenKind::EndOfFile) {
            prop_assert!(!token.lexeme().is_empty());
            let at = &source[token.offset()..token.offset() + token.lexeme().len()];
            prop_assert_eq!(at, token.lexeme());
        }
    }

    #[test]
    fn lines_and_columns_follow_consumed_newlines(source in "(?s).{0,80}") {
        let (tokens, _) = scan_all(&source);
        let mut previous = 1;
        for token in tokens.iter() {
            let before = &source[..token.offset()];
            let line = 1 + before.matches('\n').count();
            let line_start = before.rfind('\n').map_or(0, |i| i + 1);
            let column = 1 + before[line_start..].chars().count();
            prop_assert_eq!(line, token.line());
            prop_assert_eq!(column, token.column());
            prop_assert!(token.line() >= previous);
            previous = token.line();
        }
    }

    #[test]
    fn trivia_only_sources_scan_to_end_of_file(source in "([ \t\r\n]|//[^\n]*\n)*") {
        let (tokens, errors) = scan_all(&source);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(1, tokens.len());
        prop_assert_eq!(TokenKind::EndOfFile, tokens[0].kind());
        prop_assert_eq!(1 + source.matches('\n').count(), tokens[0].line());
    }

    #[test]
    fn gaps_between_tokens_are_trivia(source in clean_source()) {
        let (tokens, errors) = scan_all(&source);
        prop_assert!(errors.is_empty());
        let mut end = 0;
        for token in tokens.iter() {
            prop_assert!(is_trivia(&source[end..token.offset()]));
            end = token.offset() + token.lexeme().len();
        }
        prop_assert_eq!(source.len(), end);
    }

    #[test]
    fn string_tokens_hold_the_text_between_quotes(source in clean_source()) {
        let (tokens, _) = scan_all(&source);
        for token in tokens.iter().filter(|t| t.kind() == TokenKind::String) {
            let lexeme = token.lexeme();
            let inner = lexeme[1..lexeme.len() - 1].to_string();
            prop_assert_eq!(Some(&Literal::String(inner)), token.literal());
        }
    }

    #[test]
    fn lines_stay_monotonic_across_strings(source in clean_source()) {
        let (tokens, _) = scan_all(&source);
        let mut previous = 1;
        for token in tokens.iter() {
            let before = &source[..token.offset()];
            prop_assert_eq!(1 + before.matches('\n').count(), token.line());
            prop_assert!(token.line() >= previous);
            previous = token.line();
        }
        let last = tokens.last().map(Token::line);
        prop_assert_eq!(Some(1 + source.matches('\n').count()), last);
    }

    #[test]
    fn identifiers_scan_to_one_token(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        let (tokens, errors) = scan_all(&name);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(2, tokens.len());
        prop_assert_eq!(name.as_str(), tokens[0].lexeme());
        prop_assert!(tokens[0].kind() == TokenKind::Identifier || tokens[0].kind().is_keyword());
    }

    #[test]
    fn numbers_decode_to_their_value(n in 0u32..1_000_000, frac in 0u32..1000) {
        let source = format!("{}.{}", n, frac);
        let (tokens, errors) = scan_all(&source);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(2, tokens.len());
        let expected: f64 = source.parse().unwrap();
        prop_assert_eq!(Some(&Literal::Number(expected)), tokens[0].literal());
    }
}
