//! SQL tokenizer for the formatting pipeline.
//!
//! The single entry point, [`tokenize`], turns source text into a flat
//! stream of [`Token`]s carrying their text and zero-based line/column
//! spans. Whitespace and comments are emitted as tokens so downstream
//! stages can decide what to keep.
//!
//! # Usage
//!
//! ```
//! let tokens = plane_lexer::tokenize("SELECT 1").unwrap();
//! assert_eq!(tokens.len(), 3);
//! ```

mod cursor;

use cursor::Cursor;
use plane_syntax::{Pos, Token, TokenKind};

/// Tokenization failure, reported with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub message: String,
    pub pos: Pos,
}

impl TokenizeError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tokenize error at {}:{}: {}",
            self.pos.line, self.pos.col, self.message
        )
    }
}

impl std::error::Error for TokenizeError {}

pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);

    while !cursor.is_eof() {
        let start = cursor.offset();
        let pos = cursor.pos();
        let kind = scan_token(&mut cursor)?;
        tokens.push(Token::new(kind, cursor.slice_from(start), pos, cursor.pos()));
    }

    Ok(tokens)
}

fn scan_token(c: &mut Cursor<'_>) -> Result<TokenKind, TokenizeError> {
    let first = c.first();

    if first.is_whitespace() {
        return Ok(scan_whitespace(c));
    }

    // Line comment: --
    if first == '-' && c.second() == '-' {
        return Ok(scan_line_comment(c));
    }

    // Block comment: /* */
    if first == '/' && c.second() == '*' {
        return Ok(scan_block_comment(c));
    }

    // String literal: 'text'
    if first == '\'' {
        return scan_string(c, TokenKind::SingleQuotedString);
    }

    // National string literal: N'text'
    if (first == 'n' || first == 'N') && c.second() == '\'' {
        c.bump(); // N
        return scan_string(c, TokenKind::NationalStringLiteral);
    }

    // Quoted identifier: "name" (quotes kept in the token text)
    if first == '"' {
        return Ok(scan_quoted_word(c));
    }

    // Numbers: digits or .digits
    if first.is_ascii_digit() {
        return Ok(scan_number(c));
    }
    if first == '.' && c.second().is_ascii_digit() {
        return Ok(scan_number(c));
    }

    if is_word_start(first) {
        return Ok(scan_word(c));
    }

    Ok(scan_operator_or_punct(c))
}

fn scan_whitespace(c: &mut Cursor<'_>) -> TokenKind {
    c.bump_while(char::is_whitespace);
    TokenKind::Whitespace
}

fn scan_line_comment(c: &mut Cursor<'_>) -> TokenKind {
    c.bump(); // -
    c.bump(); // -
    c.bump_while(|ch| ch != '\n');
    TokenKind::Comment
}

fn scan_block_comment(c: &mut Cursor<'_>) -> TokenKind {
    c.bump(); // /
    c.bump(); // *
    let mut depth = 1;

    while !c.is_eof() && depth > 0 {
        if c.first() == '/' && c.second() == '*' {
            c.bump();
            c.bump();
            depth += 1;
        } else if c.first() == '*' && c.second() == '/' {
            c.bump();
            c.bump();
            depth -= 1;
        } else {
            c.bump();
        }
    }
    TokenKind::Comment
}

fn scan_string(c: &mut Cursor<'_>, kind: TokenKind) -> Result<TokenKind, TokenizeError> {
    let start = c.pos();
    c.bump(); // opening '
    loop {
        match c.first() {
            '\'' => {
                c.bump();
                // Escaped quote ''
                if c.first() == '\'' {
                    c.bump();
                    continue;
                }
                return Ok(kind);
            }
            '\0' if c.is_eof() => {
                return Err(TokenizeError::new("unterminated string literal", start));
            }
            _ => {
                c.bump();
            }
        }
    }
}

fn scan_quoted_word(c: &mut Cursor<'_>) -> TokenKind {
    c.bump(); // opening "
    loop {
        match c.first() {
            '"' => {
                c.bump();
                // Escaped quote ""
                if c.first() == '"' {
                    c.bump();
                    continue;
                }
                break;
            }
            '\0' if c.is_eof() => break,
            _ => {
                c.bump();
            }
        }
    }
    TokenKind::Word
}

fn scan_number(c: &mut Cursor<'_>) -> TokenKind {
    if c.first() == '.' {
        // Leading-dot form: .5
        c.bump();
        c.bump_while(|ch| ch.is_ascii_digit());
    } else {
        c.bump_while(|ch| ch.is_ascii_digit());
        if c.first() == '.' && c.second().is_ascii_digit() {
            c.bump();
            c.bump_while(|ch| ch.is_ascii_digit());
        }
    }

    // Exponent part
    if c.first() == 'e' || c.first() == 'E' {
        let next = c.second();
        if next.is_ascii_digit() || next == '+' || next == '-' {
            c.bump();
            if c.first() == '+' || c.first() == '-' {
                c.bump();
            }
            c.bump_while(|ch| ch.is_ascii_digit());
        }
    }

    TokenKind::Number
}

fn scan_word(c: &mut Cursor<'_>) -> TokenKind {
    c.bump();
    c.bump_while(is_word_continue);
    TokenKind::Word
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_word_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn scan_operator_or_punct(c: &mut Cursor<'_>) -> TokenKind {
    let first = c.first();
    let second = c.second();

    // Two-character comparisons
    match (first, second) {
        ('<', '>') | ('!', '=') => {
            c.bump();
            c.bump();
            return TokenKind::Neq;
        }
        ('<', '=') => {
            c.bump();
            c.bump();
            return TokenKind::LtEq;
        }
        ('>', '=') => {
            c.bump();
            c.bump();
            return TokenKind::GtEq;
        }
        _ => {}
    }

    c.bump();
    match first {
        '=' => TokenKind::Eq,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Mult,
        '/' => TokenKind::Div,
        '%' => TokenKind::Mod,
        '.' => TokenKind::Period,
        ',' => TokenKind::Comma,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        ';' => TokenKind::Semicolon,
        _ => TokenKind::Char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plane_syntax::TokenKind::*;

    fn token_kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn token_texts(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            token_kinds("SELECT * FROM users"),
            vec![Word, Whitespace, Mult, Whitespace, Word, Whitespace, Word]
        );
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(token_kinds("a  \n\t b"), vec![Word, Whitespace, Word]);
        assert_eq!(token_texts("a  \n\t b")[1], "  \n\t ");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(token_kinds("= <> != < > <= >=").len(), 13);
        assert_eq!(token_kinds("<>"), vec![Neq]);
        assert_eq!(token_kinds("!="), vec![Neq]);
        assert_eq!(token_kinds("<="), vec![LtEq]);
        assert_eq!(token_kinds(">="), vec![GtEq]);
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(token_kinds("a+b-c*d/e%f").len(), 11);
        assert_eq!(token_kinds("+"), vec![Plus]);
        assert_eq!(token_kinds("%"), vec![Mod]);
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(token_kinds("'hello'"), vec![SingleQuotedString]);
        assert_eq!(token_kinds("'it''s'"), vec![SingleQuotedString]); // escaped quote
        assert_eq!(token_kinds("N'text'"), vec![NationalStringLiteral]);
        assert_eq!(token_kinds("n'text'"), vec![NationalStringLiteral]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = tokenize("SELECT 'oops").unwrap_err();
        assert_eq!(err.pos, Pos::new(0, 7));
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(token_kinds("\"Column Name\""), vec![Word]);
        assert_eq!(token_texts("\"a\"\"b\""), vec!["\"a\"\"b\""]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(token_kinds("42"), vec![Number]);
        assert_eq!(token_kinds("3.14"), vec![Number]);
        assert_eq!(token_kinds(".5"), vec![Number]);
        assert_eq!(token_kinds("1e10"), vec![Number]);
        assert_eq!(token_kinds("1.5e-3"), vec![Number]);
    }

    #[test]
    fn test_member_access_is_not_a_number() {
        assert_eq!(token_kinds("t.id"), vec![Word, Period, Word]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(token_kinds("-- comment"), vec![Comment]);
        assert_eq!(token_kinds("/* block */"), vec![Comment]);
        assert_eq!(token_kinds("/* nested /* comment */ */"), vec![Comment]);
        assert_eq!(token_kinds("a -- c\nb"), vec![Word, Whitespace, Comment, Whitespace, Word]);
    }

    #[test]
    fn test_unknown_characters() {
        assert_eq!(token_kinds("@"), vec![Char]);
        assert_eq!(token_kinds("!"), vec![Char]);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("ab\ncd").unwrap();
        assert_eq!(tokens[0].pos, Pos::new(0, 0));
        assert_eq!(tokens[0].end, Pos::new(0, 2));
        assert_eq!(tokens[2].pos, Pos::new(1, 0));
        assert_eq!(tokens[2].end, Pos::new(1, 2));
    }

    #[test]
    fn test_text_roundtrip() {
        let source = "SELECT a, b FROM t WHERE a <= 10; -- done";
        let joined: String = token_texts(source).concat();
        assert_eq!(joined, source);
    }

    fn dump_tokens(source: &str) -> String {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| format!("{:?}({:?})", t.kind, t.text))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn snapshot_select_tokens() {
        insta::assert_snapshot!(
            dump_tokens("SELECT id FROM t"),
            @r#"Word("SELECT") Whitespace(" ") Word("id") Whitespace(" ") Word("FROM") Whitespace(" ") Word("t")"#
        );
    }

    #[test]
    fn snapshot_operator_tokens() {
        insta::assert_snapshot!(
            dump_tokens("a<>1"),
            @r#"Word("a") Neq("<>") Number("1")"#
        );
    }
}
