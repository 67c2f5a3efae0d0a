//! SQL tokenizer.
//!
//! Dialect-aware: identifier-quote and string-quote characters come from
//! the active [`Dialect`], so the same scanner handles `"name"`, `` `name` ``
//! and MySQL's double-quoted strings without forking.

use super::{Keyword, Span, Token, TokenKind};
use crate::dialect::Dialect;
use crate::error::LexError;

/// A lexer that tokenizes SQL input under one dialect's quoting rules.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// Grammar parameters for the active dialect.
    dialect: &'a Dialect,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// 1-based line of `pos`.
    line: u32,
    /// 1-based column of `pos`.
    column: u32,
    /// Position of the current token start.
    token_line: u32,
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str, dialect: &'a Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // Single-line comments (-- ...)
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Multi-line comments (/* ... */)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token covering the current token's span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(self.start, self.pos),
            self.token_line,
            self.token_column,
        )
    }

    /// Creates a lex error at the current token's start position.
    fn error(&self, message: impl Into<String>) -> LexError {
        LexError::new(message, self.token_line, self.token_column)
    }

    /// Scans an identifier or keyword under the dialect's keyword set.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match self.dialect.keyword(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(String::from(text))),
        }
    }

    /// Scans a quoted identifier; the closing quote doubles to escape.
    fn scan_quoted_identifier(&mut self, quote: char) -> Result<Token, LexError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        name.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    name.push(c);
                    self.advance();
                }
                None => return Err(self.error("Unterminated quoted identifier")),
            }
        }

        self.advance(); // closing quote
        Ok(self.make_token(TokenKind::Identifier(name)))
    }

    /// Scans a string literal; the closing quote doubles to escape.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return Err(self.error("Unterminated string literal")),
            }
        }

        self.advance(); // closing quote
        Ok(self.make_token(TokenKind::String(value)))
    }

    /// Scans a numeric literal (integer or float, optional exponent,
    /// optional dialect-specific suffix letter).
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[self.start..self.pos];

        // A suffix letter is consumed but does not change the value.
        if self
            .peek()
            .is_some_and(|c| self.dialect.numeric_suffixes.contains(&c))
        {
            self.advance();
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(f) => Ok(self.make_token(TokenKind::Float(f))),
                Err(e) => Err(self.error(format!("Invalid numeric literal: {e}"))),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => Ok(self.make_token(TokenKind::Integer(i))),
                Err(e) => Err(self.error(format!("Invalid numeric literal: {e}"))),
            }
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on an unterminated string or quoted
    /// identifier, or on a character outside every recognized class.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();
        self.start = self.pos;
        self.token_line = self.line;
        self.token_column = self.column;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        // Dialect-specific quoting first: in MySQL `"` opens a string,
        // elsewhere it opens an identifier.
        if self.dialect.is_string_quote(c) {
            self.advance();
            return self.scan_string(c);
        }
        if self.dialect.is_ident_quote(c) {
            self.advance();
            return self.scan_quoted_identifier(c);
        }

        if c.is_ascii_digit() {
            return self.scan_number();
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.scan_word());
        }

        self.advance();
        let token = match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '=' => self.make_token(TokenKind::Eq),
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    return Err(self.error("Unexpected character: !"));
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    return Err(self.error("Unexpected character: |"));
                }
            }
            _ => return Err(self.error(format!("Unexpected character: {c}"))),
        };
        Ok(token)
    }

    /// Tokenizes the entire input, ending with the `Eof` sentinel.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

/// Tokenizes `text` under `dialect`, producing a sentinel-terminated
/// token stream.
///
/// # Errors
///
/// Returns a [`LexError`] with the position of the offending token start.
pub fn tokenize(text: &str, dialect: &Dialect) -> Result<Vec<Token>, LexError> {
    Lexer::new(text, dialect).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GENERIC, MYSQL, SQLITE};

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, &GENERIC)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("", &GENERIC).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("SELECT name FROM users"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Identifier(String::from("name")),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Identifier(String::from("users")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("SELECT -- trailing\n/* block */ 1"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.14 2.5e-3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.14),
                TokenKind::Float(2.5e-3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            kinds("'it''s'"),
            vec![TokenKind::String(String::from("it's")), TokenKind::Eof]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= != <> < <= > >= ||"),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = tokenize("SELECT id\nFROM users", &GENERIC).unwrap();
        let from = &tokens[2];
        assert_eq!(from.kind, TokenKind::Keyword(Keyword::From));
        assert_eq!((from.line, from.column), (2, 1));
        let users = &tokens[3];
        assert_eq!((users.line, users.column), (2, 6));
    }

    #[test]
    fn test_eof_position_is_past_last_token() {
        let tokens = tokenize("SELECT * FROM users WHERE", &GENERIC).unwrap();
        let eof = tokens.last().unwrap();
        assert!(eof.is_eof());
        assert_eq!((eof.line, eof.column), (1, 26));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("SELECT 'oops", &GENERIC).unwrap_err();
        assert_eq!(err.message, "Unterminated string literal");
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn test_unterminated_quoted_identifier() {
        let err = tokenize("SELECT \"name FROM t", &GENERIC).unwrap_err();
        assert_eq!(err.message, "Unterminated quoted identifier");
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("SELECT #", &GENERIC).unwrap_err();
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn test_dialect_quoting_mysql() {
        // Backticks quote identifiers; double quotes are strings.
        let tokens = tokenize("`order` \"text\"", &MYSQL).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier(String::from("order")));
        assert_eq!(tokens[1].kind, TokenKind::String(String::from("text")));

        // Under the generic dialect the same input is an error (backtick
        // is not a recognized character class there).
        assert!(tokenize("`order`", &GENERIC).is_err());
    }

    #[test]
    fn test_dialect_quoting_sqlite_accepts_both() {
        let tokens = tokenize("`a` \"b\"", &SQLITE).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier(String::from("a")));
        assert_eq!(tokens[1].kind, TokenKind::Identifier(String::from("b")));
    }

    #[test]
    fn test_extension_keyword_lexing() {
        use crate::dialect::POSTGRES;
        let pg = tokenize("a ILIKE b", &POSTGRES).unwrap();
        assert_eq!(pg[1].kind, TokenKind::Keyword(Keyword::Ilike));
        let generic = tokenize("a ILIKE b", &GENERIC).unwrap();
        assert_eq!(generic[1].kind, TokenKind::Identifier(String::from("ILIKE")));
    }

    #[test]
    fn test_numeric_suffix_hook() {
        use crate::dialect::{ConcatStyle, Dialect, DialectFlags, IlikeStyle, RenderRules};
        static SUFFIXED: Dialect = Dialect {
            name: "suffixed",
            ident_quotes: &['"'],
            string_quotes: &['\''],
            numeric_suffixes: &['L'],
            extension_keywords: &[],
            flags: DialectFlags {
                recursive_ctes: false,
                limit_comma_offset: false,
            },
            infix_overrides: &[],
            render: RenderRules {
                ident_quote: '"',
                right_join: true,
                full_join: true,
                ilike: IlikeStyle::LowerLike,
                concat: ConcatStyle::Operator,
                function_renames: &[],
            },
        };
        let tokens = tokenize("42L", &SUFFIXED).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer(42));
        assert_eq!(tokens.len(), 2);
    }
}
