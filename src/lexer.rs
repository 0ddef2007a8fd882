// ABOUTME: Lexer converting Lux source text into a token stream

use crate::error::LuxError;
use crate::token::{keyword_kind, Token, TokenKind};

/// Scans a source string into tokens. The filename is used only for error
/// attribution.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    file: String,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str, file: impl Into<String>) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            file: file.into(),
            tokens: Vec::new(),
        }
    }

    /// Consumes the lexer and produces the token sequence, always terminated
    /// by an end-of-input token at the final position.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LuxError> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.push(TokenKind::Newline, "\n", line, column);
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '"' => self.lex_string()?,
                c if c.is_ascii_digit() => self.lex_number(),
                c if c.is_alphabetic() || c == '_' => self.lex_identifier(),
                _ => self.lex_operator()?,
            }
        }

        self.push(TokenKind::Eof, "", self.line, self.column);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> char {
        let c = self.chars[self.pos];
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) {
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    fn error_at(&self, message: String, line: u32, column: u32) -> LuxError {
        LuxError::Lexer {
            message,
            file: self.file.clone(),
            line,
            column,
        }
    }

    fn lex_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(self.bump());
        }

        // A '.' is part of the number only when a digit follows.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.bump());
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                text.push(self.bump());
            }
        }

        self.push(TokenKind::Number, text, line, column);
    }

    fn lex_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            text.push(self.bump());
        }

        let kind = keyword_kind(&text).unwrap_or(TokenKind::Ident);
        self.push(kind, text, line, column);
    }

    fn lex_string(&mut self) -> Result<(), LuxError> {
        let (line, column) = (self.line, self.column);
        self.bump(); // opening quote

        let mut text = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error_at("Unterminated string".to_string(), line, column));
            };
            match c {
                '"' => {
                    self.bump();
                    break;
                }
                '\\' => {
                    self.bump();
                    let Some(escaped) = self.peek() else {
                        return Err(self.error_at("Unterminated string".to_string(), line, column));
                    };
                    self.bump();
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        '\\' => text.push('\\'),
                        '"' => text.push('"'),
                        other => {
                            text.push('\\');
                            text.push(other);
                        }
                    }
                }
                _ => text.push(self.bump()),
            }
        }

        self.push(TokenKind::Str, text, line, column);
        Ok(())
    }

    fn lex_operator(&mut self) -> Result<(), LuxError> {
        let (line, column) = (self.line, self.column);
        let c = self.bump();
        let mut lexeme = String::from(c);

        // Two-character forms take precedence over single-character ones.
        let kind = match (c, self.peek()) {
            ('=', Some('=')) => {
                lexeme.push(self.bump());
                TokenKind::EqEq
            }
            ('!', Some('=')) => {
                lexeme.push(self.bump());
                TokenKind::BangEq
            }
            ('<', Some('=')) => {
                lexeme.push(self.bump());
                TokenKind::LessEq
            }
            ('>', Some('=')) => {
                lexeme.push(self.bump());
                TokenKind::GreaterEq
            }
            ('=', _) => TokenKind::Assign,
            ('<', _) => TokenKind::Less,
            ('>', _) => TokenKind::Greater,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,
            ('%', _) => TokenKind::Percent,
            ('^', _) => TokenKind::Caret,
            ('(', _) => TokenKind::LParen,
            (')', _) => TokenKind::RParen,
            ('[', _) => TokenKind::LBracket,
            (']', _) => TokenKind::RBracket,
            (',', _) => TokenKind::Comma,
            (':', _) => TokenKind::Colon,
            (other, _) => {
                return Err(self.error_at(
                    format!("Unexpected character '{}'", other),
                    line,
                    column,
                ));
            }
        };

        self.push(kind, lexeme, line, column);
        Ok(())
    }
}
