use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::expr::LiteralValue;
use crate::reporter::Reporter;

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("and", TokenType::And),
        ("class", TokenType::Class),
        ("else", TokenType::Else),
        ("false", TokenType::False),
        ("for", TokenType::For),
        ("fun", TokenType::Fun),
        ("if", TokenType::If),
        ("nil", TokenType::Nil),
        ("or", TokenType::Or),
        ("print", TokenType::Print),
        ("return", TokenType::Return),
        ("super", TokenType::Super),
        ("this", TokenType::This),
        ("true", TokenType::True),
        ("var", TokenType::Var),
        ("while", TokenType::While),
    ])
});

/// Tokenize the whole source. Lexical errors go to the reporter and the offending
/// characters are skipped, so the result always ends with exactly one `Eof` token.
pub fn scan_tokens(code: &str, reporter: &mut dyn Reporter) -> Vec<Token> {
    let mut scanner = Scanner {
        chars: code.chars().collect(),
        cursor_begin: 0,
        cursor_end: 0,
        line: 1,
        tokens: Vec::new(),
    };

    while !scanner.at_end() {
        scanner.cursor_begin = scanner.cursor_end;
        scanner.scan_token(reporter);
    }

    scanner.tokens.push(Token {
        token_type: TokenType::Eof,
        lexeme: String::new(),
        literal: None,
        line: scanner.line,
    });

    tracing::debug!(count = scanner.tokens.len(), "scanned tokens");
    scanner.tokens
}

#[derive(Debug)]
struct Scanner {
    chars: Vec<char>,
    cursor_begin: usize,
    cursor_end: usize,
    line: u32,
    tokens: Vec<Token>,
}

impl Scanner {
    fn scan_token(&mut self, reporter: &mut dyn Reporter) {
        let current = self.advance();

        match current {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => self.add_token_if_next('=', TokenType::BangEqual, TokenType::Bang),
            '=' => self.add_token_if_next('=', TokenType::EqualEqual, TokenType::Equal),
            '<' => self.add_token_if_next('=', TokenType::LessEqual, TokenType::Less),
            '>' => self.add_token_if_next('=', TokenType::GreaterEqual, TokenType::Greater),
            '/' => {
                if self.advance_if_match('/') {
                    // comments run to the end of the line, the newline itself is scanned normally
                    while self.peek() != '\n' && !self.at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(reporter),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => reporter.report(self.line, "", "Unexpected character."),
        }
    }

    fn string(&mut self, reporter: &mut dyn Reporter) {
        let start_line = self.line;
        while self.peek() != '"' && !self.at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.at_end() {
            reporter.report(start_line, "", "Unterminated string.");
            return;
        }

        // closing quote
        self.advance();

        let value: String = self.chars[self.cursor_begin + 1..self.cursor_end - 1].iter().collect();
        self.add_literal_token(TokenType::String, LiteralValue::String(value), start_line);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // a fractional part needs at least one digit after the dot
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // digits with at most one interior dot always parse
        let value = self.current_lexeme().parse::<f64>().unwrap_or(f64::NAN);
        self.add_literal_token(TokenType::Number, LiteralValue::Number(value), self.line);
    }

    fn identifier(&mut self) {
        while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
            self.advance();
        }

        let text = self.current_lexeme();
        let token_type = KEYWORDS.get(text.as_str()).copied().unwrap_or(TokenType::Identifier);
        self.add_token(token_type);
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.tokens.push(Token {
            token_type,
            lexeme: self.current_lexeme(),
            literal: None,
            line: self.line,
        });
    }

    fn add_token_if_next(&mut self, expected: char, matched: TokenType, otherwise: TokenType) {
        let token_type = if self.advance_if_match(expected) { matched } else { otherwise };
        self.add_token(token_type);
    }

    fn add_literal_token(&mut self, token_type: TokenType, literal: LiteralValue, line: u32) {
        self.tokens.push(Token {
            token_type,
            lexeme: self.current_lexeme(),
            literal: Some(literal),
            line,
        });
    }

    fn current_lexeme(&self) -> String {
        self.chars[self.cursor_begin..self.cursor_end].iter().collect()
    }

    fn advance(&mut self) -> char {
        let current = self.chars[self.cursor_end];
        self.cursor_end += 1;
        current
    }

    fn advance_if_match(&mut self, expected: char) -> bool {
        if self.peek() == expected && !self.at_end() {
            self.cursor_end += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> char {
        self.chars.get(self.cursor_end).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.cursor_end + 1).copied().unwrap_or('\0')
    }

    fn at_end(&self) -> bool {
        self.cursor_end >= self.chars.len()
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<LiteralValue>,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}
