use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::LexError;
use crate::literal::Literal;
use crate::token::{Location, Token, Type};

/// Converts source text into a token stream in one left-to-right pass (§4.1).
///
/// Errors are accumulated rather than aborting the scan on the first one, so a source file with
/// several unrelated lexical mistakes reports all of them in a single run.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 0,
            column_offset: 0,
        }
    }

    /// Scans the whole source, returning every token (terminated by `EOF`) or every lexical
    /// error encountered along the way.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, Vec<LexError>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, Location::new(self.line, 0)));

        log::trace!("scanned {} tokens ({} errors)", self.tokens.len(), self.errors.len());

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(c) => {
                self.current += 1;
                c
            }
            None => unreachable!("advance() called past end of source"),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.source.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.source.peek_next().copied()
    }

    fn match_next(&mut self, expected: char) -> bool {
        self.source.peek_next() == Some(&expected)
    }

    fn location_at_start(&self) -> Location {
        Location::new(self.line, self.start - self.column_offset)
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.location_at_start()));
    }

    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();
        self.add_token(r#type, format!("{first}{second}"), None);
    }

    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn error(&mut self, location: Location, message: String) {
        self.errors.push(LexError { location, message });
    }

    /// Scans a `"`-delimited string literal. Escapes are not interpreted; the literal may span
    /// multiple lines (each embedded `\n` still advances the line counter).
    fn string(&mut self) {
        self.advance(); // opening quote
        let start = self.location_at_start();

        let mut value = Vec::new();
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.advance();
            value.push(c);
            if c == '\n' {
                self.line += 1;
                self.column_offset = self.current;
            }
        }

        if self.is_at_end() {
            self.error(start, "Unterminated string".to_string());
            return;
        }

        self.advance(); // closing quote

        let value: String = value.into_iter().collect();
        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    /// Scans a `digit+ ('.' digit+)?` number literal. A trailing `.` not followed by a digit is
    /// left unconsumed for the next token (§4.1) rather than reported as an error.
    fn number(&mut self) {
        let mut value = Vec::new();

        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            value.push(self.advance());
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            value.push(self.advance()); // the dot

            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                value.push(self.advance());
            }
        }

        let value: String = value.into_iter().collect();
        let value_num: f64 = value.parse().expect("digit-only scan produces a parseable number");

        self.add_token(Type::Number, value, Some(Literal::Number(value_num)));
    }

    fn identifier(&mut self) {
        let mut value = Vec::new();

        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            value.push(self.advance());
        }

        let value: String = value.into_iter().collect();
        let token_type = match value.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(token_type, value, None);
    }

    fn scan_token(&mut self) {
        let c = match self.peek() {
            Some(c) => c,
            None => return,
        };

        match c {
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),

            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }

            '\n' => {
                self.advance();
                self.line += 1;
                self.column_offset = self.current;
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),

            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => {
                let location = self.location_at_start();
                self.advance();
                self.error(location, format!("Unexpected character '{c}'"));
            }
        }
    }
}
