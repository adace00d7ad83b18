//! Tokenizer for the query DSL

use super::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    /// Body of a `//pattern//` literal
    Regex(String),
    /// One of the comparison operators: == != > >= < <= =~
    Op(String),
    At,
    Colon,
    Comma,
    Amp,
    Pipe,
    Bang,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Star,
}

impl Token {
    /// Short rendering for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::Str(s) => format!("\"{}\"", s),
            Token::Int(n) => n.to_string(),
            Token::Float(n) => n.to_string(),
            Token::Regex(pattern) => format!("//{}//", pattern),
            Token::Op(op) => format!("'{}'", op),
            Token::At => "'@'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Amp => "'&'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Star => "'*'".to_string(),
        }
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole input, pairing each token with its start offset
    pub fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += 1;
                continue;
            }
            let start = self.pos;
            let token = self.next_token(ch, start)?;
            tokens.push((token, start));
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next_token(&mut self, ch: char, start: usize) -> Result<Token, ParseError> {
        match ch {
            '@' => self.single(Token::At),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '&' => self.single(Token::Amp),
            '|' => self.single(Token::Pipe),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '*' => self.single(Token::Star),
            '!' => {
                if self.peek_at(1) == Some('=') {
                    self.pos += 2;
                    Ok(Token::Op("!=".to_string()))
                } else {
                    self.single(Token::Bang)
                }
            }
            '=' => match self.peek_at(1) {
                Some('=') => {
                    self.pos += 2;
                    Ok(Token::Op("==".to_string()))
                }
                Some('~') => {
                    self.pos += 2;
                    Ok(Token::Op("=~".to_string()))
                }
                _ => Err(ParseError::UnexpectedChar { ch, pos: start }),
            },
            '>' => {
                if self.peek_at(1) == Some('=') {
                    self.pos += 2;
                    Ok(Token::Op(">=".to_string()))
                } else {
                    self.single(Token::Op(">".to_string()))
                }
            }
            '<' => {
                if self.peek_at(1) == Some('=') {
                    self.pos += 2;
                    Ok(Token::Op("<=".to_string()))
                } else {
                    self.single(Token::Op("<".to_string()))
                }
            }
            '"' => self.lex_string(start),
            '/' => {
                if self.peek_at(1) == Some('/') {
                    self.lex_regex(start)
                } else {
                    Err(ParseError::UnexpectedChar { ch, pos: start })
                }
            }
            '-' => self.lex_number(start),
            _ if ch.is_ascii_digit() => self.lex_number(start),
            _ if ch.is_alphabetic() || ch == '_' => Ok(self.lex_ident()),
            _ => Err(ParseError::UnexpectedChar { ch, pos: start }),
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, ParseError> {
        self.pos += 1;
        Ok(token)
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Token::Ident(self.chars[start..self.pos].iter().collect())
    }

    /// Lex a double-quoted string
    ///
    /// Only `\"` is an escape at this level; every other backslash is kept
    /// verbatim so that `\*` survives to the emitters, which treat it as an
    /// escaped wildcard.
    fn lex_string(&mut self, start: usize) -> Result<Token, ParseError> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.pos += 1;
                    return Ok(Token::Str(out));
                }
                '\\' if self.peek_at(1) == Some('"') => {
                    out.push('"');
                    self.pos += 2;
                }
                _ => {
                    out.push(ch);
                    self.pos += 1;
                }
            }
        }
        Err(ParseError::UnterminatedString { pos: start })
    }

    fn lex_regex(&mut self, start: usize) -> Result<Token, ParseError> {
        self.pos += 2;
        let body_start = self.pos;
        while self.pos < self.chars.len() {
            if self.peek() == Some('/') && self.peek_at(1) == Some('/') {
                let body: String = self.chars[body_start..self.pos].iter().collect();
                self.pos += 2;
                return Ok(Token::Regex(body));
            }
            self.pos += 1;
        }
        Err(ParseError::UnterminatedRegex { pos: start })
    }

    /// Lex a numeric-looking token
    ///
    /// No dot is an integer, one dot is a float, and two or more dots is a
    /// dotted quad, which lexes as a string literal.
    fn lex_number(&mut self, start: usize) -> Result<Token, ParseError> {
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        let mut dots = 0;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.pos += 1;
            } else if ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                dots += 1;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match dots {
            0 => text
                .parse::<i64>()
                .map(Token::Int)
                .map_err(|_| ParseError::UnexpectedChar { ch: '-', pos: start }),
            1 => text
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ParseError::UnexpectedChar { ch: '.', pos: start }),
            _ => Ok(Token::Str(text)),
        }
    }
}
