use cursor::{Cursor, SourceRange};
use errors::{LoxError, Reporter};

mod literal;
pub mod token;

pub use literal::LiteralValue;
pub use token::{Token, TokenData, TokenType};
use token::TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedComment,
    #[error("Invalid number literal '{0}'.")]
    InvalidNumber(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ScanError<'a> {
    pub error: ScanErrorType,
    /// The offending text. Unterminated strings and comments run up to the
    /// end of the source.
    pub range: SourceRange<'a>,
}

impl<'a> From<ScanError<'a>> for LoxError {
    fn from(e: ScanError<'a>) -> Self {
        LoxError::new(e.range.line(), "", e.error)
    }
}

/// Lazily scans a source string. Lexical errors are yielded in place of the
/// token that couldn't be produced and scanning carries on after them. The
/// stream always ends with a single `Eof` token.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), done: false }
    }

    fn token(&self, data: TokenData<'a>, start: Cursor<'a>) -> Token<'a> {
        Token::new(data, (start, self.cursor.clone()))
    }

    fn error(&self, error: ScanErrorType, start: Cursor<'a>) -> ScanError<'a> {
        ScanError { error, range: (start, self.cursor.clone()).into() }
    }

    fn either(&mut self, second: char, matched: TokenData<'a>, single: TokenData<'a>) -> TokenData<'a> {
        if self.cursor.next_if_eq(second) {
            matched
        } else {
            single
        }
    }

    fn scan_token(&mut self) -> Option<Result<Token<'a>, ScanError<'a>>> {
        loop {
            let start = self.cursor.clone();
            let Some(c) = self.cursor.next() else {
                self.done = true;
                return Some(Ok(Token::new(Eof, SourceRange::at(start))));
            };

            let data = match c {
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

                '!' => self.either('=', BangEqual, Bang),
                '=' => self.either('=', EqualEqual, Equal),
                '<' => self.either('=', LessEqual, Less),
                '>' => self.either('=', GreaterEqual, Greater),

                '/' => {
                    if self.cursor.next_if_eq('/') {
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    } else if self.cursor.next_if_eq('*') {
                        match self.block_comment() {
                            Ok(()) => continue,
                            Err(e) => return Some(Err(self.error(e, start))),
                        }
                    } else {
                        Slash
                    }
                }

                '"' => return Some(self.string(start)),

                d if d.is_ascii_digit() => return Some(self.number(start)),

                a if is_alpha(a) => self.identifier(&start),

                ' ' | '\r' | '\t' | '\n' => continue,

                c => return Some(Err(self.error(ScanErrorType::UnexpectedCharacter(c), start))),
            };

            return Some(Ok(self.token(data, start)));
        }
    }

    /// Called after the opening `/*`. Comments nest, so every `/*` needs its own `*/`.
    fn block_comment(&mut self) -> Result<(), ScanErrorType> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.cursor.next() {
                Some('/') if self.cursor.peek() == Some('*') => {
                    self.cursor.next();
                    depth += 1;
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.next();
                    depth -= 1;
                }
                Some(_) => (),
                None => return Err(ScanErrorType::UnterminatedComment),
            }
        }
        Ok(())
    }

    fn string(&mut self, start: Cursor<'a>) -> Result<Token<'a>, ScanError<'a>> {
        self.cursor.eat_while(|c| c != '"');
        if !self.cursor.next_if_eq('"') {
            return Err(self.error(ScanErrorType::UnterminatedString, start));
        }

        let lexeme = start.slice_until(&self.cursor);
        Ok(self.token(Str(&lexeme[1..lexeme.len() - 1]), start))
    }

    fn number(&mut self, start: Cursor<'a>) -> Result<Token<'a>, ScanError<'a>> {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        // A trailing '.' without digits is left alone, it's not part of the number
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.next();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let lexeme = start.slice_until(&self.cursor);
        match lexeme.parse() {
            Ok(n) => Ok(self.token(Number(n), start)),
            Err(_) => Err(self.error(ScanErrorType::InvalidNumber(lexeme.to_string()), start)),
        }
    }

    fn identifier(&mut self, start: &Cursor<'a>) -> TokenData<'a> {
        self.cursor.eat_while(|c| is_alpha(c) || c.is_ascii_digit());
        TokenData::keyword(start.slice_until(&self.cursor)).unwrap_or(Identifier)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.scan_token();
        match &result {
            Some(Ok(token)) => log::trace!("[line {}] {:?} '{}'", token.line(), token.ty(), token),
            Some(Err(e)) => log::debug!("Scan error at line {}: {}", e.range.line(), e),
            None => (),
        }
        result
    }
}

/// Scans the whole source. Lexical errors go to `reporter`, the returned tokens
/// are everything that could be recovered and always end with `Eof`.
pub fn tokenize<'a>(source: &'a str, reporter: &mut (impl Reporter + ?Sized)) -> Vec<Token<'a>> {
    TokenStream::new(source)
        .filter_map(|result| match result {
            Ok(token) => Some(token),
            Err(e) => {
                reporter.report(e.into());
                None
            }
        })
        .collect()
}
