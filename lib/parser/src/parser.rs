mod expr;

use errors::{LoxError, LoxErrors};
pub use expr::Expr;
pub use scanner::LiteralValue;
use scanner::{Token, TokenData, TokenType};

use TokenType::*;

/// How many groupings and prefix operators may enclose each other before the
/// parser gives up, so deep input is reported instead of overflowing the stack.
pub const MAX_NESTING: usize = 128;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expect '{expected}' after {after}.")]
    Expected { expected: TokenType, after: &'static str },
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect end of expression.")]
    ExpectedEnd,
    #[error("Expression nests too deeply.")]
    TooDeeplyNested,
}

/// A syntax error together with the token it was found at.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: &Token<'a>) -> Self {
        Self { error, token: token.clone() }
    }
}

impl<'a> From<ParserError<'a>> for LoxError {
    fn from(e: ParserError<'a>) -> Self {
        let at = match e.token.ty() {
            Eof => "end".to_string(),
            _ => format!("'{}'", e.token.lexeme()),
        };
        LoxError::new(e.token.line(), at, e.error)
    }
}

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

/// Recursive descent parser over a scanned token slice. The slice has to end
/// with `Eof`; the parser never moves past it.
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        assert!(tokens.last().is_some_and(|t| t.ty() == Eof), "token stream has to end with Eof");
        Self { tokens, current: 0, depth: 0 }
    }

    /// Parses the tokens as one expression spanning the whole input.
    ///
    /// After a syntax error the parser synchronizes and keeps going, so a
    /// single call can report several errors. Any error means no tree.
    pub fn parse(mut self) -> std::result::Result<Expr<'a>, LoxErrors> {
        let mut errors = LoxErrors::default();

        loop {
            match self.complete_expression() {
                Ok(expr) if errors.is_empty() => return Ok(expr),
                Ok(_) => break,
                Err(e) => {
                    log::debug!("Hit error at '{}': {}, syncing...", e.token, e);
                    errors.push(e.into());
                    self.synchronize();
                    if self.is_at_end() {
                        break;
                    }
                }
            }
        }

        Err(errors)
    }

    /// Parses a single expression and stops at the first syntax error. The
    /// parser is left on the token following the expression.
    pub fn parse_expression(&mut self) -> Result<'a, Expr<'a>> {
        self.expression()
    }

    /// Consumes the current token if it has type `ty`, otherwise fails with
    /// an error naming `ty` and pointing at the token that was found instead.
    pub fn expect(&mut self, ty: TokenType, after: &'static str) -> Result<'a, &'t Token<'a>> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(ParserError::new(ParserErrorType::Expected { expected: ty, after }, self.peek()))
        }
    }

    fn complete_expression(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        if !self.is_at_end() {
            return Err(ParserError::new(ParserErrorType::ExpectedEnd, self.peek()));
        }
        Ok(expr)
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Minus, Plus], Self::factor)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Slash, Star], Self::unary)
    }

    fn left_associative(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let mut expr = operand(self)?;

        while let Some(operator) = self.match_any(operators) {
            let right = Box::new(operand(self)?);
            expr = Expr::Binary { left: Box::new(expr), operator: operator.clone(), right };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if matches!(self.peek().ty(), Bang | Minus) {
            return self.nested(|parser| {
                let operator = parser.advance().clone();
                let right = Box::new(parser.unary()?);
                Ok(Expr::Unary { operator, right })
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek();
        let value = match token.data {
            TokenData::False => LiteralValue::Boolean(false),
            TokenData::True => LiteralValue::Boolean(true),
            TokenData::Nil => LiteralValue::Nil,
            TokenData::Number(n) => LiteralValue::Number(n),
            TokenData::Str(s) => LiteralValue::Str(s),
            TokenData::LeftParen => {
                return self.nested(|parser| {
                    parser.advance();
                    let expr = parser.expression()?;
                    parser.expect(RightParen, "expression")?;
                    Ok(Expr::Grouping(Box::new(expr)))
                });
            }
            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        };

        self.advance();
        Ok(Expr::Literal(value))
    }

    /// Runs `parse` one nesting level deeper. Fails at the current token
    /// instead once `MAX_NESTING` levels are open.
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<'a, Expr<'a>>) -> Result<'a, Expr<'a>> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::new(ParserErrorType::TooDeeplyNested, self.peek()));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Skips ahead to the next likely boundary: just after a `;` or right
    /// before a statement keyword. Always consumes at least one token unless
    /// already at the end.
    fn synchronize(&mut self) {
        if self.advance().ty() == Semicolon {
            return;
        }

        while !self.is_at_end() {
            log::trace!("Syncing... '{}'", self.peek());
            match self.peek().ty() {
                Semicolon => {
                    self.advance();
                    return;
                }
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> &'t Token<'a> {
        &self.tokens[self.current]
    }

    fn check(&self, ty: TokenType) -> bool {
        self.peek().ty() == ty
    }

    fn match_any(&mut self, types: &[TokenType]) -> Option<&'t Token<'a>> {
        types.contains(&self.peek().ty()).then(|| self.advance())
    }

    /// Returns the current token and moves on, except at `Eof`.
    fn advance(&mut self) -> &'t Token<'a> {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.check(Eof)
    }
}

/// Parses `tokens` as a single expression, aborting at the first syntax error.
pub fn parse_expression<'a>(tokens: &[Token<'a>]) -> Result<'a, Expr<'a>> {
    Parser::new(tokens).parse_expression()
}
