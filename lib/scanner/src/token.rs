use std::fmt::{self, Display, Formatter};

use cursor::{Line, SourceRange};
use strum_macros::EnumDiscriminants;

use crate::LiteralValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub range: SourceRange<'a>,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, range: impl Into<SourceRange<'a>>) -> Token<'a> {
        Self { data, range: range.into() }
    }

    pub fn ty(&self) -> TokenType {
        (&self.data).into()
    }

    pub fn lexeme(&self) -> &'a str {
        self.range.lexeme()
    }

    pub fn line(&self) -> Line {
        self.range.line()
    }

    /// Decoded value of number and string tokens.
    pub fn literal(&self) -> Option<LiteralValue<'a>> {
        match self.data {
            TokenData::Number(n) => Some(LiteralValue::Number(n)),
            TokenData::Str(s) => Some(LiteralValue::Str(s)),
            _ => None,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenType), derive(Hash))]
#[cfg_attr(test, strum_discriminants(derive(strum_macros::EnumIter)))]
pub enum TokenData<'a> {
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
    Str(&'a str),
    Number(f64),

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

impl<'a> TokenData<'a> {
    /// Keyword lookup. Case-sensitive, so `True` stays an identifier.
    pub fn keyword(ident: &str) -> Option<TokenData<'a>> {
        use TokenData::*;
        Some(match ident {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use TokenType::*;
        let s = match self {
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            Comma => ",",
            Dot => ".",
            Minus => "-",
            Plus => "+",
            Semicolon => ";",
            Slash => "/",
            Star => "*",
            Bang => "!",
            BangEqual => "!=",
            Equal => "=",
            EqualEqual => "==",
            Greater => ">",
            GreaterEqual => ">=",
            Less => "<",
            LessEqual => "<=",
            Identifier => "identifier",
            Str => "string",
            Number => "number",
            And => "and",
            Class => "class",
            Else => "else",
            False => "false",
            Fun => "fun",
            For => "for",
            If => "if",
            Nil => "nil",
            Or => "or",
            Print => "print",
            Return => "return",
            Super => "super",
            This => "this",
            True => "true",
            Var => "var",
            While => "while",
            Eof => "end",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn keyword_table() {
        let keywords: Vec<TokenType> = TokenType::iter()
            .filter(|ty| TokenData::keyword(&ty.to_string()).is_some_and(|data| TokenType::from(&data) == *ty))
            .collect();
        assert_eq!(keywords.len(), 16);
        assert!(keywords.contains(&TokenType::True));
        assert!(!keywords.contains(&TokenType::Identifier));

        assert_eq!(TokenData::keyword("nil"), Some(TokenData::Nil));
        assert_eq!(TokenData::keyword("True"), None);
        assert_eq!(TokenData::keyword("whilst"), None);
        assert_eq!(TokenData::keyword(""), None);
    }
}
