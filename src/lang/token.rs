use super::Column;
use crate::mach::{Command, Depth, Number, StackCommand, Str};

/// ## Tokens
///
/// One parsed unit of a program and the source span it came from.
/// Columns are byte offsets into the source for both text and bytes.

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub column: Column,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(Number),
    Char(char),
    Byte(u8),
    String(Str),
    List(Vec<Token>),
    Command(Command),
    Stack(StackCommand),
    Vectorized(Command, Depth),
    /// `(count, times)`, or `None` when both come from the stack.
    Rotate(Option<(u64, u64)>),
    Flip(Flip),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Count(u64),
    FromStack,
    WholeStack,
}

impl Token {
    pub fn new(column: Column, kind: TokenKind) -> Token {
        Token { column, kind }
    }

    /// Move the column, and those of nested tokens, by `offset`.
    pub fn shifted(mut self, offset: usize) -> Token {
        self.column = self.column.start + offset..self.column.end + offset;
        if let TokenKind::List(tokens) = self.kind {
            self.kind = TokenKind::List(tokens.into_iter().map(|t| t.shifted(offset)).collect());
        }
        self
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenKind::*;
        match self {
            Number(n) => write!(f, "{}", n),
            Char(c) => write!(f, "'{}", c),
            Byte(b) => write!(f, "b'{}", std::ascii::escape_default(*b)),
            String(s) => write!(f, "{}", s),
            List(tokens) => {
                write!(f, "[")?;
                for (i, t) in tokens.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, "]")
            }
            Command(c) => write!(f, "{}", c.name),
            Stack(c) => write!(f, "{}", c.name),
            Vectorized(c, Depth::Unbounded) => write!(f, "V{}", c.name),
            Vectorized(c, Depth::Levels(n)) => {
                write!(f, "{}{}", "v".repeat(*n as usize), c.name)
            }
            Rotate(Some((count, times))) => write!(f, "r({},{})", count, times),
            Rotate(None) => write!(f, "r"),
            Flip(self::Flip::Count(n)) => write!(f, "f({})", n),
            Flip(self::Flip::WholeStack) => write!(f, "f(*)"),
            Flip(self::Flip::FromStack) => write!(f, "f"),
        }
    }
}
