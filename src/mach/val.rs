use super::{List, Number};
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack values

#[derive(Debug, Clone)]
pub enum Val {
    Number(Number),
    Char(char),
    Byte(u8),
    List(List),
    String(Str),
}

/// Immutable strings of characters or of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Str {
    Unicode(Vec<char>),
    Bytes(Vec<u8>),
}

impl Val {
    pub fn integer<T: Into<num_bigint::BigInt>>(n: T) -> Val {
        Val::Number(Number::integer(n))
    }

    pub fn boolean(b: bool) -> Val {
        Val::Number(Number::Boolean(b))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Val::List(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Number(_) => "NUMBER",
            Val::Char(_) => "CHAR",
            Val::Byte(_) => "BYTE",
            Val::List(_) => "LIST",
            Val::String(Str::Unicode(_)) => "STRING",
            Val::String(Str::Bytes(_)) => "BYTES",
        }
    }

    /// A copy that shares no list nodes with `self`.
    pub fn deep_copy(&self) -> Result<Val> {
        match self {
            Val::List(list) => Ok(Val::List(list.deep_copy()?)),
            other => Ok(other.clone()),
        }
    }

    /// Integer operand used as a count or index.
    pub fn to_isize(&self) -> Result<isize> {
        match self {
            Val::Number(n) => n
                .to_isize()
                .ok_or_else(|| error!(ValueError; &format!("{} IS NOT A VALID COUNT", n))),
            Val::Byte(b) => Ok(*b as isize),
            other => Err(error!(TypeError; &format!("EXPECTED INTEGER, FOUND {}", other.type_name()))),
        }
    }

    pub fn to_usize(&self) -> Result<usize> {
        let n = self.to_isize()?;
        usize::try_from(n).map_err(|_| error!(ValueError; &format!("{} IS NEGATIVE", n)))
    }

    /// Structural equality. Lists compare element by element.
    pub fn equals(&self, other: &Val) -> Result<bool> {
        Ok(match (self, other) {
            (Val::Number(a), Val::Number(b)) => a.num_eq(b),
            (Val::Char(a), Val::Char(b)) => a == b,
            (Val::Byte(a), Val::Byte(b)) => a == b,
            (Val::String(a), Val::String(b)) => a == b,
            (Val::List(a), Val::List(b)) => a.equals(b)?,
            _ => false,
        })
    }

    pub fn compare(&self, other: &Val) -> Result<Ordering> {
        match (self, other) {
            (Val::Number(a), Val::Number(b)) => a.compare(b),
            (Val::Char(a), Val::Char(b)) => Ok(a.cmp(b)),
            (Val::Byte(a), Val::Byte(b)) => Ok(a.cmp(b)),
            (Val::String(Str::Unicode(a)), Val::String(Str::Unicode(b))) => Ok(a.cmp(b)),
            (Val::String(Str::Bytes(a)), Val::String(Str::Bytes(b))) => Ok(a.cmp(b)),
            (a, b) => Err(error!(TypeError; &format!(
                "CANNOT ORDER {} AND {}",
                a.type_name(),
                b.type_name()
            ))),
        }
    }
}

impl From<Number> for Val {
    fn from(n: Number) -> Val {
        Val::Number(n)
    }
}

impl From<List> for Val {
    fn from(l: List) -> Val {
        Val::List(l)
    }
}

impl Str {
    pub fn len(&self) -> usize {
        match self {
            Str::Unicode(s) => s.len(),
            Str::Bytes(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes are widened to characters; characters past 0xFF are rejected.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Str::Bytes(b) => Ok(b.clone()),
            Str::Unicode(s) => s.iter().map(|c| byte_of(*c)).collect(),
        }
    }
}

pub fn byte_of(c: char) -> Result<u8> {
    u8::try_from(c as u32)
        .map_err(|_| error!(ValueError; &format!("{:?} DOES NOT FIT IN A BYTE", c)))
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", n),
            Val::Char(c) => write!(f, "{}", c),
            Val::Byte(b) => write!(f, "b'{}'", std::ascii::escape_default(*b)),
            Val::List(l) => write!(f, "{}", l),
            Val::String(s) => write!(f, "{}", s),
        }
    }
}

impl std::fmt::Display for Str {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Str::Unicode(s) => {
                write!(f, "\"")?;
                for c in s {
                    write!(f, "{}", c.escape_debug())?;
                }
                write!(f, "\"")
            }
            Str::Bytes(b) => {
                write!(f, "b\"")?;
                for byte in b {
                    write!(f, "{}", std::ascii::escape_default(*byte))?;
                }
                write!(f, "\"")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let s = Val::String(Str::Unicode("a\"b".chars().collect()));
        assert_eq!(s.to_string(), "\"a\\\"b\"");
        let b = Val::String(Str::Bytes(vec![b'h', 0]));
        assert_eq!(b.to_string(), "b\"h\\x00\"");
        assert_eq!(Val::Byte(b'A').to_string(), "b'A'");
    }

    #[test]
    fn test_counts() {
        assert_eq!(Val::integer(3).to_usize().unwrap(), 3);
        assert!(Val::integer(-3).to_usize().is_err());
        assert!(Val::Char('x').to_isize().is_err());
    }

    #[test]
    fn test_to_bytes() {
        assert_eq!(Str::Unicode(vec!['ÿ']).to_bytes().unwrap(), vec![0xFF]);
        assert!(Str::Unicode(vec!['Ā']).to_bytes().is_err());
    }
}
