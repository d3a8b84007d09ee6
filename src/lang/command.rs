/*!
## Command parsers

Named commands match their symbols in text, and in bytes either the
page byte or the codec form of each symbol. Rotate and flip take an
inline integer operand in byte form, or `0xFF` to take it from the
stack. Text form always takes their operands from the stack.

```text
r <index>     rotate by the packed (count, times) pair
f <n>         flip the top n, 0 flips the whole stack
v<cmd>        apply cmd one list level deep, V<cmd> at every level
```
*/

use super::{codepage, varint};
use super::{Error, Flip, Parser, Registry, Source, Token, TokenKind};
use crate::error;
use crate::mach::{Command, Depth, StackCommand};

type Result<T> = std::result::Result<T, Error>;

pub struct CommandParser {
    name: &'static str,
    kind: TokenKind,
}

impl CommandParser {
    pub fn basic(command: Command) -> CommandParser {
        CommandParser {
            name: command.name,
            kind: TokenKind::Command(command),
        }
    }

    pub fn stack(command: StackCommand) -> CommandParser {
        CommandParser {
            name: command.name,
            kind: TokenKind::Stack(command),
        }
    }
}

impl Parser for CommandParser {
    fn name(&self) -> &str {
        self.name
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        source.starts_with_word(self.name)
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let len = source.starts_with_word(self.name);
        Ok((vec![Token::new(0..len, self.kind.clone())], len))
    }
}

/// Where the operand of a parameterized command comes from.
enum Operand {
    Stack,
    Inline(u64),
}

/// Split `symbol` and its operand off the front of `source`.
fn parameterized(source: Source, symbol: char) -> Option<(Result<Operand>, usize)> {
    let head = source.starts_with(symbol);
    if head == 0 {
        return None;
    }
    let rest = match source {
        Source::Text(_) => return Some((Ok(Operand::Stack), head)),
        Source::Bytes(b) => &b[head..],
    };
    Some(match rest.first() {
        None => (Ok(Operand::Stack), head),
        Some(&codepage::FROM_STACK) => (Ok(Operand::Stack), head + 1),
        Some(_) => match varint::decode_literal(rest) {
            Ok((value, len)) => (Ok(Operand::Inline(value)), head + len),
            Err(e) => (Err(e.in_column(&(head..head + 1))), head + 1),
        },
    })
}

/// `r`, rotating the top of the stack.
pub struct RotateParser;

impl Parser for RotateParser {
    fn name(&self) -> &str {
        "rotate"
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        parameterized(source, 'r').map_or(0, |(_, len)| len)
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let (operand, len) = parameterized(source, 'r')
            .ok_or_else(|| error!(InternalError; "ROTATE PARSER CALLED WITHOUT MATCH"))?;
        let pair = match operand? {
            Operand::Stack => None,
            Operand::Inline(index) => Some(
                varint::unpack_rotate(index as u128).map_err(|e| e.in_column(&(0..len)))?,
            ),
        };
        Ok((vec![Token::new(0..len, TokenKind::Rotate(pair))], len))
    }
}

/// `f`, reversing the top of the stack.
pub struct FlipParser;

impl Parser for FlipParser {
    fn name(&self) -> &str {
        "flip"
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        parameterized(source, 'f').map_or(0, |(_, len)| len)
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let (operand, len) = parameterized(source, 'f')
            .ok_or_else(|| error!(InternalError; "FLIP PARSER CALLED WITHOUT MATCH"))?;
        let flip = match operand? {
            Operand::Stack => Flip::FromStack,
            Operand::Inline(0) => Flip::WholeStack,
            Operand::Inline(n) => Flip::Count(n),
        };
        Ok((vec![Token::new(0..len, TokenKind::Flip(flip))], len))
    }
}

/// `v` and `V` prefixes.
pub struct VectorizeParser;

impl VectorizeParser {
    fn prefix(source: Source) -> Option<(Depth, usize)> {
        match source.starts_with('v') {
            0 => match source.starts_with('V') {
                0 => None,
                n => Some((Depth::Unbounded, n)),
            },
            n => Some((Depth::Levels(1), n)),
        }
    }
}

impl Parser for VectorizeParser {
    fn name(&self) -> &str {
        "vectorize"
    }

    fn matches(&self, source: Source, registry: &Registry) -> usize {
        match VectorizeParser::prefix(source) {
            Some((_, head)) => match registry.longest_match(source.at(head)) {
                0 => 0,
                n => head + n,
            },
            None => 0,
        }
    }

    fn parse(&self, source: Source, registry: &Registry) -> Result<(Vec<Token>, usize)> {
        let (depth, head) = VectorizeParser::prefix(source)
            .ok_or_else(|| error!(InternalError; "VECTORIZE PARSER CALLED WITHOUT MATCH"))?;
        let (mut tokens, len) = registry
            .parse_one(source.at(head))
            .map_err(|e| e.shifted(head))?;
        let len = head + len;
        let kind = match (tokens.pop().map(|t| t.kind), tokens.is_empty()) {
            (Some(TokenKind::Command(command)), true) if command.returns == 1 => {
                TokenKind::Vectorized(command, depth)
            }
            (Some(TokenKind::Vectorized(command, inner)), true) => {
                TokenKind::Vectorized(command, depth.deeper(inner))
            }
            (Some(other), _) => {
                return Err(error!(TypeError, ..&(0..len);
                    &format!("CANNOT VECTORIZE {}", other)));
            }
            (None, _) => {
                return Err(error!(SyntaxError, ..&(0..head); "NOTHING TO VECTORIZE"));
            }
        };
        Ok((vec![Token::new(0..len, kind)], len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Config, ErrorCode};

    fn one(source: Source) -> Result<(TokenKind, usize)> {
        let registry = Registry::new(Config::default());
        let (mut tokens, len) = registry.parse_one(source)?;
        assert_eq!(tokens.len(), 1);
        Ok((tokens.remove(0).kind, len))
    }

    #[test]
    fn test_named_commands_in_both_forms() {
        let (text, len) = one(Source::Text("\u{2260}1")).unwrap();
        assert_eq!(len, 3);
        let (paged, len) = one(Source::Bytes(&[0x80, b'1'])).unwrap();
        assert_eq!(len, 1);
        assert_eq!(text, paged);
        let (coded, len) = one(Source::Bytes(&[0xE0, 0x22, 0x60])).unwrap();
        assert_eq!(len, 3);
        assert_eq!(coded, paged);
    }

    #[test]
    fn test_rotate() {
        assert_eq!(one(Source::Text("r5")).unwrap(), (TokenKind::Rotate(None), 1));
        assert_eq!(
            one(Source::Bytes(&[b'r', 0x04])).unwrap(),
            (TokenKind::Rotate(Some((4, 2))), 2)
        );
        assert_eq!(one(Source::Bytes(&[b'r', 0xFF])).unwrap(), (TokenKind::Rotate(None), 2));
        assert_eq!(one(Source::Bytes(b"r")).unwrap(), (TokenKind::Rotate(None), 1));
        let err = one(Source::Bytes(&[b'r', 0x00])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueError);
        let err = one(Source::Bytes(&[b'r', 0x80])).unwrap_err();
        assert_eq!(err.column(), 1..2);
    }

    #[test]
    fn test_flip() {
        assert_eq!(one(Source::Text("f")).unwrap(), (TokenKind::Flip(Flip::FromStack), 1));
        assert_eq!(
            one(Source::Bytes(&[b'f', 0x00])).unwrap(),
            (TokenKind::Flip(Flip::WholeStack), 2)
        );
        assert_eq!(
            one(Source::Bytes(&[b'f', 0x03])).unwrap(),
            (TokenKind::Flip(Flip::Count(3)), 2)
        );
        assert_eq!(
            one(Source::Bytes(&[b'f', 0xFF])).unwrap(),
            (TokenKind::Flip(Flip::FromStack), 2)
        );
    }

    #[test]
    fn test_stray_from_stack_marker() {
        let err = one(Source::Bytes(&[0xFF])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SyntaxError);
    }

    #[test]
    fn test_vectorize_depth() {
        let (kind, len) = one(Source::Text("vv+")).unwrap();
        assert_eq!(len, 3);
        match kind {
            TokenKind::Vectorized(command, depth) => {
                assert_eq!(command.name, "+");
                assert_eq!(depth, Depth::Levels(2));
            }
            other => panic!("not vectorized: {:?}", other),
        }
        let (kind, _) = one(Source::Text("vV-")).unwrap();
        assert!(matches!(kind, TokenKind::Vectorized(_, Depth::Unbounded)));
    }

    #[test]
    fn test_vectorize_needs_single_result() {
        let err = one(Source::Text("v\u{a7}")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeError);
        let err = one(Source::Text("v5")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeError);
        assert_eq!(err.column(), 0..2);
    }

    #[test]
    fn test_vectorize_spans_whole_operand() {
        let registry = Registry::new(Config::default());
        let source = Source::Text("v[1 2] 3");
        assert_eq!(VectorizeParser.matches(source, &registry), 6);
        let err = one(source).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeError);
        assert_eq!(err.column(), 0..6);
    }
}
