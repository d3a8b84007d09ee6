use super::{codepage, varint};
use super::{Error, Parser, Registry, Source, Token, TokenKind};
use crate::error;
use crate::mach::{byte_of, Str};

type Result<T> = std::result::Result<T, Error>;

/// ## String literals
///
/// `"..."` is a Unicode string and `b"..."` a byte string. A closing
/// quote is consumed, an unescaped newline ends the literal without
/// being consumed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringParser {
    Unicode,
    Bytes,
}

/// What a scan of a string body found. The length is known even when
/// the contents are not valid.
struct Scan {
    chars: Result<Vec<char>>,
    len: usize,
}

impl StringParser {
    fn opening(&self) -> &'static str {
        match self {
            StringParser::Unicode => "\"",
            StringParser::Bytes => "b\"",
        }
    }

    fn scan(&self, source: Source) -> Option<Scan> {
        let mut pos = match source.starts_with_word(self.opening()) {
            0 => return None,
            n => n,
        };
        let mut chars = vec![];
        let mut fault = None;
        loop {
            let rest = source.at(pos);
            let (c, width) = match rest.next_symbol() {
                Some(symbol) => symbol,
                None if rest.first_byte() == Some(codepage::INTEGER_PREFIX) => {
                    let body = rest.as_bytes().get(1..).unwrap_or(&[]);
                    match varint::decode(body) {
                        Some((value, len)) => {
                            chars.extend(value.to_string().chars());
                            pos += 1 + len;
                        }
                        None => {
                            fault.get_or_insert_with(|| {
                                error!(ValueError, ..&(pos..pos + 1); "INVALID INTEGER IN STRING")
                            });
                            pos += 1;
                        }
                    }
                    continue;
                }
                None => break,
            };
            match c {
                '"' => {
                    pos += width;
                    break;
                }
                '\n' => break,
                '\\' => {
                    pos += width;
                    pos += escape(source.at(pos), &mut chars);
                }
                _ => {
                    chars.push(c);
                    pos += width;
                }
            }
        }
        let chars = match fault {
            Some(err) => Err(err),
            None => Ok(chars),
        };
        Some(Scan { chars, len: pos })
    }
}

/// Handle what follows a backslash, returning how much of it was used.
fn escape(rest: Source, chars: &mut Vec<char>) -> usize {
    let byte = match rest.first_byte() {
        Some(b) => b,
        None => {
            chars.push('\\');
            return 0;
        }
    };
    match byte {
        b'\n' => 1,
        b'n' => {
            chars.push('\n');
            1
        }
        b'"' => {
            chars.push('"');
            1
        }
        _ if rest.is_text() => {
            chars.push('\\');
            0
        }
        _ => {
            chars.push(byte as char);
            1
        }
    }
}

impl Parser for StringParser {
    fn name(&self) -> &str {
        match self {
            StringParser::Unicode => "string",
            StringParser::Bytes => "byte string",
        }
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        self.scan(source).map_or(0, |scan| scan.len)
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let Scan { chars, len } = self
            .scan(source)
            .ok_or_else(|| error!(InternalError; "STRING PARSER CALLED WITHOUT MATCH"))?;
        let chars = chars?;
        let value = match self {
            StringParser::Unicode => Str::Unicode(chars),
            StringParser::Bytes => {
                let bytes = chars
                    .into_iter()
                    .map(byte_of)
                    .collect::<Result<Vec<u8>>>()
                    .map_err(|e| e.in_column(&(0..len)))?;
                Str::Bytes(bytes)
            }
        };
        Ok((vec![Token::new(0..len, TokenKind::String(value))], len))
    }
}

/// `'x` pushes a character and `b'x` a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharParser {
    Unicode,
    Bytes,
}

impl CharParser {
    fn opening(&self) -> &'static str {
        match self {
            CharParser::Unicode => "'",
            CharParser::Bytes => "b'",
        }
    }

    fn scan(&self, source: Source) -> Option<(char, usize)> {
        let start = source.starts_with_word(self.opening());
        if start == 0 {
            return None;
        }
        let (c, width) = source.at(start).next_symbol()?;
        Some((c, start + width))
    }
}

impl Parser for CharParser {
    fn name(&self) -> &str {
        match self {
            CharParser::Unicode => "character",
            CharParser::Bytes => "byte",
        }
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        self.scan(source).map_or(0, |(_, len)| len)
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let (c, len) = self
            .scan(source)
            .ok_or_else(|| error!(InternalError; "CHARACTER PARSER CALLED WITHOUT MATCH"))?;
        let kind = match self {
            CharParser::Unicode => TokenKind::Char(c),
            CharParser::Bytes => TokenKind::Byte(byte_of(c).map_err(|e| e.in_column(&(0..len)))?),
        };
        Ok((vec![Token::new(0..len, kind)], len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Config, ErrorCode};

    fn string(parser: StringParser, source: Source) -> Result<(Str, usize)> {
        let registry = Registry::empty(Config::default());
        let (mut tokens, len) = parser.parse(source, &registry)?;
        match tokens.pop().map(|t| t.kind) {
            Some(TokenKind::String(s)) => Ok((s, len)),
            other => panic!("not a string: {:?}", other),
        }
    }

    fn unicode(text: &str) -> (String, usize) {
        let (s, len) = string(StringParser::Unicode, Source::Text(text)).unwrap();
        match s {
            Str::Unicode(chars) => (chars.into_iter().collect(), len),
            Str::Bytes(_) => panic!("wrong kind"),
        }
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unicode(r#""a\nb" 1"#), ("a\nb".to_string(), 6));
        assert_eq!(unicode(r#""say \"hi\"""#), ("say \"hi\"".to_string(), 12));
        assert_eq!(unicode("\"ab\\\ncd\""), ("abcd".to_string(), 8));
        assert_eq!(unicode(r#""a\qb""#), ("a\\qb".to_string(), 6));
    }

    #[test]
    fn test_newline_ends_string() {
        assert_eq!(unicode("\"abc\n+"), ("abc".to_string(), 4));
        assert_eq!(unicode("\"abc"), ("abc".to_string(), 4));
    }

    #[test]
    fn test_byte_form() {
        let src = [b'"', b'x', 0xF8, 0x2A, b'\\', 0x80, b'"'];
        let (s, len) = string(StringParser::Unicode, Source::Bytes(&src)).unwrap();
        assert_eq!(len, 7);
        assert_eq!(s, Str::Unicode("x42\u{80}".chars().collect()));
        let bad = [b'"', 0xF8, 0xFF, b'"'];
        let err = string(StringParser::Unicode, Source::Bytes(&bad)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueError);
        assert_eq!(err.column(), 1..2);
    }

    #[test]
    fn test_byte_string() {
        let (s, len) = string(StringParser::Bytes, Source::Text("b\"\u{e9}!\"")).unwrap();
        assert_eq!(s, Str::Bytes(vec![0xE9, b'!']));
        assert_eq!(len, 6);
        let err = string(StringParser::Bytes, Source::Text("b\"\u{2260}\"")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueError);
    }

    #[test]
    fn test_chars() {
        let registry = Registry::empty(Config::default());
        let (tokens, len) = CharParser::Unicode.parse(Source::Text("'\u{2260}x"), &registry).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Char('\u{2260}'));
        assert_eq!(len, 4);
        let (tokens, len) = CharParser::Bytes.parse(Source::Bytes(b"b'A"), &registry).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Byte(b'A'));
        assert_eq!(len, 3);
        assert_eq!(CharParser::Unicode.matches(Source::Text("'"), &registry), 0);
        assert!(CharParser::Bytes.parse(Source::Bytes(&[b'b', b'\'', 0x80]), &registry).is_err());
    }
}
