use super::lex::is_whitespace;
use super::{Error, Parser, Registry, Source, Token, TokenKind};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

/// ## List literals
///
/// `[` runs the full tokenizer until a `]`, which is consumed, or an
/// unescaped newline or the end of input, which are not.

pub struct ListParser;

enum Step {
    Close(usize),
    End,
    Blank(usize),
    Item,
}

fn step(source: Source) -> Step {
    match source.next_symbol() {
        None if source.is_empty() => Step::End,
        Some((']', width)) => Step::Close(width),
        Some(('\n', _)) => Step::End,
        Some((c, width)) if is_whitespace(c) => Step::Blank(width),
        _ => Step::Item,
    }
}

/// Items read so far, how far they reach, and the error that stopped
/// the read if it did not reach the end of the list.
struct Scan {
    items: Vec<Token>,
    len: usize,
    failure: Option<Error>,
}

fn scan(source: Source, registry: &Registry) -> Scan {
    let mut pos = source.starts_with('[');
    let mut items = vec![];
    let mut failure = None;
    while pos > 0 {
        match step(source.at(pos)) {
            Step::Close(width) => {
                pos += width;
                break;
            }
            Step::End => break,
            Step::Blank(width) => pos += width,
            Step::Item => match registry.parse_one(source.at(pos)) {
                Ok((tokens, len)) => {
                    items.extend(tokens.into_iter().map(|t| t.shifted(pos)));
                    pos += len;
                }
                Err(error) => {
                    failure = Some(error.shifted(pos));
                    break;
                }
            },
        }
    }
    Scan {
        items,
        len: pos,
        failure,
    }
}

impl Parser for ListParser {
    fn name(&self) -> &str {
        "list"
    }

    /// Reads the whole list. A list that fails inside still matches up
    /// to the failing item so that `parse` reports where it failed.
    fn matches(&self, source: Source, registry: &Registry) -> usize {
        scan(source, registry).len
    }

    fn parse(&self, source: Source, registry: &Registry) -> Result<(Vec<Token>, usize)> {
        let Scan {
            items,
            len,
            failure,
        } = scan(source, registry);
        if let Some(error) = failure {
            return Err(error);
        }
        if len == 0 {
            return Err(error!(InternalError; "LIST PARSER CALLED WITHOUT MATCH"));
        }
        Ok((vec![Token::new(0..len, TokenKind::List(items))], len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Config, ErrorCode};
    use crate::mach::Number;

    fn list(text: &str) -> (Vec<Token>, usize) {
        let registry = Registry::new(Config::default());
        let (mut tokens, len) = ListParser.parse(Source::Text(text), &registry).unwrap();
        match tokens.pop().map(|t| t.kind) {
            Some(TokenKind::List(items)) => (items, len),
            other => panic!("not a list: {:?}", other),
        }
    }

    fn number(n: i64) -> TokenKind {
        TokenKind::Number(Number::integer(n))
    }

    #[test]
    fn test_closed_by_bracket() {
        let (items, len) = list("[1 2] 3");
        assert_eq!(len, 5);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind, number(2));
        assert_eq!(items[1].column, 3..4);
    }

    #[test]
    fn test_closed_by_newline() {
        let (items, len) = list("[1 [2\n3");
        assert_eq!(len, 5);
        match &items[1].kind {
            TokenKind::List(inner) => {
                assert_eq!(inner[0].kind, number(2));
                assert_eq!(inner[0].column, 4..5);
            }
            other => panic!("not a list: {:?}", other),
        }
    }

    #[test]
    fn test_error_inside() {
        let registry = Registry::new(Config::default());
        let err = ListParser
            .parse(Source::Text("[1 \u{2603}]"), &registry)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SyntaxError);
        assert_eq!(err.column(), 3..6);
        let err = registry.parse_one(Source::Text("[1 \u{2603}]")).unwrap_err();
        assert_eq!(err.column(), 3..6);
    }

    #[test]
    fn test_match_length_is_parsed_length() {
        let registry = Registry::new(Config::default());
        for text in ["[1 2 3]", "[1 [2 3] 4] 5", "[\"]\" 'x]", "[1 2\n3"] {
            let source = Source::Text(text);
            let (_, len) = ListParser.parse(source, &registry).unwrap();
            assert_eq!(ListParser.matches(source, &registry), len, "{}", text);
            assert_eq!(registry.longest_match(source), len, "{}", text);
        }
        assert_eq!(ListParser.matches(Source::Text("[1 [2 3] 4] 5"), &registry), 11);
    }
}
