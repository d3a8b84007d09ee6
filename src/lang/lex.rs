use super::command::{CommandParser, FlipParser, RotateParser, VectorizeParser};
use super::list::ListParser;
use super::number::{InlineInteger, NumberParser};
use super::string::{CharParser, StringParser};
use super::{codepage, Config, Error, Source, Token};
use crate::error;
use crate::mach::{Operation, Stack};
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// ## Parsers
///
/// `matches` reports how much of the source a parser would consume
/// and must not fail. `parse` is only called on the winning parser.

pub trait Parser {
    fn name(&self) -> &str;
    fn matches(&self, source: Source, registry: &Registry) -> usize;
    fn parse(&self, source: Source, registry: &Registry) -> Result<(Vec<Token>, usize)>;
}

/// Ordered parser set. Earlier registrations win ties.
pub struct Registry {
    config: Config,
    parsers: Vec<Box<dyn Parser>>,
}

impl Registry {
    pub fn empty(config: Config) -> Registry {
        Registry {
            config,
            parsers: vec![],
        }
    }

    /// Every parser of the language.
    pub fn new(config: Config) -> Registry {
        let mut registry = Registry::empty(config);
        registry.register(Whitespace);
        for parser in NumberParser::all() {
            registry.register(parser);
        }
        registry.register(InlineInteger);
        registry.register(StringParser::Unicode);
        registry.register(StringParser::Bytes);
        registry.register(CharParser::Unicode);
        registry.register(CharParser::Bytes);
        registry.register(ListParser);
        for command in Operation::catalog() {
            registry.register(CommandParser::basic(command));
        }
        for command in Stack::commands() {
            registry.register(CommandParser::stack(command));
        }
        registry.register(RotateParser);
        registry.register(FlipParser);
        registry.register(VectorizeParser);
        debug!(parsers = registry.parsers.len(), ?config, "registry built");
        registry
    }

    pub fn register<P: Parser + 'static>(&mut self, parser: P) -> &mut Registry {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Length of the longest match at the start of `source`, 0 if none.
    pub fn longest_match(&self, source: Source) -> usize {
        self.parsers
            .iter()
            .map(|parser| parser.matches(source, self))
            .max()
            .unwrap_or(0)
    }

    /// Parse one unit at the start of `source` with the longest matching parser.
    pub fn parse_one(&self, source: Source) -> Result<(Vec<Token>, usize)> {
        let mut best: Option<(&dyn Parser, usize)> = None;
        for parser in &self.parsers {
            let len = parser.matches(source, self);
            if len > best.map_or(0, |(_, l)| l) {
                best = Some((&**parser, len));
            }
        }
        let (parser, matched) = match best {
            Some(best) => best,
            None => return Err(unexpected(source)),
        };
        let (tokens, len) = parser
            .parse(source, self)
            .map_err(|e| e.or_column(&(0..matched)))?;
        if len == 0 {
            return Err(error!(InternalError, ..&(0..matched);
                &format!("{} CONSUMED NOTHING", parser.name())));
        }
        trace!(parser = parser.name(), len, tokens = tokens.len(), "parsed");
        Ok((tokens, len))
    }

    /// Parse the whole source.
    pub fn tokenize(&self, source: Source) -> Result<Vec<Token>> {
        let mut tokens = vec![];
        let mut pos = 0;
        while pos < source.len() {
            let (parsed, len) = self
                .parse_one(source.at(pos))
                .map_err(|e| e.shifted(pos))?;
            tokens.extend(parsed.into_iter().map(|t| t.shifted(pos)));
            pos += len;
        }
        Ok(tokens)
    }
}

/// An escape that decodes to no character is a bad value, anything
/// else no parser takes is bad syntax.
fn unexpected(source: Source) -> Error {
    if let Source::Bytes(bytes) = source {
        if let Some((code, width)) = codepage::decode(bytes) {
            if char::from_u32(code).is_none() {
                return error!(ValueError, ..&(0..width);
                    &format!("CODEPOINT {:#X} IS NOT A CHARACTER", code));
            }
        }
    }
    let width = source.next_symbol().map_or(1, |(_, w)| w);
    error!(SyntaxError, ..&(0..width); &format!("UNEXPECTED {}", source.prefix(width)))
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Runs of blanks. Produces no tokens.
pub struct Whitespace;

impl Parser for Whitespace {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        let mut len = 0;
        while let Some((c, w)) = source.at(len).next_symbol() {
            if !is_whitespace(c) {
                break;
            }
            len += w;
        }
        len
    }

    fn parse(&self, source: Source, registry: &Registry) -> Result<(Vec<Token>, usize)> {
        Ok((vec![], self.matches(source, registry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{ErrorCode, TokenKind};
    use crate::mach::Number;

    struct Fixed(&'static str, usize);

    impl Parser for Fixed {
        fn name(&self) -> &str {
            self.0
        }
        fn matches(&self, source: Source, _: &Registry) -> usize {
            if source.len() >= self.1 {
                self.1
            } else {
                0
            }
        }
        fn parse(&self, _: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
            let kind = TokenKind::Number(Number::integer(self.1 as i64));
            Ok((vec![Token::new(0..self.1, kind)], self.1))
        }
    }

    fn winner(registry: &Registry) -> TokenKind {
        let (tokens, _) = registry.parse_one(Source::Text("abcdefg")).unwrap();
        tokens[0].kind.clone()
    }

    #[test]
    fn test_longest_match_wins_in_any_order() {
        let mut registry = Registry::empty(Config::default());
        registry.register(Fixed("two", 2)).register(Fixed("five", 5));
        assert_eq!(winner(&registry), TokenKind::Number(Number::integer(5)));

        let mut registry = Registry::empty(Config::default());
        registry.register(Fixed("five", 5)).register(Fixed("two", 2));
        assert_eq!(winner(&registry), TokenKind::Number(Number::integer(5)));
    }

    #[test]
    fn test_no_match_reports_position() {
        let mut registry = Registry::empty(Config::default());
        registry.register(Whitespace);
        let err = registry.tokenize(Source::Text("  \u{2603}")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SyntaxError);
        assert_eq!(err.column(), 2..5);
    }

    #[test]
    fn test_whitespace_yields_nothing() {
        let registry = Registry::new(Config::default());
        assert_eq!(registry.tokenize(Source::Text(" \t\n ")).unwrap(), vec![]);
    }
}
