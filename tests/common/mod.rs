#![allow(dead_code)]
use fiddle::lang::{codepage, Config, Registry, Source, Token, TokenKind};
use fiddle::mach::Runtime;

pub fn run(source: Source) -> Runtime {
    let mut runtime = Runtime::default();
    if let Err(error) = runtime.run(source) {
        panic!("{} running {}", error, source);
    }
    runtime
}

pub fn stack(text: &str) -> String {
    run(Source::Text(text)).stack().to_string()
}

/// The byte form of a text program, symbol by symbol.
pub fn compile(text: &str) -> Vec<u8> {
    codepage::encode_str(text)
}

pub fn kinds(source: Source) -> Vec<TokenKind> {
    let registry = Registry::new(Config::default());
    match registry.tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|t: Token| t.kind).collect(),
        Err(error) => panic!("{} tokenizing {}", error, source),
    }
}
