/*!
## Rust Language Module

This Rust module turns Fiddle source, in either text or byte form,
into tokens ready to be applied to a stack.

*/

pub type Column = std::ops::Range<usize>;

#[macro_use]
mod error;
mod command;
mod config;
mod lex;
mod list;
mod number;
mod source;
mod string;
mod token;

pub mod codepage;
pub mod varint;

pub use command::{CommandParser, FlipParser, RotateParser, VectorizeParser};
pub use config::{Config, ParseMode};
pub use error::Error;
pub use error::ErrorCode;
pub use lex::{Parser, Registry, Whitespace};
pub use list::ListParser;
pub use number::{InlineInteger, NumberParser};
pub use source::Source;
pub use string::{CharParser, StringParser};
pub use token::{Flip, Token, TokenKind};
