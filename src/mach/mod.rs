/*!
## Rust Machine Module

This Rust module holds the values of the language, the stack they
live on, and the commands that act on them.

*/

mod function;
mod list;
mod number;
mod operation;
mod runtime;
mod stack;
mod val;

pub mod sequence;

pub use function::{Command, Depth, Function, StackCommand};
pub use list::{Cursor, Foreign, Generator, InfiniteLength, List};
pub use number::Number;
pub use operation::Operation;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::{byte_of, Str, Val};
