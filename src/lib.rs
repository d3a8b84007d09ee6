//! # Fiddle
//!
//! A stack language built for density. Every program has two forms:
//! text, where each command is a single Unicode symbol, and bytes,
//! where the common symbols take one byte each from a private code
//! page and everything else falls back to a short multi-byte escape.
//! Both forms tokenize to the same program.
//!
//! ```text
//! $ fiddle -c '5 3 +'
//! [8]
//! $ fiddle -c '1 2 3 [4 5] v+'
//! [[8, 7], 2, 1]
//! ```
//!
//! Tokens run as soon as they are parsed. Lists may be lazy and
//! infinite; `2↑ 5t` takes the first five powers of two.

pub mod lang;
pub mod mach;
pub mod term;
