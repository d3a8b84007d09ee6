use super::{Operation, Stack, Val};
use crate::error;
use crate::lang::{Config, Error, Flip, Registry, Source, Token, TokenKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime
///
/// Owns the parser registry and the stack. Each token is applied as
/// soon as it is parsed, so a failure leaves the effects of earlier
/// tokens in place.

pub struct Runtime {
    registry: Registry,
    stack: Stack,
    interrupted: Arc<AtomicBool>,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        Runtime {
            registry: Registry::new(config),
            stack: Stack::new(),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Setting the flag stops a run before its next token.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.interrupted.clone()
    }

    pub fn run(&mut self, source: Source) -> Result<()> {
        let mut pos = 0;
        while pos < source.len() {
            if self.interrupted.swap(false, Ordering::SeqCst) {
                return Err(error!(Interrupted, ..&(pos..pos); "BREAK"));
            }
            let (tokens, len) = self
                .registry
                .parse_one(source.at(pos))
                .map_err(|e| e.shifted(pos))?;
            for token in tokens {
                let token = token.shifted(pos);
                trace!(token = %token, column = ?token.column, "apply");
                token
                    .apply(&mut self.stack)
                    .map_err(|e| e.or_column(&token.column))?;
            }
            pos += len;
        }
        Ok(())
    }

    /// Push a comma separated list so that its first item ends on top.
    pub fn preload(&mut self, items: &str) -> Result<()> {
        let source = items.split(',').rev().collect::<Vec<&str>>().join(" ");
        self.run(Source::Text(&source))
    }

    pub fn take_output(&mut self) -> Vec<String> {
        self.stack.take_output()
    }
}

impl Token {
    pub fn apply(&self, stack: &mut Stack) -> Result<()> {
        match &self.kind {
            TokenKind::Number(n) => stack.push(Val::Number(n.clone())),
            TokenKind::Char(c) => stack.push(Val::Char(*c)),
            TokenKind::Byte(b) => stack.push(Val::Byte(*b)),
            TokenKind::String(s) => stack.push(Val::String(s.clone())),
            TokenKind::List(tokens) => {
                let mut inner = Stack::new();
                for token in tokens {
                    token
                        .apply(&mut inner)
                        .map_err(|e| e.or_column(&token.column))?;
                }
                for line in inner.take_output() {
                    stack.print(line);
                }
                stack.push(Val::List(inner.list().clone()));
            }
            TokenKind::Command(command) => command.apply(stack)?,
            TokenKind::Stack(command) => command.apply(stack)?,
            TokenKind::Vectorized(command, depth) => {
                let args = stack.pop_n(command.arity)?;
                stack.push(Operation::vectorize(*command, *depth, args)?);
            }
            TokenKind::Rotate(Some((count, times))) => {
                stack.rotate(operand(*count)?, operand(*times)?)?;
            }
            TokenKind::Rotate(None) => {
                let times = stack.pop()?.to_usize()?;
                let count = stack.pop()?.to_usize()?;
                stack.rotate(count, times)?;
            }
            TokenKind::Flip(Flip::Count(n)) => stack.flip(operand(*n)?)?,
            TokenKind::Flip(Flip::WholeStack) => stack.flip_all()?,
            TokenKind::Flip(Flip::FromStack) => match stack.pop()?.to_usize()? {
                0 => stack.flip_all()?,
                n => stack.flip(n)?,
            },
        }
        Ok(())
    }
}

fn operand(n: u64) -> Result<usize> {
    usize::try_from(n).map_err(|_| error!(ValueError; &format!("{} IS TOO LARGE", n)))
}
