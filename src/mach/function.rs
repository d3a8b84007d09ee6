use super::{Stack, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Commands
///
/// A basic command pops `arity` values, oldest first, and pushes
/// `returns` values in order. A stack command works on the stack
/// directly.

#[derive(Clone, Copy)]
pub enum Function {
    Nullary(fn() -> Result<Val>),
    Unary(fn(Val) -> Result<Val>),
    Binary(fn(Val, Val) -> Result<Val>),
    Ternary(fn(Val, Val, Val) -> Result<Val>),
    Multi(fn(Vec<Val>) -> Result<Vec<Val>>),
}

impl Function {
    pub fn call(&self, args: Vec<Val>) -> Result<Vec<Val>> {
        match *self {
            Function::Nullary(f) => Ok(vec![f()?]),
            Function::Unary(f) => {
                let [a] = operands(args);
                Ok(vec![f(a)?])
            }
            Function::Binary(f) => {
                let [a, b] = operands(args);
                Ok(vec![f(a, b)?])
            }
            Function::Ternary(f) => {
                let [a, b, c] = operands(args);
                Ok(vec![f(a, b, c)?])
            }
            Function::Multi(f) => f(args),
        }
    }
}

fn operands<const N: usize>(args: Vec<Val>) -> [Val; N] {
    let mut args = args.into_iter();
    std::array::from_fn(|_| args.next().unwrap_or_else(|| Val::integer(0)))
}

#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub arity: usize,
    pub returns: usize,
    pub function: Function,
}

impl Command {
    pub fn nullary(name: &'static str, f: fn() -> Result<Val>) -> Command {
        Command::new(name, 0, 1, Function::Nullary(f))
    }

    pub fn unary(name: &'static str, f: fn(Val) -> Result<Val>) -> Command {
        Command::new(name, 1, 1, Function::Unary(f))
    }

    pub fn binary(name: &'static str, f: fn(Val, Val) -> Result<Val>) -> Command {
        Command::new(name, 2, 1, Function::Binary(f))
    }

    pub fn ternary(name: &'static str, f: fn(Val, Val, Val) -> Result<Val>) -> Command {
        Command::new(name, 3, 1, Function::Ternary(f))
    }

    pub fn multi(
        name: &'static str,
        arity: usize,
        returns: usize,
        f: fn(Vec<Val>) -> Result<Vec<Val>>,
    ) -> Command {
        Command::new(name, arity, returns, Function::Multi(f))
    }

    fn new(name: &'static str, arity: usize, returns: usize, function: Function) -> Command {
        Command {
            name,
            arity,
            returns,
            function,
        }
    }

    /// Run against already popped arguments and check the result count.
    pub fn call(&self, args: Vec<Val>) -> Result<Vec<Val>> {
        let results = self.function.call(args)?;
        if results.len() != self.returns {
            return Err(error!(TypeError; &format!(
                "{} RETURNED {} VALUES, EXPECTED {}",
                self.name,
                results.len(),
                self.returns
            )));
        }
        Ok(results)
    }

    pub fn apply(&self, stack: &mut Stack) -> Result<()> {
        let args = stack.pop_n(self.arity)?;
        for val in self.call(args)? {
            stack.push(val);
        }
        Ok(())
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Command) -> bool {
        self.name == other.name && self.arity == other.arity && self.returns == other.returns
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Command({}/{}->{})", self.name, self.arity, self.returns)
    }
}

#[derive(Clone, Copy)]
pub struct StackCommand {
    pub name: &'static str,
    pub function: fn(&mut Stack) -> Result<()>,
}

impl StackCommand {
    pub fn new(name: &'static str, function: fn(&mut Stack) -> Result<()>) -> StackCommand {
        StackCommand { name, function }
    }

    pub fn apply(&self, stack: &mut Stack) -> Result<()> {
        (self.function)(stack)
    }
}

impl PartialEq for StackCommand {
    fn eq(&self, other: &StackCommand) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for StackCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackCommand({})", self.name)
    }
}

/// How many list levels a vectorized command reaches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Levels(u32),
    Unbounded,
}

impl Depth {
    pub fn deeper(self, other: Depth) -> Depth {
        match (self, other) {
            (Depth::Levels(a), Depth::Levels(b)) => Depth::Levels(a.saturating_add(b)),
            _ => Depth::Unbounded,
        }
    }

    /// The depth left after descending one level, `None` at the bottom.
    pub fn descend(self) -> Option<Depth> {
        match self {
            Depth::Levels(0) | Depth::Levels(1) => None,
            Depth::Levels(n) => Some(Depth::Levels(n - 1)),
            Depth::Unbounded => Some(Depth::Unbounded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(v: Val) -> Result<Vec<Val>> {
        Ok(vec![v.clone(), v])
    }

    #[test]
    fn test_return_count_checked() {
        let bad = Command::multi("x", 1, 1, |args| pair(args.into_iter().next().unwrap_or(Val::integer(0))));
        assert!(bad.call(vec![Val::integer(1)]).is_err());
        let good = Command::multi("x", 1, 2, |args| pair(args.into_iter().next().unwrap_or(Val::integer(0))));
        assert_eq!(good.call(vec![Val::integer(1)]).unwrap().len(), 2);
    }

    #[test]
    fn test_depth() {
        assert_eq!(Depth::Levels(1).deeper(Depth::Levels(2)), Depth::Levels(3));
        assert_eq!(Depth::Levels(1).deeper(Depth::Unbounded), Depth::Unbounded);
        assert_eq!(Depth::Levels(2).descend(), Some(Depth::Levels(1)));
        assert_eq!(Depth::Levels(1).descend(), None);
        assert_eq!(Depth::Unbounded.descend(), Some(Depth::Unbounded));
    }
}
