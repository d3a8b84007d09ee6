use super::sequence::{Arithmetic, Chain, Cycle, Geometric, Lane, Zip, ZipFn};
use super::{Command, Depth, Foreign, Generator, List, Number, Str, Val};
use crate::error;
use crate::lang::{Error, ErrorCode};
use num_complex::Complex64;
use std::cmp::Ordering;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

const MAX_REPEAT: usize = 1 << 24;

pub struct Operation {}

fn number(val: Val) -> Result<Number> {
    match val {
        Val::Number(n) => Ok(n),
        other => Err(error!(TypeError; &format!("EXPECTED NUMBER, FOUND {}", other.type_name()))),
    }
}

fn numbers(lhs: Val, rhs: Val) -> Result<(Number, Number)> {
    Ok((number(lhs)?, number(rhs)?))
}

fn mismatch(lhs: &Val, rhs: &Val) -> Error {
    error!(TypeError; &format!("{} AND {}", lhs.type_name(), rhs.type_name()))
}

/// A private reader over `list`. Falls back to sharing when the list
/// holds a one-shot sequence.
fn lane(list: &List) -> Box<dyn Generator> {
    let copy = list.deep_copy().unwrap_or_else(|_| list.clone());
    Box::new(copy.cursor())
}

fn chain(parts: Vec<Box<dyn Generator>>) -> Val {
    Val::List(List::from_generator(Box::new(Chain::new(parts))))
}

/// Counts of zero or less repeat nothing.
fn repeat_count(n: &Number, unit: usize) -> Result<usize> {
    if n.compare(&Number::zero())? != Ordering::Greater {
        return Ok(0);
    }
    match n.to_usize() {
        Some(times) if times.saturating_mul(unit.max(1)) <= MAX_REPEAT => Ok(times),
        _ => Err(error!(ValueError; &format!("CANNOT REPEAT {} TIMES", n))),
    }
}

fn char_of(val: &Val) -> Option<char> {
    match val {
        Val::Char(c) => Some(*c),
        Val::Number(n) => n.to_bigint().and_then(|i| u32::try_from(i).ok()).and_then(char::from_u32),
        _ => None,
    }
}

fn byte_of(val: &Val) -> Option<u8> {
    match val {
        Val::Byte(b) => Some(*b),
        Val::Char(c) => u8::try_from(*c as u32).ok(),
        Val::Number(n) => n.to_bigint().and_then(|i| u8::try_from(i).ok()),
        _ => None,
    }
}

impl Operation {
    pub fn catalog() -> Vec<Command> {
        vec![
            Command::binary("+", Operation::add),
            Command::binary("-", Operation::subtract),
            Command::binary("*", Operation::multiply),
            Command::binary("/", Operation::divide),
            Command::binary("%", Operation::modulo),
            Command::multi("§", 2, 2, Operation::divmod),
            Command::unary("i", Operation::imaginary),
            Command::binary("|", Operation::concatenate),
            Command::binary("=", Operation::equal),
            Command::binary("≠", Operation::not_equal),
            Command::binary("<", Operation::less),
            Command::binary("≤", Operation::less_equal),
            Command::binary(">", Operation::greater),
            Command::binary("≥", Operation::greater_equal),
            Command::unary("↑", Operation::geometric),
            Command::binary("↥", Operation::geometric_step),
            Command::ternary("↟", Operation::geometric_bounded),
            Command::unary("⇉", Operation::arithmetic),
            Command::binary("⇶", Operation::arithmetic_range),
            Command::binary("@", Operation::index),
            Command::unary("l", Operation::length),
            Command::binary("t", Operation::take),
            Command::multi("s", 2, 2, Operation::swap),
            Command::multi("d", 1, 2, Operation::duplicate),
            Command::nullary("I", Operation::input),
        ]
    }

    pub fn add(lhs: Val, rhs: Val) -> Result<Val> {
        match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => Ok(Val::Number(l.add(&r))),
            (Val::List(l), Val::List(r)) => {
                let call: ZipFn = Rc::new(|args: Vec<Val>| {
                    let [a, b]: [Val; 2] = args
                        .try_into()
                        .map_err(|_| error!(InternalError; "ZIP ARITY"))?;
                    Operation::add(a, b)
                });
                let zip = Zip::new(vec![Lane::Seq(lane(&l)), Lane::Seq(lane(&r))], call);
                Ok(Val::List(List::from_generator(Box::new(zip))))
            }
            (l, r) => Err(mismatch(&l, &r)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = numbers(lhs, rhs)?;
        Ok(Val::Number(l.sub(&r)))
    }

    /// Numbers multiply. A count times a list or string repeats it.
    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => Ok(Val::Number(l.mul(&r))),
            (Val::Number(n), Val::List(list)) => {
                let times = repeat_count(&n, 1)?;
                if times == 0 {
                    return Ok(Val::List(List::from_vec(vec![])));
                }
                if list.is_infinite() {
                    return Ok(Val::List(list.deep_copy()?));
                }
                Ok(Val::List(List::from_generator(Box::new(Cycle::new(list, times)))))
            }
            (Val::Number(n), Val::String(s)) => Ok(Val::String(match s {
                Str::Unicode(chars) => {
                    let times = repeat_count(&n, chars.len())?;
                    Str::Unicode(chars.repeat(times))
                }
                Str::Bytes(bytes) => {
                    let times = repeat_count(&n, bytes.len())?;
                    Str::Bytes(bytes.repeat(times))
                }
            })),
            (l, r) => Err(mismatch(&l, &r)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = numbers(lhs, rhs)?;
        Ok(Val::Number(l.div(&r)?))
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = numbers(lhs, rhs)?;
        Ok(Val::Number(l.div_rem(&r)?.1))
    }

    pub fn divmod(args: Vec<Val>) -> Result<Vec<Val>> {
        let mut args = args.into_iter();
        let lhs = args.next().unwrap_or_else(|| Val::integer(0));
        let rhs = args.next().unwrap_or_else(|| Val::integer(0));
        let (l, r) = numbers(lhs, rhs)?;
        let (q, m) = l.div_rem(&r)?;
        Ok(vec![Val::Number(q), Val::Number(m)])
    }

    pub fn imaginary(val: Val) -> Result<Val> {
        let n = number(val)?;
        Ok(Val::Number(n.mul(&Number::complex(Complex64::new(0.0, 1.0)))))
    }

    pub fn concatenate(lhs: Val, rhs: Val) -> Result<Val> {
        if let Val::List(list) = &lhs {
            if list.is_infinite() {
                return Ok(lhs);
            }
        }
        match (lhs, rhs) {
            (Val::String(Str::Unicode(mut a)), rhs) => match rhs {
                Val::String(Str::Unicode(b)) => {
                    a.extend(b);
                    Ok(Val::String(Str::Unicode(a)))
                }
                Val::String(Str::Bytes(b)) => {
                    let mut bytes = Str::Unicode(a).to_bytes()?;
                    bytes.extend(b);
                    Ok(Val::String(Str::Bytes(bytes)))
                }
                rhs => match char_of(&rhs) {
                    Some(c) => {
                        a.push(c);
                        Ok(Val::String(Str::Unicode(a)))
                    }
                    None => Operation::concatenate_lists(Val::String(Str::Unicode(a)), rhs),
                },
            },
            (Val::String(Str::Bytes(mut a)), rhs) => match rhs {
                Val::String(s) => {
                    a.extend(s.to_bytes()?);
                    Ok(Val::String(Str::Bytes(a)))
                }
                rhs => match byte_of(&rhs) {
                    Some(b) => {
                        a.push(b);
                        Ok(Val::String(Str::Bytes(a)))
                    }
                    None => Operation::concatenate_lists(Val::String(Str::Bytes(a)), rhs),
                },
            },
            (Val::Char(c), Val::String(Str::Unicode(b))) => {
                Ok(Val::String(Str::Unicode(std::iter::once(c).chain(b).collect())))
            }
            (Val::Char(a), Val::Char(b)) => Ok(Val::String(Str::Unicode(vec![a, b]))),
            (Val::Byte(b), Val::String(s)) => {
                let mut bytes = vec![b];
                bytes.extend(s.to_bytes()?);
                Ok(Val::String(Str::Bytes(bytes)))
            }
            (Val::Byte(a), Val::Byte(b)) => Ok(Val::String(Str::Bytes(vec![a, b]))),
            (lhs, rhs) => Operation::concatenate_lists(lhs, rhs),
        }
    }

    fn concatenate_lists(lhs: Val, rhs: Val) -> Result<Val> {
        let part = |val: Val| -> Box<dyn Generator> {
            match val {
                Val::List(list) => lane(&list),
                other => Box::new(List::from_vec(vec![other]).cursor()),
            }
        };
        if lhs.is_list() || rhs.is_list() {
            Ok(chain(vec![part(lhs), part(rhs)]))
        } else {
            Ok(Val::List(List::from_vec(vec![lhs, rhs])))
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(lhs.equals(&rhs)?))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(!lhs.equals(&rhs)?))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(lhs.compare(&rhs)? == Ordering::Less))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(lhs.compare(&rhs)? != Ordering::Greater))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(lhs.compare(&rhs)? == Ordering::Greater))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::boolean(lhs.compare(&rhs)? != Ordering::Less))
    }

    pub fn geometric(start: Val) -> Result<Val> {
        let seq = Geometric::new(number(start)?, None, None)?;
        Ok(Val::List(List::from_generator(Box::new(seq))))
    }

    pub fn geometric_step(start: Val, step: Val) -> Result<Val> {
        let seq = Geometric::new(number(start)?, None, Some(number(step)?))?;
        Ok(Val::List(List::from_generator(Box::new(seq))))
    }

    pub fn geometric_bounded(start: Val, end: Val, step: Val) -> Result<Val> {
        let seq = Geometric::new(number(start)?, Some(number(end)?), Some(number(step)?))?;
        Ok(Val::List(List::from_generator(Box::new(seq))))
    }

    pub fn arithmetic(start: Val) -> Result<Val> {
        let seq = Arithmetic::new(number(start)?, None, None)?;
        Ok(Val::List(List::from_generator(Box::new(seq))))
    }

    pub fn arithmetic_range(start: Val, end: Val) -> Result<Val> {
        let seq = Arithmetic::new(number(start)?, Some(number(end)?), None)?;
        Ok(Val::List(List::from_generator(Box::new(seq))))
    }

    pub fn index(seq: Val, index: Val) -> Result<Val> {
        let i = index.to_isize()?;
        match seq {
            Val::List(list) => list.get(i),
            Val::String(s) => {
                let len = s.len() as isize;
                let position = if i < 0 { len + i } else { i };
                if position < 0 || position >= len {
                    return Err(error!(Underflow; &format!("INDEX {} OUT OF RANGE", i)));
                }
                Ok(match s {
                    Str::Unicode(chars) => Val::Char(chars[position as usize]),
                    Str::Bytes(bytes) => Val::Byte(bytes[position as usize]),
                })
            }
            other => Err(error!(TypeError; &format!("CANNOT INDEX {}", other.type_name()))),
        }
    }

    /// Infinite lists have length `inf`.
    pub fn length(seq: Val) -> Result<Val> {
        match seq {
            Val::List(list) => match list.len() {
                Ok(len) => Ok(Val::integer(len)),
                Err(e) if e.code() == ErrorCode::Infinite => {
                    Ok(Val::Number(Number::Float(f64::INFINITY)))
                }
                Err(e) => Err(e),
            },
            Val::String(s) => Ok(Val::integer(s.len())),
            other => Err(error!(TypeError; &format!("{} HAS NO LENGTH", other.type_name()))),
        }
    }

    pub fn take(seq: Val, count: Val) -> Result<Val> {
        let n = count.to_usize()?;
        match seq {
            Val::List(list) => Ok(Val::List(List::from_vec(list.take(n)?))),
            Val::String(Str::Unicode(chars)) => {
                Ok(Val::String(Str::Unicode(chars.into_iter().take(n).collect())))
            }
            Val::String(Str::Bytes(bytes)) => {
                Ok(Val::String(Str::Bytes(bytes.into_iter().take(n).collect())))
            }
            other => Err(error!(TypeError; &format!("CANNOT TAKE FROM {}", other.type_name()))),
        }
    }

    pub fn swap(args: Vec<Val>) -> Result<Vec<Val>> {
        let mut args = args;
        args.reverse();
        Ok(args)
    }

    /// The second copy shares no list nodes with the first.
    pub fn duplicate(args: Vec<Val>) -> Result<Vec<Val>> {
        let val = args.into_iter().next().unwrap_or_else(|| Val::integer(0));
        let copy = val.deep_copy()?;
        Ok(vec![val, copy])
    }

    /// Lines of standard input, read as they are needed.
    pub fn input() -> Result<Val> {
        let lines = std::io::stdin()
            .lines()
            .map_while(|line| line.ok())
            .map(|line| Val::String(Str::Unicode(line.chars().collect())));
        Ok(Val::List(List::from_generator(Box::new(Foreign(lines)))))
    }

    /// Apply a single-result command element-wise over list operands.
    /// Other operands are repeated. List operands must agree in length.
    pub fn vectorize(command: Command, depth: Depth, args: Vec<Val>) -> Result<Val> {
        let mut lengths = vec![];
        for arg in &args {
            if let Val::List(list) = arg {
                match list.len() {
                    Ok(len) => lengths.push(Some(len)),
                    Err(e) if e.code() == ErrorCode::Infinite => lengths.push(None),
                    Err(e) => return Err(e),
                }
            }
        }
        if lengths.is_empty() {
            return command
                .call(args)?
                .pop()
                .ok_or_else(|| error!(TypeError; &format!("{} RETURNED NOTHING", command.name)));
        }
        if lengths.iter().any(|len| *len != lengths[0]) {
            return Err(error!(ValueError; &format!(
                "{} OVER LISTS OF DIFFERENT LENGTHS",
                command.name
            )));
        }
        let lanes = args
            .into_iter()
            .map(|arg| match arg {
                Val::List(list) => Lane::Seq(lane(&list)),
                other => Lane::Repeat(other),
            })
            .collect();
        let inner = depth.descend();
        let call: ZipFn = Rc::new(move |args: Vec<Val>| match inner {
            Some(depth) => Operation::vectorize(command, depth, args),
            None => command.call(args)?.pop().ok_or_else(|| error!(TypeError)),
        });
        Ok(Val::List(List::from_generator(Box::new(Zip::new(lanes, call)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[i64]) -> Val {
        Val::List(List::from_vec(items.iter().map(|i| Val::integer(*i)).collect()))
    }

    fn command(name: &str) -> Command {
        Operation::catalog()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
    }

    #[test]
    fn test_add_lists_zips() {
        let sum = Operation::add(list(&[1, 2, 3]), list(&[10, 20])).unwrap();
        assert_eq!(sum.to_string(), "[11, 22]");
        assert!(Operation::add(Val::integer(1), Val::Char('a')).is_err());
    }

    #[test]
    fn test_multiply_repeats() {
        let rep = Operation::multiply(Val::integer(2), list(&[1, 2])).unwrap();
        assert_eq!(rep.to_string(), "[1, 2, 1, 2]");
        let s = Val::String(Str::Unicode(vec!['a']));
        assert_eq!(Operation::multiply(Val::integer(3), s).unwrap().to_string(), "\"aaa\"");
    }

    #[test]
    fn test_multiply_bounds_repeat_count() {
        let huge = Val::Number(Number::integer(10_000_000_000_000_000_000u64));
        let s = Val::String(Str::Unicode(vec!['a']));
        let err = Operation::multiply(huge.clone(), s).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueError);
        let err = Operation::multiply(huge, list(&[1])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueError);
        let wide = Val::String(Str::Bytes(vec![b'x'; 1 << 12]));
        assert!(Operation::multiply(Val::integer(1 << 13), wide).is_err());
    }

    #[test]
    fn test_multiply_by_nothing_is_empty() {
        let s = Val::String(Str::Unicode(vec!['a']));
        assert_eq!(Operation::multiply(Val::integer(-2), s).unwrap().to_string(), "\"\"");
        assert_eq!(Operation::multiply(Val::integer(0), list(&[1, 2])).unwrap().to_string(), "[]");
        let naturals = Operation::arithmetic(Val::integer(0)).unwrap();
        let empty = Operation::multiply(Val::integer(-1), naturals.clone()).unwrap();
        assert_eq!(empty.to_string(), "[]");
        let copy = Operation::multiply(Val::integer(3), naturals).unwrap();
        assert_eq!(copy.to_string(), "[0, 1, 2, 3, 4, ...]");
    }

    #[test]
    fn test_concatenate() {
        let s = Val::String(Str::Unicode(vec!['a']));
        assert_eq!(Operation::concatenate(s.clone(), Val::Char('b')).unwrap().to_string(), "\"ab\"");
        assert_eq!(Operation::concatenate(s, Val::integer(99)).unwrap().to_string(), "\"ac\"");
        let joined = Operation::concatenate(list(&[1]), list(&[2, 3])).unwrap();
        assert_eq!(joined.to_string(), "[1, 2, 3]");
        let pair = Operation::concatenate(Val::integer(1), Val::integer(2)).unwrap();
        assert_eq!(pair.to_string(), "[1, 2]");
    }

    #[test]
    fn test_sequences() {
        let geo = Operation::geometric(Val::integer(3)).unwrap();
        assert_eq!(geo.to_string(), "[3, 6, 12, 24, 48, ...]");
        let range = Operation::arithmetic_range(Val::integer(0), Val::integer(3)).unwrap();
        assert_eq!(range.to_string(), "[0, 1, 2]");
        let len = Operation::length(Operation::arithmetic(Val::integer(0)).unwrap()).unwrap();
        assert_eq!(len.to_string(), "inf");
        let err = Operation::geometric_bounded(Val::integer(0), Val::integer(5), Val::integer(2));
        assert_eq!(err.unwrap_err().code(), ErrorCode::ValueError);
    }

    #[test]
    fn test_vectorize_depth() {
        let nested = Val::List(List::from_vec(vec![list(&[1, 2]), list(&[3])]));
        let once = Operation::vectorize(command("-"), Depth::Levels(1), vec![nested.clone(), Val::integer(1)]);
        match once.unwrap() {
            Val::List(l) => assert_eq!(l.get(0).unwrap_err().code(), ErrorCode::TypeError),
            other => panic!("expected list, found {}", other),
        }
        let twice = Operation::vectorize(command("-"), Depth::Levels(2), vec![nested, Val::integer(1)]).unwrap();
        assert_eq!(twice.to_string(), "[[0, 1], [2]]");
    }

    #[test]
    fn test_vectorize_length_mismatch() {
        let err = Operation::vectorize(command("*"), Depth::Unbounded, vec![list(&[1, 2]), list(&[1])]);
        assert_eq!(err.unwrap_err().code(), ErrorCode::ValueError);
    }

    #[test]
    fn test_index_and_take() {
        let seq = Operation::arithmetic(Val::integer(5)).unwrap();
        assert_eq!(Operation::index(seq.clone(), Val::integer(2)).unwrap().to_string(), "7");
        assert_eq!(Operation::take(seq, Val::integer(2)).unwrap().to_string(), "[5, 6]");
        let s = Val::String(Str::Unicode("xyz".chars().collect()));
        assert_eq!(Operation::index(s, Val::integer(-1)).unwrap().to_string(), "z");
    }

    #[test]
    fn test_swap_and_duplicate() {
        let swapped = Operation::swap(vec![Val::integer(1), Val::integer(2)]).unwrap();
        assert_eq!(swapped[0].to_string(), "2");
        let dup = Operation::duplicate(vec![list(&[1])]).unwrap();
        match (&dup[0], &dup[1]) {
            (Val::List(a), Val::List(b)) => assert!(!a.same(b)),
            _ => panic!("expected lists"),
        }
    }
}
