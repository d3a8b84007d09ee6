use super::{Generator, List, Number, Val};
use crate::error;
use crate::lang::Error;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic sequences
///
/// Start defaults to 0 and step to 1 or -1, whichever moves toward
/// the end. The end is never produced. Without an end the sequence
/// is infinite.

#[derive(Clone)]
pub struct Arithmetic {
    current: Number,
    step: Number,
    end: Option<Number>,
    ascending: bool,
}

impl Arithmetic {
    pub fn new(start: Number, end: Option<Number>, step: Option<Number>) -> Result<Arithmetic> {
        let step = match (&end, step) {
            (None, Some(step)) => step,
            (None, None) => Number::one(),
            (Some(end), None) => match end.compare(&start)? {
                Ordering::Less => Number::integer(-1),
                _ => Number::one(),
            },
            (Some(end), Some(step)) => {
                let zero = Number::zero();
                let invalid = match end.compare(&start)? {
                    Ordering::Less => step.compare(&zero)? != Ordering::Less,
                    Ordering::Greater => step.compare(&zero)? != Ordering::Greater,
                    Ordering::Equal => false,
                };
                if invalid {
                    return Err(error!(ValueError; &format!(
                        "STEP {} NEVER REACHES {} FROM {}",
                        step, end, start
                    )));
                }
                step
            }
        };
        let ascending = match &end {
            Some(_) => step.compare(&Number::zero())? == Ordering::Greater,
            None => true,
        };
        Ok(Arithmetic {
            current: start,
            step,
            end,
            ascending,
        })
    }
}

impl Generator for Arithmetic {
    fn next(&mut self) -> Result<Option<Val>> {
        if let Some(end) = &self.end {
            let done = match self.current.compare(end)? {
                Ordering::Equal => true,
                Ordering::Greater => self.ascending,
                Ordering::Less => !self.ascending,
            };
            if done {
                return Ok(None);
            }
        }
        let next = self.current.add(&self.step);
        if self.end.is_some() && next.num_eq(&self.current) {
            return Err(stalled(&self.current));
        }
        Ok(Some(Val::Number(std::mem::replace(&mut self.current, next))))
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        Some(Box::new(self.clone()))
    }

    fn is_infinite(&self) -> bool {
        self.end.is_none()
    }
}

/// ## Geometric sequences
///
/// Bounded sequences stop by magnitude: `1 8 -2` gives `1 -2 4`.

#[derive(Clone)]
pub struct Geometric {
    current: Number,
    step: Number,
    end: Option<Number>,
}

/// A bounded sequence whose next item equals the current one never ends.
fn stalled(current: &Number) -> Error {
    error!(ValueError; &format!("SEQUENCE STOPS MOVING AT {}", current))
}

fn half() -> Number {
    Number::rational(BigRational::new(BigInt::from(1), BigInt::from(2)))
}

impl Geometric {
    pub fn new(start: Number, end: Option<Number>, step: Option<Number>) -> Result<Geometric> {
        if let Some(end) = &end {
            if start.is_zero() && !end.is_zero() {
                return Err(error!(ValueError; &format!(
                    "GEOMETRIC SEQUENCE FROM 0 NEVER REACHES {}",
                    end
                )));
            }
        }
        let step = match (&end, step) {
            (None, Some(step)) => step,
            (None, None) => Number::integer(2),
            (Some(end), None) => {
                let growing = end.abs().compare(&start.abs())? != Ordering::Less;
                let same_sign = end.sign()? == start.sign()?;
                match (growing, same_sign) {
                    (true, true) => Number::integer(2),
                    (false, true) => half(),
                    (true, false) => Number::integer(-2),
                    (false, false) => half().neg(),
                }
            }
            (Some(end), Some(step)) => {
                let magnitude = step.abs().compare(&Number::one())?;
                let invalid = match end.abs().compare(&start.abs())? {
                    Ordering::Less => magnitude != Ordering::Less,
                    Ordering::Greater => magnitude != Ordering::Greater,
                    Ordering::Equal => false,
                };
                if invalid {
                    return Err(error!(ValueError; &format!(
                        "STEP {} NEVER REACHES {} FROM {}",
                        step, end, start
                    )));
                }
                step
            }
        };
        Ok(Geometric {
            current: start,
            step,
            end,
        })
    }
}

impl Generator for Geometric {
    fn next(&mut self) -> Result<Option<Val>> {
        if let Some(end) = &self.end {
            let reached = self.current.abs().compare(&end.abs())?;
            let done = match self.step.abs().compare(&Number::one())? {
                Ordering::Greater => reached != Ordering::Less,
                Ordering::Less if !self.step.is_zero() => reached != Ordering::Greater,
                _ => return Err(error!(ValueError; "GEOMETRIC STEP MUST NOT HAVE MAGNITUDE 0 OR 1")),
            };
            if done {
                return Ok(None);
            }
        }
        let next = self.current.mul(&self.step);
        if self.end.is_some() && next.num_eq(&self.current) {
            return Err(stalled(&self.current));
        }
        Ok(Some(Val::Number(std::mem::replace(&mut self.current, next))))
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        Some(Box::new(self.clone()))
    }

    fn is_infinite(&self) -> bool {
        self.end.is_none()
    }
}

/// Several generators, one after the other.
pub struct Chain {
    parts: VecDeque<Box<dyn Generator>>,
}

impl Chain {
    pub fn new(parts: Vec<Box<dyn Generator>>) -> Chain {
        Chain {
            parts: parts.into(),
        }
    }
}

impl Generator for Chain {
    fn next(&mut self) -> Result<Option<Val>> {
        while let Some(part) = self.parts.front_mut() {
            if let Some(val) = part.next()? {
                return Ok(Some(val));
            }
            self.parts.pop_front();
        }
        Ok(None)
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        let parts = self
            .parts
            .iter()
            .map(|p| p.try_clone())
            .collect::<Option<VecDeque<_>>>()?;
        Some(Box::new(Chain { parts }))
    }

    fn is_infinite(&self) -> bool {
        self.parts.iter().any(|p| p.is_infinite())
    }
}

/// A finite list read `times` over, each pass from its own copy.
pub struct Cycle {
    list: List,
    remaining: usize,
    pass: Option<Box<dyn Generator>>,
}

impl Cycle {
    pub fn new(list: List, times: usize) -> Cycle {
        Cycle {
            list,
            remaining: times,
            pass: None,
        }
    }
}

impl Generator for Cycle {
    fn next(&mut self) -> Result<Option<Val>> {
        loop {
            if let Some(pass) = self.pass.as_mut() {
                if let Some(val) = pass.next()? {
                    return Ok(Some(val));
                }
                self.pass = None;
            }
            if self.remaining == 0 || self.list.is_empty()? {
                return Ok(None);
            }
            self.remaining -= 1;
            let copy = self.list.deep_copy().unwrap_or_else(|_| self.list.clone());
            self.pass = Some(Box::new(copy.cursor()));
        }
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        let pass = match &self.pass {
            Some(pass) => Some(pass.try_clone()?),
            None => None,
        };
        Some(Box::new(Cycle {
            list: self.list.clone(),
            remaining: self.remaining,
            pass,
        }))
    }
}

/// One operand position of a `Zip`.
pub enum Lane {
    Seq(Box<dyn Generator>),
    Repeat(Val),
}

impl Lane {
    fn try_clone(&self) -> Option<Lane> {
        match self {
            Lane::Seq(g) => g.try_clone().map(Lane::Seq),
            Lane::Repeat(v) => Some(Lane::Repeat(v.clone())),
        }
    }
}

pub type ZipFn = Rc<dyn Fn(Vec<Val>) -> Result<Val>>;

/// Calls `call` with one value from every lane until any sequence ends.
pub struct Zip {
    lanes: Vec<Lane>,
    call: ZipFn,
}

impl Zip {
    pub fn new(lanes: Vec<Lane>, call: ZipFn) -> Zip {
        Zip { lanes, call }
    }
}

impl Generator for Zip {
    fn next(&mut self) -> Result<Option<Val>> {
        let mut args = Vec::with_capacity(self.lanes.len());
        for lane in self.lanes.iter_mut() {
            match lane {
                Lane::Seq(g) => match g.next()? {
                    Some(v) => args.push(v),
                    None => return Ok(None),
                },
                Lane::Repeat(v) => args.push(v.clone()),
            }
        }
        (self.call)(args).map(Some)
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        let lanes = self
            .lanes
            .iter()
            .map(Lane::try_clone)
            .collect::<Option<Vec<_>>>()?;
        Some(Box::new(Zip {
            lanes,
            call: self.call.clone(),
        }))
    }

    fn is_infinite(&self) -> bool {
        let mut seqs = self.lanes.iter().filter_map(|lane| match lane {
            Lane::Seq(g) => Some(g),
            Lane::Repeat(_) => None,
        });
        match seqs.next() {
            Some(first) => first.is_infinite() && seqs.all(|g| g.is_infinite()),
            None => true,
        }
    }
}
