use super::Val;
use crate::error;
use crate::lang::Error;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

type Result<T> = std::result::Result<T, Error>;

/// Number of leading items shown when displaying an infinite list.
const PREVIEW: usize = 5;

/// ## Lazily produced values
///
/// A list pulls from its generator only when an index past the
/// cache is needed. Produced values are never requested again.

pub trait Generator {
    fn next(&mut self) -> Result<Option<Val>>;

    /// An independent generator at the same position, or `None`
    /// when the underlying source cannot be replayed.
    fn try_clone(&self) -> Option<Box<dyn Generator>>;

    fn is_infinite(&self) -> bool {
        false
    }
}

/// Raised by `len` on a list backed by an unbounded generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfiniteLength;

impl From<InfiniteLength> for Error {
    fn from(_: InfiniteLength) -> Error {
        error!(Infinite)
    }
}

struct Node {
    id: usize,
    items: VecDeque<Val>,
    source: Option<Box<dyn Generator>>,
    infinite: bool,
}

/// Shared handle to a list node. Cloning the handle aliases the node.
#[derive(Clone)]
pub struct List(Rc<RefCell<Node>>);

fn next_id() -> usize {
    static NEXT: AtomicUsize = AtomicUsize::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

impl Default for List {
    fn default() -> List {
        List::new()
    }
}

impl List {
    fn from_parts(
        items: VecDeque<Val>,
        source: Option<Box<dyn Generator>>,
        infinite: bool,
    ) -> List {
        List(Rc::new(RefCell::new(Node {
            id: next_id(),
            items,
            source,
            infinite,
        })))
    }

    pub fn new() -> List {
        List::from_parts(VecDeque::new(), None, false)
    }

    /// Index 0 of `items` becomes index 0 of the list.
    pub fn from_vec(items: Vec<Val>) -> List {
        List::from_parts(items.into(), None, false)
    }

    pub fn from_generator(source: Box<dyn Generator>) -> List {
        let infinite = source.is_infinite();
        List::from_parts(VecDeque::new(), Some(source), infinite)
    }

    pub fn id(&self) -> usize {
        self.0.borrow().id
    }

    pub fn same(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_infinite(&self) -> bool {
        self.0.borrow().infinite
    }

    /// Number of values produced so far.
    pub fn cached(&self) -> usize {
        self.0.borrow().items.len()
    }

    /// Pull from the generator until `want` values are cached, or until
    /// it is exhausted when `want` is `None`.
    fn fill(&self, want: Option<usize>) -> Result<()> {
        if want.is_none() && self.is_infinite() {
            return Err(InfiniteLength.into());
        }
        loop {
            let mut source = {
                let mut node = self.0.borrow_mut();
                if want.map_or(false, |w| node.items.len() >= w) {
                    return Ok(());
                }
                match node.source.take() {
                    Some(source) => source,
                    None => return Ok(()),
                }
            };
            let next = source.next();
            let mut node = self.0.borrow_mut();
            match next {
                Ok(Some(val)) => {
                    node.items.push_back(val);
                    node.source = Some(source);
                }
                Ok(None) => node.infinite = false,
                Err(e) => {
                    node.source = Some(source);
                    return Err(e);
                }
            }
        }
    }

    /// Value at `index`, or `None` past the end.
    pub fn try_get(&self, index: usize) -> Result<Option<Val>> {
        self.fill(Some(index + 1))?;
        Ok(self.0.borrow().items.get(index).cloned())
    }

    /// Negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<Val> {
        let position = if index >= 0 {
            index as usize
        } else {
            if self.is_infinite() {
                return Err(error!(Underflow; "NEGATIVE INDEX OF INFINITE LIST"));
            }
            let len = self.len()? as isize;
            match usize::try_from(len + index) {
                Ok(position) => position,
                Err(_) => return Err(error!(Underflow; &format!("INDEX {} OUT OF RANGE", index))),
            }
        };
        self.try_get(position)?
            .ok_or_else(|| error!(Underflow; &format!("INDEX {} OUT OF RANGE", index)))
    }

    pub fn set(&self, index: usize, val: Val) -> Result<()> {
        self.fill(Some(index + 1))?;
        match self.0.borrow_mut().items.get_mut(index) {
            Some(slot) => {
                *slot = val;
                Ok(())
            }
            None => Err(error!(Underflow; &format!("INDEX {} OUT OF RANGE", index))),
        }
    }

    pub fn push(&self, val: Val) {
        self.0.borrow_mut().items.push_front(val);
    }

    pub fn pop(&self) -> Result<Option<Val>> {
        self.fill(Some(1))?;
        Ok(self.0.borrow_mut().items.pop_front())
    }

    pub fn len(&self) -> Result<usize> {
        self.fill(None)?;
        Ok(self.0.borrow().items.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.try_get(0)?.is_none())
    }

    /// At most the first `n` values.
    pub fn take(&self, n: usize) -> Result<Vec<Val>> {
        self.fill(Some(n))?;
        Ok(self.0.borrow().items.iter().take(n).cloned().collect())
    }

    pub fn to_vec(&self) -> Result<Vec<Val>> {
        self.fill(None)?;
        Ok(self.0.borrow().items.iter().cloned().collect())
    }

    /// A new node with copies of every cached value and of the generator.
    pub fn deep_copy(&self) -> Result<List> {
        let node = self.0.borrow();
        let source = match &node.source {
            Some(source) => Some(
                source
                    .try_clone()
                    .ok_or_else(|| error!(TypeError; "CANNOT COPY A ONE-SHOT SEQUENCE"))?,
            ),
            None => None,
        };
        let items = node
            .items
            .iter()
            .map(Val::deep_copy)
            .collect::<Result<VecDeque<Val>>>()?;
        Ok(List::from_parts(items, source, node.infinite))
    }

    /// A generator reading this list from the start.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            list: self.clone(),
            index: 0,
        }
    }

    pub fn equals(&self, other: &List) -> Result<bool> {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => Err(error!(ValueError; "CANNOT COMPARE TWO INFINITE LISTS")),
            (true, false) | (false, true) => Ok(false),
            (false, false) => {
                let (lhs, rhs) = (self.to_vec()?, other.to_vec()?);
                if lhs.len() != rhs.len() {
                    return Ok(false);
                }
                for (a, b) in lhs.iter().zip(rhs.iter()) {
                    if !a.equals(b)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "List#{}", self.id())
    }
}

impl std::fmt::Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let infinite = self.is_infinite();
        let filled = if infinite {
            self.fill(Some(PREVIEW))
        } else {
            self.fill(None)
        };
        let node = self.0.borrow();
        write!(f, "[")?;
        let shown = if infinite { PREVIEW } else { node.items.len() };
        for (i, item) in node.items.iter().take(shown).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        if infinite || filled.is_err() {
            if !node.items.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, "]")
    }
}

/// Reads a list front to back. Copies share the list's cache.
#[derive(Clone)]
pub struct Cursor {
    list: List,
    index: usize,
}

impl Generator for Cursor {
    fn next(&mut self) -> Result<Option<Val>> {
        let val = self.list.try_get(self.index)?;
        if val.is_some() {
            self.index += 1;
        }
        Ok(val)
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        Some(Box::new(self.clone()))
    }

    fn is_infinite(&self) -> bool {
        self.list.is_infinite()
    }
}

/// Wraps an iterator that can only be walked once.
pub struct Foreign<I>(pub I);

impl<I: Iterator<Item = Val> + 'static> Generator for Foreign<I> {
    fn next(&mut self) -> Result<Option<Val>> {
        Ok(self.0.next())
    }

    fn try_clone(&self) -> Option<Box<dyn Generator>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use std::cell::Cell;

    struct Naturals {
        next: i64,
        calls: Rc<Cell<usize>>,
    }

    impl Generator for Naturals {
        fn next(&mut self) -> Result<Option<Val>> {
            self.calls.set(self.calls.get() + 1);
            self.next += 1;
            Ok(Some(Val::integer(self.next - 1)))
        }
        fn try_clone(&self) -> Option<Box<dyn Generator>> {
            Some(Box::new(Naturals {
                next: self.next,
                calls: self.calls.clone(),
            }))
        }
        fn is_infinite(&self) -> bool {
            true
        }
    }

    fn naturals() -> (List, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let list = List::from_generator(Box::new(Naturals {
            next: 0,
            calls: calls.clone(),
        }));
        (list, calls)
    }

    #[test]
    fn test_infinite_length_signal() {
        let (list, _) = naturals();
        let err = list.len().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Infinite);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_take_is_memoized() {
        let (list, calls) = naturals();
        let first = list.take(5).unwrap();
        let again = list.take(5).unwrap();
        assert_eq!(calls.get(), 5);
        assert_eq!(first.len(), 5);
        for (a, b) in first.iter().zip(again.iter()) {
            assert!(a.equals(b).unwrap());
        }
        assert_eq!(list.to_string(), "[0, 1, 2, 3, 4, ...]");
    }

    #[test]
    fn test_negative_index() {
        let (list, _) = naturals();
        assert_eq!(list.get(-1).unwrap_err().code(), ErrorCode::Underflow);
        let finite = List::from_vec(vec![Val::integer(1), Val::integer(2)]);
        assert!(finite.get(-1).unwrap().equals(&Val::integer(2)).unwrap());
        assert_eq!(finite.get(-3).unwrap_err().code(), ErrorCode::Underflow);
    }

    #[test]
    fn test_copy_resumes_position() {
        let (list, _) = naturals();
        list.take(3).unwrap();
        let copy = list.deep_copy().unwrap();
        assert!(!copy.same(&list));
        assert!(copy.get(3).unwrap().equals(&Val::integer(3)).unwrap());
        assert_eq!(list.cached(), 3);
    }

    #[test]
    fn test_foreign_cannot_copy() {
        let items = vec![Val::integer(1), Val::integer(2)];
        let list = List::from_generator(Box::new(Foreign(items.into_iter())));
        assert_eq!(list.deep_copy().unwrap_err().code(), ErrorCode::TypeError);
        assert_eq!(list.len().unwrap(), 2);
        assert!(list.deep_copy().is_ok());
    }

    #[test]
    fn test_push_pop_front() {
        let list = List::new();
        list.push(Val::integer(1));
        list.push(Val::integer(2));
        assert_eq!(list.to_string(), "[2, 1]");
        assert!(list.pop().unwrap().unwrap().equals(&Val::integer(2)).unwrap());
    }
}
