use super::{List, StackCommand, Val};
use crate::error;
use crate::lang::{Error, ErrorCode};
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

/// Upper bound for a single multi-value pop.
const MAX_OPERANDS: usize = 1 << 24;

/// ## Execution stack
///
/// The top of the stack is index 0 of the current list. Zooming in
/// makes the list on top the current stack and remembers the
/// enclosing one so zooming out can return to it.

pub struct Stack {
    current: List,
    frames: Vec<Frame>,
    output: Vec<String>,
    printed: bool,
}

struct Frame {
    parent: List,
    wrapped: bool,
}

impl Default for Stack {
    fn default() -> Stack {
        Stack::new()
    }
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            current: List::new(),
            frames: vec![],
            output: vec![],
            printed: false,
        }
    }

    pub fn list(&self) -> &List {
        &self.current
    }

    /// Number of zoom levels below the base.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, val: Val) {
        self.current.push(val)
    }

    /// An empty stack yields integer 0.
    pub fn pop(&mut self) -> Result<Val> {
        Ok(self.current.pop()?.unwrap_or_else(|| Val::integer(0)))
    }

    /// Pop `n` values returned oldest first, so `a b` pops as `[a, b]`.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Val>> {
        if n > MAX_OPERANDS {
            return Err(error!(ValueError; &format!("CANNOT TAKE {} VALUES AT ONCE", n)));
        }
        let mut vals = (0..n).map(|_| self.pop()).collect::<Result<Vec<Val>>>()?;
        vals.reverse();
        Ok(vals)
    }

    pub fn peek(&self) -> Result<Option<Val>> {
        self.current.try_get(0)
    }

    pub fn len(&self) -> Result<usize> {
        self.current.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.current.is_empty()
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        let (inner, wrapped) = match self.pop()? {
            Val::List(list) => (list, false),
            other => (List::from_vec(vec![other]), true),
        };
        self.push(Val::List(inner.clone()));
        let parent = std::mem::replace(&mut self.current, inner);
        self.frames.push(Frame { parent, wrapped });
        debug!(depth = self.depth(), list = self.current.id(), "zoom in");
        Ok(())
    }

    /// At the base this wraps the whole stack into a new base.
    ///
    /// A scalar that `zoom_in` wrapped is put back in place of its list
    /// only if the list still holds exactly one value. After pushes or
    /// pops the list itself stays on the parent.
    pub fn zoom_out(&mut self) -> Result<()> {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => {
                self.current = List::from_vec(vec![Val::List(self.current.clone())]);
                debug!(list = self.current.id(), "zoom out at base");
                return Ok(());
            }
        };
        let consistent = match frame.parent.try_get(0)? {
            Some(Val::List(top)) => top.same(&self.current),
            _ => false,
        };
        if !consistent {
            let id = self.current.id();
            self.frames.push(frame);
            return Err(error!(InternalError; &format!("STACK INCONSISTENCY AT LIST {}", id)));
        }
        if frame.wrapped && self.current.len().ok() == Some(1) {
            if let Some(only) = self.current.try_get(0)? {
                frame.parent.set(0, only)?;
            }
        }
        self.current = frame.parent;
        debug!(depth = self.depth(), list = self.current.id(), "zoom out");
        Ok(())
    }

    /// Replace the current stack with a list holding it.
    pub fn wrap(&mut self) -> Result<()> {
        let wrapped = List::from_vec(vec![Val::List(self.current.clone())]);
        if let Some(frame) = self.frames.last_mut() {
            frame.parent.set(0, Val::List(wrapped.clone()))?;
            frame.wrapped = false;
        }
        self.current = wrapped;
        Ok(())
    }

    /// Pop `count` values and push them back rotated left by `times`.
    pub fn rotate(&mut self, count: usize, times: usize) -> Result<()> {
        if count < 3 {
            return Err(error!(ValueError; &format!("ROTATE COUNT {} IS BELOW 3", count)));
        }
        if times >= count {
            return Err(error!(ValueError; &format!(
                "ROTATE TIMES {} IS NOT BELOW COUNT {}",
                times, count
            )));
        }
        let mut vals = self.pop_n(count)?;
        vals.rotate_left(times);
        for val in vals {
            self.push(val);
        }
        Ok(())
    }

    /// Reverse the order of the top `count` values.
    pub fn flip(&mut self, count: usize) -> Result<()> {
        let vals = self.pop_n(count)?;
        for val in vals.into_iter().rev() {
            self.push(val);
        }
        Ok(())
    }

    pub fn flip_all(&mut self) -> Result<()> {
        let count = self.len().map_err(|e| match e.code() {
            ErrorCode::Infinite => error!(ValueError; "CANNOT FLIP AN INFINITE STACK"),
            _ => e,
        })?;
        self.flip(count)
    }

    pub fn print(&mut self, text: String) {
        self.output.push(text);
        self.printed = true;
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn has_printed(&self) -> bool {
        self.printed
    }

    pub fn commands() -> Vec<StackCommand> {
        vec![
            StackCommand::new("(", Stack::zoom_in),
            StackCommand::new(")", Stack::zoom_out),
            StackCommand::new("]", Stack::wrap),
            StackCommand::new("p", |stack| {
                let val = stack.pop()?;
                stack.print(val.to_string());
                Ok(())
            }),
        ]
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.current)
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stack {{ depth: {}, {} }}", self.depth(), self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(vals: &[i64]) -> Stack {
        let mut stack = Stack::new();
        for v in vals {
            stack.push(Val::integer(*v));
        }
        stack
    }

    #[test]
    fn test_pop_empty_is_zero() {
        let mut stack = Stack::new();
        assert!(stack.pop().unwrap().equals(&Val::integer(0)).unwrap());
        assert_eq!(stack.pop_n(2).unwrap().len(), 2);
    }

    #[test]
    fn test_zoom_in_list() {
        let mut stack = stack_of(&[1]);
        stack.push(Val::List(List::from_vec(vec![Val::integer(7)])));
        stack.zoom_in().unwrap();
        assert_eq!(stack.to_string(), "[7]");
        stack.push(Val::integer(8));
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[[8, 7], 1]");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_zoom_round_trip_scalar() {
        let mut stack = stack_of(&[1, 2]);
        stack.zoom_in().unwrap();
        assert_eq!(stack.to_string(), "[2]");
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[2, 1]");
    }

    #[test]
    fn test_zoomed_scalar_stays_listed_once_grown() {
        let mut stack = stack_of(&[5]);
        stack.zoom_in().unwrap();
        stack.push(Val::integer(1));
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[[1, 5]]");

        let mut stack = stack_of(&[5]);
        stack.zoom_in().unwrap();
        stack.push(Val::integer(1));
        assert_eq!(stack.pop_n(2).unwrap().len(), 2);
        stack.push(Val::integer(6));
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[6]");
    }

    #[test]
    fn test_zoom_out_at_base_wraps() {
        let mut stack = stack_of(&[1, 2]);
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[[2, 1]]");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_inconsistent_trace() {
        let mut stack = stack_of(&[1]);
        stack.zoom_in().unwrap();
        stack.frames[0].parent.set(0, Val::integer(5)).unwrap();
        let err = stack.zoom_out().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_wrap_nested() {
        let mut stack = stack_of(&[1, 2]);
        stack.zoom_in().unwrap();
        stack.push(Val::integer(3));
        stack.wrap().unwrap();
        assert_eq!(stack.to_string(), "[[3, 2]]");
        stack.zoom_out().unwrap();
        assert_eq!(stack.to_string(), "[[[3, 2]], 1]");
    }

    #[test]
    fn test_rotate_and_flip() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        stack.rotate(3, 1).unwrap();
        assert_eq!(stack.to_string(), "[2, 4, 3, 1]");
        stack.flip(2).unwrap();
        assert_eq!(stack.to_string(), "[4, 2, 3, 1]");
        stack.flip_all().unwrap();
        assert_eq!(stack.to_string(), "[1, 3, 2, 4]");
        assert!(stack.rotate(2, 1).is_err());
        assert!(stack.rotate(3, 3).is_err());
    }
}
