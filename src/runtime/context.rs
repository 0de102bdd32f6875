//! Per-parse mutable state: the value stack, its write pointer, the active frame base and the
//! optional recursion-depth guard.
//!
//! A fresh [`ParseContext`] is built for every top-level parse; nothing here survives between
//! runs. Slots above the stack pointer are garbage left behind by rolled-back attempts and are
//! overwritten by later pushes instead of being deallocated.

use crate::errors::{ErrorReporting, GrammarError};

/// Saved pointer pair restored when a nonterminal scope is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub stack_pointer: usize,
    pub base: usize,
}

#[derive(Debug)]
pub struct ParseContext<V> {
    values: Vec<V>,
    stack_pointer: usize,
    base: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl<V: Clone> ParseContext<V> {
    pub fn new(capacity: usize, max_depth: Option<usize>) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            stack_pointer: 0,
            base: 0,
            depth: 0,
            max_depth,
        }
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Live values, bottom of the stack first.
    pub fn live(&self) -> &[V] {
        &self.values[..self.stack_pointer]
    }

    /// Writes `value` at the stack pointer, reusing a garbage slot when one exists.
    pub fn push(&mut self, value: V) {
        if self.stack_pointer < self.values.len() {
            self.values[self.stack_pointer] = value;
        } else {
            self.values.push(value);
        }
        self.stack_pointer += 1;
    }

    /// Rewinds the stack pointer to a mark taken earlier in the same frame.
    pub fn rollback(&mut self, mark: usize) {
        debug_assert!(
            mark <= self.stack_pointer,
            "rollback mark {mark} is above the stack pointer {}",
            self.stack_pointer
        );
        self.stack_pointer = mark;
    }

    /// Starts a nonterminal frame at the current stack pointer and returns what to restore.
    pub fn open_frame(&mut self) -> Frame {
        let saved = Frame {
            stack_pointer: self.stack_pointer,
            base: self.base,
        };
        self.base = self.stack_pointer;
        saved
    }

    pub fn close_frame(&mut self, saved: Frame) {
        self.stack_pointer = saved.stack_pointer;
        self.base = saved.base;
    }

    /// Enters one level of rule execution, enforcing the configured depth limit.
    pub fn descend(&mut self) -> Result<(), GrammarError> {
        self.depth += 1;
        match self.max_depth {
            Some(limit) if self.depth > limit => Err(self.recursion_limit(limit)),
            _ => Ok(()),
        }
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn getter(&self) -> Getter<'_, V> {
        Getter {
            stack: self.live(),
            base: self.base,
        }
    }
}

impl<V> ErrorReporting for ParseContext<V> {
    fn phase(&self) -> &'static str {
        "execute"
    }
}

// ============================================================================
// GETTER
// ============================================================================

/// Read-only view of the value stack, numbered relative to the active nonterminal.
///
/// `get(1)` is the first value matched inside the current frame, `get(n)` the n-th. `get(0)` is
/// the slot just below the frame: the value produced immediately before the nonterminal was
/// entered. Anything else is a contract violation.
#[derive(Debug, Clone, Copy)]
pub struct Getter<'a, V> {
    stack: &'a [V],
    base: usize,
}

impl<'a, V> Getter<'a, V> {
    /// Number of values matched so far in the current frame.
    pub fn len(&self) -> usize {
        self.stack.len() - self.base
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values of the current frame; `frame()[0]` is `get(1)`.
    pub fn frame(&self) -> &'a [V] {
        let stack = self.stack;
        &stack[self.base..]
    }

    fn slot(&self, index: usize) -> Option<usize> {
        let slot = (self.base + index).checked_sub(1)?;
        (slot < self.stack.len()).then_some(slot)
    }

    /// Checked access for actions that prefer to fail softly.
    pub fn try_get(&self, index: usize) -> Result<&'a V, GrammarError> {
        let stack = self.stack;
        match self.slot(index) {
            Some(slot) => Ok(&stack[slot]),
            None => Err(GetterPhase.action_contract(index, self.len())),
        }
    }

    /// # Panics
    /// If `index` lies outside `0..=len()`, or is `0` at the very bottom of the stack. Reading
    /// past the frame would silently hand back stale or foreign values.
    pub fn get(&self, index: usize) -> &'a V {
        match self.try_get(index) {
            Ok(value) => value,
            Err(err) => panic!("action contract violated: {err}"),
        }
    }
}

struct GetterPhase;

impl ErrorReporting for GetterPhase {
    fn phase(&self) -> &'static str {
        "execute"
    }
}
