//! # Rule Representation
//!
//! A grammar is a tree of [`Rule`] nodes. Recursive grammars never own themselves: a rule that
//! mentions another nonterminal (or itself) does so by name through [`Rule::Ref`], and the name is
//! resolved against the rule table by the compiler (`runtime::compile`).
//!
//! ## Invariants
//! - `Sequence` and `Alternative` lists built through [`builder`] are flat: a sequence never
//!   directly contains another sequence, an alternative never directly contains another alternative.
//! - `Scope` only ever appears in compiled trees. Its body is shared (`Rc`) between the rule table
//!   and every place the nonterminal was inlined.
//! - An empty `Alternative` always fails; an empty `Sequence` always succeeds with `V::default()`.

use std::fmt;
use std::rc::Rc;

use crate::runtime::context::Getter;

pub mod builder;

/// Host callback run by an [`Rule::Action`]. `None` means the action rejected the parse.
pub type ActionFn<V> = dyn Fn(&Getter<'_, V>) -> Option<V>;

/// A host-supplied semantic action, optionally labelled for display.
pub struct Action<V> {
    label: Option<Rc<str>>,
    func: Rc<ActionFn<V>>,
}

impl<V> Action<V> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Getter<'_, V>) -> Option<V> + 'static,
    {
        Self {
            label: None,
            func: Rc::new(func),
        }
    }

    pub fn labelled<F>(label: &str, func: F) -> Self
    where
        F: Fn(&Getter<'_, V>) -> Option<V> + 'static,
    {
        Self {
            label: Some(Rc::from(label)),
            func: Rc::new(func),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn invoke(&self, getter: &Getter<'_, V>) -> Option<V> {
        (self.func)(getter)
    }
}

impl<V> Clone for Action<V> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            func: Rc::clone(&self.func),
        }
    }
}

impl<V> fmt::Debug for Action<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Action({label})"),
            None => f.write_str("Action"),
        }
    }
}

/// One grammatical construct.
pub enum Rule<V> {
    /// Unresolved reference to a terminal or nonterminal by name.
    Ref(String),
    /// Matches exactly one token with this terminal name.
    Terminal(String),
    /// A nonterminal body with its own value-stack frame.
    Scope(Rc<Rule<V>>),
    Sequence(Vec<Rule<V>>),
    /// Ordered choice with full rollback between attempts.
    Alternative(Vec<Rule<V>>),
    Action(Action<V>),
    /// Succeeds only if the body succeeds and the token source is exhausted afterwards.
    Terminated(Box<Rule<V>>),
}

impl<V> Rule<V> {
    /// An always-failing rule, substituted for undefined symbols.
    pub fn fail() -> Self {
        Rule::Alternative(Vec::new())
    }

    /// Kinds that already contribute exactly one value to the enclosing frame and therefore need
    /// no `Scope` when they form a whole nonterminal body.
    pub fn is_self_scoping(&self) -> bool {
        matches!(self, Rule::Terminal(_) | Rule::Action(_) | Rule::Scope(_))
    }

    /// True if no `Ref` remains anywhere below this node (scope bodies included).
    pub fn is_resolved(&self) -> bool {
        match self {
            Rule::Ref(_) => false,
            Rule::Terminal(_) | Rule::Action(_) => true,
            Rule::Scope(body) => body.is_resolved(),
            Rule::Terminated(body) => body.is_resolved(),
            Rule::Sequence(parts) | Rule::Alternative(parts) => parts.iter().all(Rule::is_resolved),
        }
    }
}

impl<V> Clone for Rule<V> {
    fn clone(&self) -> Self {
        match self {
            Rule::Ref(name) => Rule::Ref(name.clone()),
            Rule::Terminal(name) => Rule::Terminal(name.clone()),
            Rule::Scope(body) => Rule::Scope(Rc::clone(body)),
            Rule::Sequence(parts) => Rule::Sequence(parts.clone()),
            Rule::Alternative(parts) => Rule::Alternative(parts.clone()),
            Rule::Action(action) => Rule::Action(action.clone()),
            Rule::Terminated(body) => Rule::Terminated(body.clone()),
        }
    }
}

impl<V> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Ref(name) => f.debug_tuple("Ref").field(name).finish(),
            Rule::Terminal(name) => f.debug_tuple("Terminal").field(name).finish(),
            Rule::Scope(body) => f.debug_tuple("Scope").field(body).finish(),
            Rule::Sequence(parts) => f.debug_tuple("Sequence").field(parts).finish(),
            Rule::Alternative(parts) => f.debug_tuple("Alternative").field(parts).finish(),
            Rule::Action(action) => fmt::Debug::fmt(action, f),
            Rule::Terminated(body) => f.debug_tuple("Terminated").field(body).finish(),
        }
    }
}

/// BNF-like notation: `'t'` terminals, bare names for references, `[..]` scopes,
/// `( a | b )` alternatives, `{label}` actions and a trailing `$` for end of input.
impl<V> fmt::Display for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Ref(name) => f.write_str(name),
            Rule::Terminal(name) => write!(f, "'{name}'"),
            Rule::Scope(body) => write!(f, "[{body}]"),
            Rule::Sequence(parts) if parts.is_empty() => f.write_str("()"),
            Rule::Sequence(parts) => write_joined(f, parts, " "),
            Rule::Alternative(parts) if parts.is_empty() => f.write_str("<fail>"),
            Rule::Alternative(parts) => {
                f.write_str("( ")?;
                write_joined(f, parts, " | ")?;
                f.write_str(" )")
            }
            Rule::Action(action) => write!(f, "{{{}}}", action.label().unwrap_or("action")),
            Rule::Terminated(body) => write!(f, "{body} $"),
        }
    }
}

fn write_joined<V>(f: &mut fmt::Formatter<'_>, parts: &[Rule<V>], sep: &str) -> fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{part}")?;
    }
    Ok(())
}

impl<V> From<&str> for Rule<V> {
    fn from(name: &str) -> Self {
        Rule::Ref(name.to_string())
    }
}

impl<V> From<String> for Rule<V> {
    fn from(name: String) -> Self {
        Rule::Ref(name)
    }
}

impl<V> From<Action<V>> for Rule<V> {
    fn from(action: Action<V>) -> Self {
        Rule::Action(action)
    }
}
