//! Token sources: the only input the engine reads.
//!
//! A source hands out tokens one at a time and can be rewound to any position it reported
//! earlier. Backtracking calls `tell`/`seek` once per failed alternative, so both should be O(1).

use serde::{Deserialize, Serialize};

/// A terminal name paired with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token<V> {
    pub name: String,
    pub value: V,
}

impl<V> Token<V> {
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Opaque consumption index. Only meaningful to the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(usize);

impl Position {
    pub const fn new(index: usize) -> Self {
        Position(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

pub trait TokenSource<V> {
    /// Returns the next token and advances, or `None` once the source is exhausted.
    fn next_token(&mut self) -> Option<Token<V>>;

    fn tell(&self) -> Position;

    /// Moves to a position obtained from `tell`; later `next_token` calls replay from there.
    fn seek(&mut self, position: Position);

    /// True iff no further tokens remain, taking any prior `seek` into account.
    fn done(&self) -> bool;
}

/// A fixed, in-memory token list.
#[derive(Debug, Clone, PartialEq)]
pub struct VecSource<V> {
    tokens: Vec<Token<V>>,
    cursor: usize,
}

impl<V> VecSource<V> {
    pub fn new(tokens: Vec<Token<V>>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[Token<V>] {
        &self.tokens[self.cursor..]
    }
}

impl<V: Clone> TokenSource<V> for VecSource<V> {
    fn next_token(&mut self) -> Option<Token<V>> {
        let token = self.tokens.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(token)
    }

    fn tell(&self) -> Position {
        Position::new(self.cursor)
    }

    fn seek(&mut self, position: Position) {
        debug_assert!(
            position.index() <= self.tokens.len(),
            "seek to {} past the end of a {}-token source",
            position.index(),
            self.tokens.len()
        );
        self.cursor = position.index().min(self.tokens.len());
    }

    fn done(&self) -> bool {
        self.cursor >= self.tokens.len()
    }
}

impl<V> From<Vec<Token<V>>> for VecSource<V> {
    fn from(tokens: Vec<Token<V>>) -> Self {
        Self::new(tokens)
    }
}

impl<V> FromIterator<Token<V>> for VecSource<V> {
    fn from_iter<I: IntoIterator<Item = Token<V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> VecSource<i32> {
        vec![Token::new("num", 1), Token::new("+", 0), Token::new("num", 2)].into()
    }

    #[test]
    fn seek_replays_tokens() {
        let mut src = source();
        let start = src.tell();
        assert_eq!(src.next_token().map(|t| t.value), Some(1));
        assert_eq!(src.next_token().map(|t| t.name), Some("+".to_string()));
        src.seek(start);
        assert_eq!(src.next_token(), Some(Token::new("num", 1)));
        assert_eq!(src.remaining().len(), 2);
    }

    #[test]
    fn done_tracks_seek() {
        let mut src = source();
        while src.next_token().is_some() {}
        assert!(src.done());
        src.seek(Position::new(2));
        assert!(!src.done());
        assert_eq!(src.next_token().map(|t| t.value), Some(2));
        assert!(src.done());
        assert_eq!(src.next_token(), None);
    }

    #[test]
    fn tokens_serialize_as_plain_records() {
        let json = serde_json::to_string(&Token::new("num", 3)).unwrap();
        assert_eq!(json, r#"{"name":"num","value":3}"#);
        let empty: VecSource<i32> = std::iter::empty().collect();
        assert!(empty.remaining().is_empty() && empty.done());
    }
}
