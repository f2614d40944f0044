use crate::config::ParseOptions;
use crate::value::Value;

use super::combinators::RuleId;
use super::error::{GrammarError, ParseError};
use super::memo::Memo;

/// Cursor and bookkeeping for one top-level parse invocation.
///
/// The cursor is a byte offset into `text`. It only ever moves by whole
/// `char`s, so it always sits on a char boundary and never passes the end of
/// the input.
pub struct ParseState<'a> {
    text: &'a str,
    index: usize,
    furthest: usize,
    depth: usize,
    recursion_limit: Option<usize>,
    memo: Memo,
}

impl<'a> ParseState<'a> {
    pub fn new(text: &'a str, start: usize, options: &ParseOptions) -> Result<Self, ParseError> {
        if start > text.len() || !text.is_char_boundary(start) {
            return Err(ParseError::InvalidCursor {
                cursor: start,
                len: text.len(),
            });
        }

        Ok(Self {
            text,
            index: start,
            furthest: start,
            depth: 0,
            recursion_limit: options.recursion_limit,
            memo: Memo::new(options.memoize),
        })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn remaining(&self) -> &'a str {
        &self.text[self.index..]
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consume and return the next char.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        self.furthest = self.furthest.max(self.index);
        Some(c)
    }

    /// Consume `prefix` if the remaining input starts with it.
    pub fn eat(&mut self, prefix: &str) -> bool {
        if !self.remaining().starts_with(prefix) {
            return false;
        }
        self.index += prefix.len();
        self.furthest = self.furthest.max(self.index);
        true
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Move the cursor back to a position taken from [`ParseState::position`].
    pub fn restore(&mut self, position: usize) {
        debug_assert!(
            position <= self.text.len() && self.text.is_char_boundary(position),
            "restore to {position} is not a char boundary of input of length {}",
            self.text.len()
        );
        self.index = position;
    }

    /// Note that matching could not proceed at `position`.
    pub fn record_failure(&mut self, position: usize) {
        self.furthest = self.furthest.max(position.min(self.text.len()));
    }

    /// Furthest offset reached or failed at so far.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self, rule: &str) -> Result<(), GrammarError> {
        if let Some(limit) = self.recursion_limit {
            if self.depth >= limit {
                return Err(GrammarError::RecursionLimit {
                    rule: rule.to_string(),
                    limit,
                    position: self.index,
                });
            }
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Take back a parked result for `rule` at the current position, moving
    /// the cursor to where that result ended.
    pub(crate) fn recall(&mut self, rule: RuleId) -> Option<Value> {
        let (value, end) = self.memo.take(rule, self.index)?;
        log::trace!("memo hit for {rule} at {}..{end}", self.index);
        self.index = end;
        Some(value)
    }

    pub(crate) fn remember(&mut self, rule: RuleId, anchor: usize, value: Value, end: usize) {
        log::trace!("memo store for {rule} at {anchor}..{end}");
        self.memo.store(rule, anchor, value, end);
    }

    /// Number of parked results not yet taken back.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn memo_hits(&self) -> usize {
        self.memo.hits()
    }

    pub fn memo_stores(&self) -> usize {
        self.memo.stores()
    }
}
