//! Single-use result cache for one parse invocation.
//!
//! When a sequence `a + b` fails because `b` did not match, the value `a`
//! produced is parked here under `(a's rule id, anchor)` together with the
//! cursor position `a` stopped at. If an alternative then retries `a` (the
//! same parser, or a clone sharing its id) at the same anchor, the parked
//! result is taken back instead of re-running `a`.
//!
//! Entries are consumed on read. The table belongs to a
//! [`ParseState`](super::ParseState) and dies with it, so nothing leaks across
//! invocations or inputs.

use std::collections::HashMap;

use crate::value::Value;

use super::combinators::RuleId;

struct Entry {
    value: Value,
    end: usize,
}

pub(crate) struct Memo {
    enabled: bool,
    entries: HashMap<(RuleId, usize), Entry>,
    hits: usize,
    stores: usize,
}

impl Memo {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
            hits: 0,
            stores: 0,
        }
    }

    /// Remove and return the entry for `rule` at `position`.
    pub(crate) fn take(&mut self, rule: RuleId, position: usize) -> Option<(Value, usize)> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(&(rule, position))?;
        self.hits += 1;
        Some((entry.value, entry.end))
    }

    pub(crate) fn store(&mut self, rule: RuleId, position: usize, value: Value, end: usize) {
        if !self.enabled {
            return;
        }
        self.stores += 1;
        self.entries.insert((rule, position), Entry { value, end });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits
    }

    pub(crate) fn stores(&self) -> usize {
        self.stores
    }
}
