//! Options controlling a single parse invocation.

/// Knobs for one top-level parse.
///
/// ```ignore
/// let options = ParseOptions::default()
///     .memoize(false)
///     .recursion_limit(256);
/// let value = grammar.parse_with(text, &mut cursor, &options)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reuse the result of a sequence's left operand when the sequence fails
    /// on its right operand and the same operand is retried at the same
    /// position.
    pub memoize: bool,
    /// Maximum nesting of grammar rules. `None` leaves recursion bounded only
    /// by the stack.
    pub recursion_limit: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            recursion_limit: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memoize(mut self, enabled: bool) -> Self {
        self.memoize = enabled;
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }
}
