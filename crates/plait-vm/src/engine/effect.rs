//! Deferred output mutations.
//!
//! The VM never touches output instances while matching. Captures are
//! recorded here and replayed by the materializer after the parse succeeded,
//! so backtracking only has to truncate the log.

use plait_compiler::ir::{FieldId, RuleId};

use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Begin a nested instance of `rule` whose match starts at `at`.
    Enter { rule: RuleId, at: Cursor },
    /// Finish the innermost nested instance at `end` and store it into
    /// `field` of its parent (or drop it for a bare reference).
    Exit { field: Option<FieldId>, end: Cursor },
    /// Store the texts of tokens `start..end` into `field` of the innermost
    /// instance.
    Set {
        field: FieldId,
        start: Cursor,
        end: Cursor,
    },
}

/// Effect log with truncation support for backtracking.
#[derive(Debug, Default)]
pub struct EffectLog(Vec<Effect>);

impl EffectLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    /// Current length (used as watermark for backtracking).
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Truncate to watermark (for backtracking).
    #[inline]
    pub fn truncate(&mut self, watermark: usize) {
        self.0.truncate(watermark);
    }

    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }
}
