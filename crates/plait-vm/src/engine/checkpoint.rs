//! Backtracking checkpoints.

use super::cursor::Cursor;
use super::effect::EffectLog;

/// State restored when an attempt fails: where the attempt started and how
/// long the effect log was.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    pub cursor: Cursor,
    pub effect_watermark: usize,
}

impl Checkpoint {
    pub fn new(cursor: Cursor, effects: &EffectLog) -> Self {
        Self {
            cursor,
            effect_watermark: effects.len(),
        }
    }

    /// Drops every effect recorded since the checkpoint.
    #[inline]
    pub fn restore(self, effects: &mut EffectLog) -> Cursor {
        effects.truncate(self.effect_watermark);
        self.cursor
    }
}
