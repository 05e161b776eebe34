//! Replays an effect log into output instances.
//!
//! Nested instances live on a stack while their effects replay; `Exit`
//! pops one and hands it to its parent's binding. The log is produced by
//! the VM from a linked program, so an unbalanced log or a capture into an
//! unbound field is a bug and panics.

use std::any::Any;

use plait_compiler::ir::{FieldId, RuleId};
use plait_compiler::{Captured, Program};
use plait_core::Token;

use super::cursor::Cursor;
use super::effect::Effect;
use super::error::ParseError;

struct Frame {
    rule: RuleId,
    start: Cursor,
    instance: Box<dyn Any>,
}

/// Builds output values from the effects of one successful match.
pub struct Materializer<'p> {
    program: &'p Program,
    tokens: &'p [Token],
}

impl<'p> Materializer<'p> {
    /// `tokens` must be the buffer the effects' cursors point into.
    pub fn new(program: &'p Program, tokens: &'p [Token]) -> Self {
        Self { program, tokens }
    }

    /// Stores every capture into `root`, an instance of the program's root
    /// type, then fills its span slots for `0..end`.
    ///
    /// Captures are applied in match order; on error, fields written before
    /// the failing capture keep their new values.
    pub fn materialize(
        &self,
        effects: &[Effect],
        root: &mut dyn Any,
        end: Cursor,
    ) -> Result<(), ParseError> {
        let mut stack: Vec<Frame> = Vec::new();

        for (i, effect) in effects.iter().enumerate() {
            match *effect {
                Effect::Enter { rule, at } => {
                    let instance = self.program.rule(rule).schema().new_instance();
                    stack.push(Frame {
                        rule,
                        start: at,
                        instance,
                    });
                }

                Effect::Set { field, start, end } => {
                    let texts = self.slice(start, end).iter().map(|t| t.text.clone()).collect();
                    let captured = Captured::Text(texts);
                    match stack.last_mut() {
                        Some(frame) => {
                            self.bind(frame.rule, field, frame.instance.as_mut(), captured, start)?
                        }
                        None => self.bind(self.program.root(), field, root, captured, start)?,
                    }
                }

                Effect::Exit { field, end } => {
                    let Some(mut frame) = stack.pop() else {
                        panic!("effect {i}: Exit without a matching Enter");
                    };
                    self.apply_positions(frame.rule, frame.instance.as_mut(), frame.start, end);
                    let Some(field) = field else {
                        continue;
                    };
                    let start = frame.start;
                    let captured = Captured::Node(frame.instance);
                    match stack.last_mut() {
                        Some(parent) => {
                            self.bind(parent.rule, field, parent.instance.as_mut(), captured, start)?
                        }
                        None => self.bind(self.program.root(), field, root, captured, start)?,
                    }
                }
            }
        }

        if !stack.is_empty() {
            panic!("effect log ends with {} unfinished instances", stack.len());
        }

        self.apply_positions(self.program.root(), root, Cursor::START, end);
        Ok(())
    }

    fn bind(
        &self,
        rule: RuleId,
        field: FieldId,
        target: &mut dyn Any,
        captured: Captured,
        start: Cursor,
    ) -> Result<(), ParseError> {
        let schema = self.program.rule(rule).schema();
        let descriptor = schema.field(field);
        let Some(binding) = descriptor.binding() else {
            panic!(
                "capture into `{}.{}`, which has no binding",
                schema.name(),
                descriptor.name()
            );
        };
        binding
            .apply(target, captured)
            .map_err(|source| ParseError::Capture {
                pos: self.token(start).pos,
                target: format!("{}.{}", schema.name(), descriptor.name()),
                source,
            })
    }

    fn apply_positions(&self, rule: RuleId, target: &mut dyn Any, start: Cursor, end: Cursor) {
        let slots = self.program.rule(rule).schema().positions();
        if slots.is_empty() {
            return;
        }
        slots.apply(
            target,
            self.token(start).pos,
            self.token(end).pos,
            self.slice(start, end),
        );
    }

    fn token(&self, cursor: Cursor) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[cursor.index().min(last)]
    }

    fn slice(&self, start: Cursor, end: Cursor) -> &[Token] {
        let len = self.tokens.len();
        let end = end.index().min(len);
        &self.tokens[start.index().min(end)..end]
    }
}
