//! Virtual machine for executing linked grammars.
//!
//! Matching is plain recursion over the grammar tree: every node either
//! matches and returns the cursor after it, or fails and leaves no trace.
//! Failed attempts are undone by truncating the effect log back to a
//! [`Checkpoint`]; the cursor is a value, so nothing else needs restoring.

use std::cmp::Ordering;

use indexmap::IndexSet;
use plait_compiler::ir::{CaptureMode, FieldId, Node, RuleId};
use plait_compiler::{Program, Rule};
use plait_core::{Symbols, Token, TokenKind};

use super::checkpoint::Checkpoint;
use super::cursor::{Cursor, TokenBuffer};
use super::effect::{Effect, EffectLog};
use super::error::{Expected, ParseError};
use super::trace::{NoopTracer, Tracer};

/// Runtime limits for one parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum grammar nodes visited (default: 10,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nesting of rules (default: 64).
    ///
    /// Rules nest on the native stack, several frames per level. The default
    /// fits a 2 MiB thread stack in unoptimized builds; raise it only for
    /// threads with a larger stack.
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 64,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Whether the whole input must be consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Consumption {
    /// Tokens left before `EOF` are an error.
    #[default]
    Full,
    /// Stop after the grammar matched; the rest of the input is ignored.
    Prefix,
}

/// Result of a successful match, ready for materialization.
#[derive(Debug)]
pub struct Outcome {
    /// Cursor after the last consumed token.
    pub end: Cursor,
    pub effects: EffectLog,
    /// Every token pulled during the parse; always includes the one at `end`.
    pub tokens: Vec<Token>,
}

/// Interpreter state for one parse.
pub struct VM<'p, 'a> {
    program: &'p Program,
    buffer: TokenBuffer<'a>,
    effects: EffectLog,

    // Deepest failure and what was expected there.
    furthest: Cursor,
    expected: IndexSet<Expected>,
    /// While > 0, failures are not recorded (inside `!x`).
    quiet: u32,

    exec_fuel: u32,
    depth: u32,
    limits: FuelLimits,
}

/// Builder for VM instances.
pub struct VMBuilder<'p, 'a> {
    program: &'p Program,
    buffer: TokenBuffer<'a>,
    limits: FuelLimits,
}

impl<'p, 'a> VMBuilder<'p, 'a> {
    pub fn new(program: &'p Program, buffer: TokenBuffer<'a>) -> Self {
        Self {
            program,
            buffer,
            limits: FuelLimits::default(),
        }
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    pub fn build(self) -> VM<'p, 'a> {
        VM {
            program: self.program,
            buffer: self.buffer,
            effects: EffectLog::new(),
            furthest: Cursor::START,
            expected: IndexSet::new(),
            quiet: 0,
            exec_fuel: self.limits.get_exec_fuel(),
            depth: 0,
            limits: self.limits,
        }
    }
}

impl<'p, 'a> VM<'p, 'a> {
    pub fn builder(program: &'p Program, buffer: TokenBuffer<'a>) -> VMBuilder<'p, 'a> {
        VMBuilder::new(program, buffer)
    }

    /// Matches the program's root rule against the buffered stream.
    ///
    /// Uses `NoopTracer`, which is optimized away entirely.
    pub fn execute(self, consumption: Consumption) -> Result<Outcome, ParseError> {
        self.execute_with(consumption, &mut NoopTracer)
    }

    /// Matches the root rule, reporting every step to `tracer`.
    pub fn execute_with<T: Tracer>(
        mut self,
        consumption: Consumption,
        tracer: &mut T,
    ) -> Result<Outcome, ParseError> {
        let program = self.program;
        let root = program.rule(program.root());
        let Some(end) = self.run_rule(root, Cursor::START, tracer)? else {
            return Err(self.unexpected());
        };

        let next = self.buffer.get(end)?.clone();
        if consumption == Consumption::Full && !next.is_eof() {
            if self.furthest > end {
                return Err(self.unexpected());
            }
            let mut expected = if self.furthest == end {
                std::mem::take(&mut self.expected)
            } else {
                IndexSet::new()
            };
            expected.insert(Expected::Kind(Symbols::EOF_NAME.to_owned()));
            return Err(ParseError::Trailing {
                pos: next.pos,
                found: next.to_string(),
                expected: expected.into_iter().collect(),
            });
        }

        Ok(Outcome {
            end,
            effects: self.effects,
            tokens: self.buffer.into_tokens(),
        })
    }

    fn run_rule<T: Tracer>(
        &mut self,
        rule: &'p Rule,
        at: Cursor,
        tracer: &mut T,
    ) -> Result<Option<Cursor>, ParseError> {
        if self.depth >= self.limits.recursion_limit {
            return Err(ParseError::RecursionLimitExceeded(self.limits.recursion_limit));
        }
        self.depth += 1;
        tracer.trace_enter(rule, at);

        let result = self.match_node(rule, rule.root(), at, tracer)?;

        self.depth -= 1;
        match result {
            Some(end) => tracer.trace_exit(rule, end),
            None => tracer.trace_fail(rule, at),
        }
        Ok(result)
    }

    /// Parses `target` into a fresh nested instance bound to `field`.
    fn call<T: Tracer>(
        &mut self,
        target: RuleId,
        field: Option<FieldId>,
        at: Cursor,
        tracer: &mut T,
    ) -> Result<Option<Cursor>, ParseError> {
        let program = self.program;
        let checkpoint = Checkpoint::new(at, &self.effects);
        self.effects.push(Effect::Enter { rule: target, at });

        match self.run_rule(program.rule(target), at, tracer)? {
            Some(end) => {
                self.effects.push(Effect::Exit { field, end });
                Ok(Some(end))
            }
            None => {
                checkpoint.restore(&mut self.effects);
                Ok(None)
            }
        }
    }

    /// `Ok(Some(end))` on a match, `Ok(None)` on no match, `Err` when the
    /// parse must stop.
    fn match_node<T: Tracer>(
        &mut self,
        rule: &'p Rule,
        node: &'p Node,
        at: Cursor,
        tracer: &mut T,
    ) -> Result<Option<Cursor>, ParseError> {
        if self.exec_fuel == 0 {
            return Err(ParseError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        self.exec_fuel -= 1;

        match node {
            Node::Literal { text, kind, .. } => {
                let kind = kind.map(|k| rule.kind(k));
                let token = self.buffer.get(at)?;
                if !token.is_eof() && token.text == *text && kind.is_none_or(|k| token.kind == k) {
                    tracer.trace_match(token, at);
                    return Ok(Some(at.next()));
                }
                let expected = Expected::Literal(text.clone());
                tracer.trace_miss(&expected, token, at);
                self.fail(at, expected);
                Ok(None)
            }

            Node::Token { kind, .. } => {
                let kind = rule.kind(*kind);
                let token = self.buffer.get(at)?;
                if kind == TokenKind::EOF {
                    // EOF is tested, never consumed.
                    if token.is_eof() {
                        tracer.trace_match(token, at);
                        return Ok(Some(at));
                    }
                } else if token.kind == kind && !token.is_eof() {
                    tracer.trace_match(token, at);
                    return Ok(Some(at.next()));
                }
                let expected = Expected::Kind(self.program.kind_name(kind).to_owned());
                tracer.trace_miss(&expected, token, at);
                self.fail(at, expected);
                Ok(None)
            }

            Node::Seq(children) => {
                let checkpoint = Checkpoint::new(at, &self.effects);
                let mut cursor = at;
                for child in children {
                    match self.match_node(rule, child, cursor, tracer)? {
                        Some(next) => cursor = next,
                        None => {
                            checkpoint.restore(&mut self.effects);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(cursor))
            }

            Node::Alt(children) => {
                for child in children {
                    let checkpoint = Checkpoint::new(at, &self.effects);
                    if let Some(end) = self.match_node(rule, child, at, tracer)? {
                        return Ok(Some(end));
                    }
                    tracer.trace_backtrack(checkpoint.restore(&mut self.effects));
                }
                Ok(None)
            }

            Node::Optional(child) => {
                let checkpoint = Checkpoint::new(at, &self.effects);
                match self.match_node(rule, child, at, tracer)? {
                    Some(end) => Ok(Some(end)),
                    None => {
                        tracer.trace_backtrack(checkpoint.restore(&mut self.effects));
                        Ok(Some(at))
                    }
                }
            }

            Node::Repeat { child, min } => {
                let start = Checkpoint::new(at, &self.effects);
                let mut cursor = at;
                let mut count = 0u32;
                loop {
                    let checkpoint = Checkpoint::new(cursor, &self.effects);
                    match self.match_node(rule, child, cursor, tracer)? {
                        // An iteration that consumed nothing would repeat forever.
                        // It only keeps its captures when `min` still needs it.
                        Some(next) if next == cursor => {
                            if count >= *min {
                                tracer.trace_backtrack(checkpoint.restore(&mut self.effects));
                            }
                            count += 1;
                            break;
                        }
                        Some(next) => {
                            count += 1;
                            cursor = next;
                        }
                        None => {
                            tracer.trace_backtrack(checkpoint.restore(&mut self.effects));
                            break;
                        }
                    }
                }
                if count < *min {
                    start.restore(&mut self.effects);
                    return Ok(None);
                }
                Ok(Some(cursor))
            }

            Node::Group(child) => self.match_node(rule, child, at, tracer),

            Node::Capture {
                field,
                mode: CaptureMode::Value,
                child,
                ..
            } => {
                let Some(end) = self.match_node(rule, child, at, tracer)? else {
                    return Ok(None);
                };
                self.effects.push(Effect::Set {
                    field: *field,
                    start: at,
                    end,
                });
                Ok(Some(end))
            }

            Node::Capture {
                field,
                mode: CaptureMode::Node,
                child,
                ..
            } => {
                let Node::Ref { target, .. } = child.as_ref() else {
                    panic!("`@@` capture in `{}` does not wrap a reference", rule.name());
                };
                self.call(rule.target(*target), Some(*field), at, tracer)
            }

            Node::Ref { target, .. } => self.call(rule.target(*target), None, at, tracer),

            Node::Not { child, .. } => {
                if self.buffer.get(at)?.is_eof() {
                    return Ok(None);
                }
                let checkpoint = Checkpoint::new(at, &self.effects);
                self.quiet += 1;
                let inner = self.match_node(rule, child, at, tracer);
                self.quiet -= 1;
                checkpoint.restore(&mut self.effects);
                if inner?.is_some() {
                    return Ok(None);
                }
                tracer.trace_match(self.buffer.get(at)?, at);
                Ok(Some(at.next()))
            }
        }
    }

    /// Records a failed token test for error reporting.
    fn fail(&mut self, at: Cursor, expected: Expected) {
        if self.quiet > 0 {
            return;
        }
        match at.cmp(&self.furthest) {
            Ordering::Greater => {
                self.furthest = at;
                self.expected.clear();
                self.expected.insert(expected);
            }
            Ordering::Equal => {
                self.expected.insert(expected);
            }
            Ordering::Less => {}
        }
    }

    fn unexpected(&mut self) -> ParseError {
        let expected = std::mem::take(&mut self.expected).into_iter().collect();
        match self.buffer.get(self.furthest) {
            Ok(token) => ParseError::Unexpected {
                pos: token.pos,
                found: token.to_string(),
                expected,
            },
            Err(err) => err.into(),
        }
    }
}
