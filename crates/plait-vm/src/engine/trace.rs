//! Tracing infrastructure for debugging grammar execution.
//!
//! The tracer is a zero-cost abstraction: with [`NoopTracer`] every method
//! is an `#[inline(always)]` empty function and the calls disappear.
//! [`PrintTracer`] collects one indented line per event.

use plait_compiler::Rule;
use plait_core::Token;

use super::cursor::Cursor;
use super::error::Expected;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Rule entry, exit and failure, plus backtracking.
    #[default]
    Default,
    /// Also every token matched or missed.
    Verbose,
}

/// Tracer trait for VM execution instrumentation.
///
/// - `trace_enter` / `trace_exit` / `trace_fail`: around each rule
/// - `trace_match` / `trace_miss`: after a token test
/// - `trace_backtrack`: when a failed attempt is discarded
pub trait Tracer {
    fn trace_enter(&mut self, rule: &Rule, at: Cursor);

    fn trace_exit(&mut self, rule: &Rule, end: Cursor);

    fn trace_fail(&mut self, rule: &Rule, at: Cursor);

    fn trace_match(&mut self, token: &Token, at: Cursor);

    fn trace_miss(&mut self, expected: &Expected, found: &Token, at: Cursor);

    fn trace_backtrack(&mut self, to: Cursor);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _rule: &Rule, _at: Cursor) {}

    #[inline(always)]
    fn trace_exit(&mut self, _rule: &Rule, _end: Cursor) {}

    #[inline(always)]
    fn trace_fail(&mut self, _rule: &Rule, _at: Cursor) {}

    #[inline(always)]
    fn trace_match(&mut self, _token: &Token, _at: Cursor) {}

    #[inline(always)]
    fn trace_miss(&mut self, _expected: &Expected, _found: &Token, _at: Cursor) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _to: Cursor) {}
}

/// Tracer that collects an execution trace.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
    depth: usize,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), line));
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, rule: &Rule, at: Cursor) {
        self.push(format!("enter {} @{}", rule.name(), at.index()));
        self.depth += 1;
    }

    fn trace_exit(&mut self, rule: &Rule, end: Cursor) {
        self.depth = self.depth.saturating_sub(1);
        self.push(format!("exit {} @{}", rule.name(), end.index()));
    }

    fn trace_fail(&mut self, rule: &Rule, at: Cursor) {
        self.depth = self.depth.saturating_sub(1);
        self.push(format!("fail {} @{}", rule.name(), at.index()));
    }

    fn trace_match(&mut self, token: &Token, at: Cursor) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        self.push(format!("match {} @{}", token, at.index()));
    }

    fn trace_miss(&mut self, expected: &Expected, found: &Token, at: Cursor) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        self.push(format!("miss {} (found {}) @{}", expected, found, at.index()));
    }

    fn trace_backtrack(&mut self, to: Cursor) {
        self.push(format!("backtrack @{}", to.index()));
    }
}
