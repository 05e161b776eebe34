//! Runtime for linked plait grammars.
//!
//! The VM walks a [`Program`](plait_compiler::Program) against a lazily
//! buffered token stream, recording captures in an effect log. Once the
//! whole input matched, the materializer replays the log into the output
//! instance.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    Consumption, Cursor, Effect, EffectLog, Expected, FuelLimits, Materializer, NoopTracer,
    Outcome, ParseError, PrintTracer, TokenBuffer, Tracer, VM, VMBuilder, Verbosity,
};
