//! Execution engine.
//!
//! The VM matches grammar nodes recursively, producing an effect log that is
//! materialized into output instances after a successful match.

mod checkpoint;
mod cursor;
mod effect;
mod error;
mod materializer;
mod trace;
mod vm;

#[cfg(test)]
mod test_utils;

pub use cursor::{Cursor, TokenBuffer};
pub use effect::{Effect, EffectLog};
pub use error::{Expected, ParseError};
pub use materializer::Materializer;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use vm::{Consumption, FuelLimits, Outcome, VM, VMBuilder};
