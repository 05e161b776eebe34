//! Per-type compilation: describe, parse, validate.
//!
//! Compilation never follows `@@` references; nested types are compiled on
//! demand by the linker through [`schema_of`].

mod cache;

#[cfg(test)]
mod compile_tests;

pub use cache::schema_of;

use plait_core::utils::short_type_name;

use crate::CompileError;
use crate::analyze::check_captures;
use crate::diagnostics::Diagnostics;
use crate::parser;
use crate::schema::{Describe, Grammar, Schema, new_instance};

/// Compiles the grammar of `T`, bypassing the cache.
pub fn compile_type<T: Grammar>() -> Result<Schema, CompileError> {
    let mut describe = Describe::<T>::new();
    T::describe(&mut describe);
    let (name, fields, positions) = describe.finish();
    let name = name.unwrap_or_else(|| short_type_name(std::any::type_name::<T>()));

    let mut diagnostics = Diagnostics::new();
    let parsed = parser::parse(&name, &fields, &mut diagnostics);
    if let Some(parsed) = &parsed {
        check_captures(&name, &fields, &parsed.root, &mut diagnostics);
    }

    match parsed {
        Some(parsed) if !diagnostics.has_errors() => Ok(Schema {
            type_id: std::any::TypeId::of::<T>(),
            name,
            fields,
            root: parsed.root,
            kinds: parsed.kinds,
            refs: parsed.refs,
            positions,
            new_instance: new_instance::<T>,
        }),
        _ => Err(CompileError::InvalidGrammar {
            type_name: name,
            diagnostics,
        }),
    }
}
