//! Process-wide schema cache.
//!
//! Schemas are compiled outside the lock and published afterwards; when two
//! threads race on the same type, the first published schema wins and the
//! other is dropped. Entries live for the rest of the process. Failed
//! compilations are not cached.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::compile_type;
use crate::CompileError;
use crate::schema::{Grammar, Schema};

type SchemaMap = HashMap<TypeId, Arc<Schema>>;

static SCHEMAS: OnceLock<RwLock<SchemaMap>> = OnceLock::new();

/// Compiled schema of `T`, shared across the process.
pub fn schema_of<T: Grammar>() -> Result<Arc<Schema>, CompileError> {
    let cache = SCHEMAS.get_or_init(Default::default);
    let id = TypeId::of::<T>();

    if let Some(schema) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(schema));
    }

    let schema = Arc::new(compile_type::<T>()?);
    let mut schemas = cache.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(schemas.entry(id).or_insert(schema)))
}
