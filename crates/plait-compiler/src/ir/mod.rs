//! Grammar expression tree shared by the compiler, linker and VM.

mod ids;
mod node;

pub use ids::{FieldId, KindRef, RefId, RuleId};
pub use node::{CaptureMode, Loc, Node};
