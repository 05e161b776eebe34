//! Output types and how they describe their grammar.
//!
//! A type opts in by implementing [`Grammar`]; its `describe` registers each
//! field with an annotation and a typed slot accessor on [`Describe`]. The
//! compiler turns the collected [`FieldDescriptor`]s into a [`Schema`].

mod bind;


use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use plait_core::utils::short_type_name;
use plait_core::{Position, Token};
use rowan::TextRange;

pub use bind::{BindError, Binding, Capture, Captured, NodeSlot, Scalar, Strategy, ValueSlot};

use crate::CompileError;
use crate::diagnostics::Site;
use crate::ir::{FieldId, KindRef, Loc, Node, RefId};

/// A type that can be parsed from tokens.
///
/// ```
/// use plait_compiler::{Describe, Grammar};
///
/// #[derive(Default)]
/// struct Assignment {
///     name: String,
///     value: i64,
/// }
///
/// impl Grammar for Assignment {
///     fn describe(g: &mut Describe<Self>) {
///         g.value("name", "@Ident '='", |n| &mut n.name);
///         g.value("value", "@Int ';'", |n| &mut n.value);
///     }
/// }
/// ```
pub trait Grammar: Default + 'static {
    fn describe(g: &mut Describe<Self>);
}

/// Registration sink handed to [`Grammar::describe`].
///
/// Fields are recorded in call order; that order is the order of the
/// grammar, since all annotations are read as one expression.
pub struct Describe<T> {
    name: Option<String>,
    fields: Vec<FieldDescriptor>,
    positions: PositionSlots,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Grammar> Describe<T> {
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            fields: Vec::new(),
            positions: PositionSlots::default(),
            _marker: PhantomData,
        }
    }

    /// Overrides the rule name used in diagnostics, traces and EBNF.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Field captured with `@` into a scalar, `Option` or `Vec` of scalars.
    pub fn value<V, F>(&mut self, field: &str, annotation: &str, slot: F) -> &mut Self
    where
        V: ValueSlot,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(field, annotation, Some(Binding::value::<T, V, F>(slot)))
    }

    /// Field captured with `@` into a type implementing [`Capture`].
    pub fn custom<V, F>(&mut self, field: &str, annotation: &str, slot: F) -> &mut Self
    where
        V: Capture,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(field, annotation, Some(Binding::custom::<T, V, F>(slot)))
    }

    /// Field captured with `@@` into `Box<N>`, `Option<Box<N>>` or `Vec<N>`.
    pub fn node<N, S, F>(&mut self, field: &str, annotation: &str, slot: F) -> &mut Self
    where
        N: Grammar,
        S: NodeSlot<N>,
        F: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        self.push(field, annotation, Some(Binding::node::<T, N, S, F>(slot)))
    }

    /// Field captured with `@@` into a plain `N`.
    pub fn embed<N, F>(&mut self, field: &str, annotation: &str, slot: F) -> &mut Self
    where
        N: Grammar,
        F: Fn(&mut T) -> &mut N + Send + Sync + 'static,
    {
        self.push(field, annotation, Some(Binding::embed::<T, N, F>(slot)))
    }

    /// Grammar fragment with no capture target.
    pub fn rule(&mut self, field: &str, annotation: &str) -> &mut Self {
        self.push(field, annotation, None)
    }

    /// Receives the position of the first token of the match.
    pub fn pos<F>(&mut self, slot: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut Position + Send + Sync + 'static,
    {
        self.positions.pos = Some(Arc::new(move |target: &mut dyn Any, pos: Position| {
            if let Some(node) = target.downcast_mut::<T>() {
                *slot(node) = pos;
            }
        }));
        self
    }

    /// Receives the position of the token following the match.
    pub fn end_pos<F>(&mut self, slot: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut Position + Send + Sync + 'static,
    {
        self.positions.end_pos = Some(Arc::new(move |target: &mut dyn Any, pos: Position| {
            if let Some(node) = target.downcast_mut::<T>() {
                *slot(node) = pos;
            }
        }));
        self
    }

    /// Receives the tokens consumed by the match.
    pub fn tokens<F>(&mut self, slot: F) -> &mut Self
    where
        F: Fn(&mut T) -> &mut Vec<Token> + Send + Sync + 'static,
    {
        self.positions.tokens = Some(Arc::new(move |target: &mut dyn Any, tokens: &[Token]| {
            if let Some(node) = target.downcast_mut::<T>() {
                *slot(node) = tokens.to_vec();
            }
        }));
        self
    }

    fn push(&mut self, field: &str, annotation: &str, binding: Option<Binding>) -> &mut Self {
        self.fields.push(FieldDescriptor::new(field, annotation, binding));
        self
    }

    pub(crate) fn finish(self) -> (Option<String>, Vec<FieldDescriptor>, PositionSlots) {
        (self.name, self.fields, self.positions)
    }
}

/// One registered field: name, annotation and optional capture binding.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    annotation: String,
    binding: Option<Binding>,
}

impl FieldDescriptor {
    pub(crate) fn new(name: &str, annotation: &str, binding: Option<Binding>) -> Self {
        Self {
            name: name.to_owned(),
            annotation: annotation.to_owned(),
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub(crate) fn site(&self, range: TextRange) -> Site {
        Site::new(&self.name, &self.annotation, range)
    }
}

type PositionFn = dyn Fn(&mut dyn Any, Position) + Send + Sync;
type TokensFn = dyn Fn(&mut dyn Any, &[Token]) + Send + Sync;

/// Optional span slots filled after an instance is complete.
#[derive(Clone, Default)]
pub struct PositionSlots {
    pos: Option<Arc<PositionFn>>,
    end_pos: Option<Arc<PositionFn>>,
    tokens: Option<Arc<TokensFn>>,
}

impl PositionSlots {
    pub fn is_empty(&self) -> bool {
        self.pos.is_none() && self.end_pos.is_none() && self.tokens.is_none()
    }

    pub fn apply(&self, target: &mut dyn Any, start: Position, end: Position, tokens: &[Token]) {
        if let Some(pos) = &self.pos {
            pos(target, start);
        }
        if let Some(end_pos) = &self.end_pos {
            end_pos(target, end);
        }
        if let Some(slot) = &self.tokens {
            slot(target, tokens);
        }
    }
}

impl fmt::Debug for PositionSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionSlots")
            .field("pos", &self.pos.is_some())
            .field("end_pos", &self.end_pos.is_some())
            .field("tokens", &self.tokens.is_some())
            .finish()
    }
}

/// Lazily compiled reference to another grammar type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_id: TypeId,
    type_name: &'static str,
    compile: fn() -> Result<Arc<Schema>, CompileError>,
}

impl TypeRef {
    pub fn of<T: Grammar>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            compile: crate::compile::schema_of::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> String {
        short_type_name(self.type_name)
    }

    /// Compiled schema, served from the process-wide cache when available.
    pub fn schema(&self) -> Result<Arc<Schema>, CompileError> {
        (self.compile)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.type_name)
    }
}

/// A token-kind name used by a schema, with its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindUse {
    pub name: String,
    pub loc: Loc,
}

/// Compiled, lexer-independent grammar of one type.
#[derive(Debug)]
pub struct Schema {
    pub(crate) type_id: TypeId,
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) root: Node,
    pub(crate) kinds: Vec<KindUse>,
    pub(crate) refs: Vec<TypeRef>,
    pub(crate) positions: PositionSlots,
    pub(crate) new_instance: fn() -> Box<dyn Any>,
}

impl Schema {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> &FieldDescriptor {
        &self.fields[id.index()]
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn kind(&self, kind: KindRef) -> &KindUse {
        &self.kinds[kind.index()]
    }

    pub fn kinds(&self) -> &[KindUse] {
        &self.kinds
    }

    pub fn type_ref(&self, target: RefId) -> &TypeRef {
        &self.refs[target.index()]
    }

    pub fn refs(&self) -> &[TypeRef] {
        &self.refs
    }

    pub fn positions(&self) -> &PositionSlots {
        &self.positions
    }

    /// Fresh `Default` instance of the described type.
    pub fn new_instance(&self) -> Box<dyn Any> {
        (self.new_instance)()
    }
}

pub(crate) fn new_instance<T: Grammar>() -> Box<dyn Any> {
    Box::new(T::default())
}
