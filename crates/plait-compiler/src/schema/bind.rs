//! Capture binder: turns matched text or nested instances into field values.
//!
//! The set of strategies is closed ([`Strategy`]). Typed slots
//! ([`ValueSlot`], [`Capture`], [`NodeSlot`]) decide the strategy at
//! registration time and are erased into one apply function per field.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{Grammar, TypeRef};

/// What the parser hands to a binding after a successful capture.
pub enum Captured {
    /// Texts of the tokens consumed by an `@` capture, in order.
    Text(Vec<String>),
    /// Instance produced by an `@@` capture.
    Node(Box<dyn Any>),
}

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Captured::Text(values) => f.debug_tuple("Text").field(values).finish(),
            Captured::Node(_) => f.write_str("Node(..)"),
        }
    }
}

/// Conversion failure while storing a capture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BindError {
    message: String,
}

impl BindError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How a field receives captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Text,
    Flag,
    Integer,
    Float,
    Custom,
    Node(TypeRef),
}

impl Strategy {
    pub fn is_node(&self) -> bool {
        matches!(self, Strategy::Node(_))
    }

    /// Whether applying the same capture twice is indistinguishable from once.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Strategy::Flag)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Text => f.write_str("text"),
            Strategy::Flag => f.write_str("flag"),
            Strategy::Integer => f.write_str("integer"),
            Strategy::Float => f.write_str("float"),
            Strategy::Custom => f.write_str("custom capture"),
            Strategy::Node(target) => write!(f, "nested `{}`", target.name()),
        }
    }
}

pub(crate) type ApplyFn = dyn Fn(&mut dyn Any, Captured) -> Result<(), BindError> + Send + Sync;

/// Type-erased field binding.
#[derive(Clone)]
pub struct Binding {
    strategy: Strategy,
    accumulating: bool,
    apply: Arc<ApplyFn>,
}

impl Binding {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// `Vec` fields and custom captures keep every capture instead of the last.
    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    /// Stores `captured` into the field of `target`.
    ///
    /// `target` must be the instance type this binding was registered for.
    pub fn apply(&self, target: &mut dyn Any, captured: Captured) -> Result<(), BindError> {
        (self.apply)(target, captured)
    }

    pub(crate) fn value<T, V, F>(slot: F) -> Self
    where
        T: Grammar,
        V: ValueSlot,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        Self {
            strategy: V::STRATEGY,
            accumulating: V::ACCUMULATING,
            apply: Arc::new(move |target: &mut dyn Any, captured: Captured| {
                let values = expect_text::<T>(captured)?;
                slot(downcast::<T>(target)?).assign(&values)
            }),
        }
    }

    pub(crate) fn custom<T, V, F>(slot: F) -> Self
    where
        T: Grammar,
        V: Capture,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        Self {
            strategy: Strategy::Custom,
            accumulating: true,
            apply: Arc::new(move |target: &mut dyn Any, captured: Captured| {
                let values = expect_text::<T>(captured)?;
                slot(downcast::<T>(target)?).capture(&values)
            }),
        }
    }

    pub(crate) fn node<T, N, S, F>(slot: F) -> Self
    where
        T: Grammar,
        N: Grammar,
        S: NodeSlot<N>,
        F: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        Self {
            strategy: Strategy::Node(TypeRef::of::<N>()),
            accumulating: S::ACCUMULATING,
            apply: Arc::new(move |target: &mut dyn Any, captured: Captured| {
                let node = expect_node::<T, N>(captured)?;
                slot(downcast::<T>(target)?).assign(node);
                Ok(())
            }),
        }
    }

    pub(crate) fn embed<T, N, F>(slot: F) -> Self
    where
        T: Grammar,
        N: Grammar,
        F: Fn(&mut T) -> &mut N + Send + Sync + 'static,
    {
        Self {
            strategy: Strategy::Node(TypeRef::of::<N>()),
            accumulating: false,
            apply: Arc::new(move |target: &mut dyn Any, captured: Captured| {
                let node = expect_node::<T, N>(captured)?;
                *slot(downcast::<T>(target)?) = *node;
                Ok(())
            }),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("strategy", &self.strategy)
            .field("accumulating", &self.accumulating)
            .finish_non_exhaustive()
    }
}

fn downcast<T: Grammar>(target: &mut dyn Any) -> Result<&mut T, BindError> {
    target.downcast_mut::<T>().ok_or_else(|| {
        BindError::new(format!(
            "binding for `{}` applied to a different type",
            std::any::type_name::<T>()
        ))
    })
}

fn expect_text<T: Grammar>(captured: Captured) -> Result<Vec<String>, BindError> {
    match captured {
        Captured::Text(values) => Ok(values),
        Captured::Node(_) => Err(BindError::new(format!(
            "value field of `{}` received a nested instance",
            std::any::type_name::<T>()
        ))),
    }
}

fn expect_node<T: Grammar, N: Grammar>(captured: Captured) -> Result<Box<N>, BindError> {
    let Captured::Node(node) = captured else {
        return Err(BindError::new(format!(
            "nested field of `{}` received token text",
            std::any::type_name::<T>()
        )));
    };
    node.downcast::<N>().map_err(|_| {
        BindError::new(format!(
            "expected a `{}` instance",
            std::any::type_name::<N>()
        ))
    })
}

/// Single value converted from token text.
pub trait Scalar: Sized + 'static {
    const STRATEGY: Strategy;

    fn convert(text: &str) -> Result<Self, BindError>;
}

impl Scalar for String {
    const STRATEGY: Strategy = Strategy::Text;

    fn convert(text: &str) -> Result<Self, BindError> {
        Ok(text.to_owned())
    }
}

impl Scalar for bool {
    const STRATEGY: Strategy = Strategy::Flag;

    fn convert(_text: &str) -> Result<Self, BindError> {
        Ok(true)
    }
}

macro_rules! integer_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const STRATEGY: Strategy = Strategy::Integer;

            fn convert(text: &str) -> Result<Self, BindError> {
                let (digits, radix) = split_radix(text);
                <$ty>::from_str_radix(&digits, radix).map_err(|err| {
                    BindError::new(format!(
                        "invalid {} {:?}: {}",
                        stringify!($ty),
                        text,
                        err
                    ))
                })
            }
        }
    )*};
}

integer_scalars!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const STRATEGY: Strategy = Strategy::Float;

            fn convert(text: &str) -> Result<Self, BindError> {
                text.replace('_', "").parse::<$ty>().map_err(|err| {
                    BindError::new(format!(
                        "invalid {} {:?}: {}",
                        stringify!($ty),
                        text,
                        err
                    ))
                })
            }
        }
    )*};
}

float_scalars!(f32, f64);

/// Splits an integer literal into signed digits and radix.
///
/// Accepts a leading sign, `0x`/`0o`/`0b` prefixes and `_` separators.
fn split_radix(text: &str) -> (String, u32) {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, body) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        Some("0o" | "0O") => (8, &rest[2..]),
        Some("0b" | "0B") => (2, &rest[2..]),
        _ => (10, rest),
    };
    let mut digits = String::with_capacity(text.len());
    digits.push_str(sign);
    digits.extend(body.chars().filter(|&c| c != '_'));
    (digits, radix)
}

/// Field type that `@` can capture into.
///
/// Implemented for every [`Scalar`] and for `Option`/`Vec` of scalars.
/// Types without an implementation (maps, sets, ...) cannot be registered.
pub trait ValueSlot: 'static {
    const STRATEGY: Strategy;
    const ACCUMULATING: bool;

    fn assign(&mut self, values: &[String]) -> Result<(), BindError>;
}

macro_rules! scalar_slots {
    ($($ty:ty),* $(,)?) => {$(
        impl ValueSlot for $ty {
            const STRATEGY: Strategy = <$ty as Scalar>::STRATEGY;
            const ACCUMULATING: bool = false;

            fn assign(&mut self, values: &[String]) -> Result<(), BindError> {
                *self = <$ty as Scalar>::convert(&values.concat())?;
                Ok(())
            }
        }
    )*};
}

scalar_slots!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<S: Scalar> ValueSlot for Option<S> {
    const STRATEGY: Strategy = S::STRATEGY;
    const ACCUMULATING: bool = false;

    fn assign(&mut self, values: &[String]) -> Result<(), BindError> {
        *self = Some(S::convert(&values.concat())?);
        Ok(())
    }
}

impl<S: Scalar> ValueSlot for Vec<S> {
    const STRATEGY: Strategy = S::STRATEGY;
    const ACCUMULATING: bool = true;

    fn assign(&mut self, values: &[String]) -> Result<(), BindError> {
        self.push(S::convert(&values.concat())?);
        Ok(())
    }
}

/// User-defined capture target.
///
/// Receives the texts of every token an `@` capture consumed and decides
/// itself how repeated captures combine.
pub trait Capture: 'static {
    fn capture(&mut self, values: &[String]) -> Result<(), BindError>;
}

/// Field type that `@@` can capture into.
pub trait NodeSlot<N>: 'static {
    const ACCUMULATING: bool;

    fn assign(&mut self, node: Box<N>);
}

impl<N: 'static> NodeSlot<N> for Box<N> {
    const ACCUMULATING: bool = false;

    fn assign(&mut self, node: Box<N>) {
        *self = node;
    }
}

impl<N: 'static> NodeSlot<N> for Option<Box<N>> {
    const ACCUMULATING: bool = false;

    fn assign(&mut self, node: Box<N>) {
        *self = Some(node);
    }
}

impl<N: 'static> NodeSlot<N> for Vec<N> {
    const ACCUMULATING: bool = true;

    fn assign(&mut self, node: Box<N>) {
        self.push(*node);
    }
}
