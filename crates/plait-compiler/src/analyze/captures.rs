//! Capture validation.
//!
//! Walks a parsed tree and checks each capture against its field binding:
//! - `@` needs a bound, non-nested field (`@@` is checked by the parser)
//! - a field that keeps a single value may not be captured inside a repetition

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{CaptureMode, Loc, Node};
use crate::schema::{Binding, FieldDescriptor};

pub fn check_captures(
    type_name: &str,
    fields: &[FieldDescriptor],
    root: &Node,
    diag: &mut Diagnostics,
) {
    let mut checker = CaptureChecker {
        type_name,
        fields,
        diag,
    };
    checker.visit(root, false);
}

struct CaptureChecker<'s, 'd> {
    type_name: &'s str,
    fields: &'s [FieldDescriptor],
    diag: &'d mut Diagnostics,
}

impl CaptureChecker<'_, '_> {
    fn visit(&mut self, node: &Node, repeated: bool) {
        match node {
            Node::Literal { .. } | Node::Token { .. } | Node::Ref { .. } => {}
            Node::Seq(children) | Node::Alt(children) => {
                for child in children {
                    self.visit(child, repeated);
                }
            }
            Node::Optional(child) | Node::Group(child) => self.visit(child, repeated),
            Node::Not { child, .. } => self.visit(child, repeated),
            Node::Repeat { child, .. } => self.visit(child, true),
            Node::Capture {
                field,
                mode,
                child,
                loc,
            } => {
                let fields = self.fields;
                let descriptor = &fields[field.index()];
                if let Some(binding) = descriptor.binding() {
                    if *mode == CaptureMode::Value {
                        self.check_value_capture(descriptor, binding, *loc);
                    }
                    if repeated {
                        self.check_repeatable(descriptor, binding, *loc);
                    }
                } else if *mode == CaptureMode::Value {
                    self.diag
                        .report(DiagnosticKind::UnboundCapture, self.type_name)
                        .at(descriptor.site(loc.range))
                        .message(descriptor.name())
                        .emit();
                }
                self.visit(child, repeated);
            }
        }
    }

    fn check_value_capture(&mut self, descriptor: &FieldDescriptor, binding: &Binding, loc: Loc) {
        if !binding.strategy().is_node() {
            return;
        }
        self.diag
            .report(DiagnosticKind::IncompatibleCapture, self.type_name)
            .at(descriptor.site(loc.range))
            .message(format!(
                "`@` captures token text, but field `{}` holds a {}",
                descriptor.name(),
                binding.strategy()
            ))
            .hint("use `@@` to parse the nested type")
            .emit();
    }

    fn check_repeatable(&mut self, descriptor: &FieldDescriptor, binding: &Binding, loc: Loc) {
        if binding.is_accumulating() || binding.strategy().is_idempotent() {
            return;
        }
        self.diag
            .report(DiagnosticKind::RepeatedScalarCapture, self.type_name)
            .at(descriptor.site(loc.range))
            .message(format!(
                "field `{}` holds one {} value but may match many times",
                descriptor.name(),
                binding.strategy()
            ))
            .emit();
    }
}
