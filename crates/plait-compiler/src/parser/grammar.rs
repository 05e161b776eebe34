//! Productions of the annotation grammar.

use plait_core::unquote;

use super::core::{Abort, Parser};
use super::lexer::{SyntaxKind, Token};
use crate::diagnostics::DiagnosticKind;
use crate::ir::{CaptureMode, Loc, Node};
use crate::schema::Strategy;

type PResult<T> = Result<T, Abort>;

fn starts_primary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::AtAt
            | SyntaxKind::At
            | SyntaxKind::Negation
            | SyntaxKind::StringLiteral
            | SyntaxKind::Id
            | SyntaxKind::ParenOpen
            | SyntaxKind::BracketOpen
            | SyntaxKind::BraceOpen
    )
}

impl Parser<'_> {
    pub fn parse_root(&mut self) -> PResult<Node> {
        let root = self.expression()?;
        if let Some(token) = self.current() {
            let detail = match token.kind {
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose => {
                    format!("unmatched {}", token.kind.describe())
                }
                kind => format!("unexpected {}", kind.describe()),
            };
            let site = self.site(Self::loc(&token));
            return Err(self.error(DiagnosticKind::UnexpectedToken, site, Some(detail)));
        }
        Ok(root)
    }

    fn expression(&mut self) -> PResult<Node> {
        let mut branches = vec![self.sequence()?];
        while self.eat(SyntaxKind::Pipe).is_some() {
            branches.push(self.sequence()?);
        }
        Ok(Node::alt(branches))
    }

    fn sequence(&mut self) -> PResult<Node> {
        let mut terms = Vec::new();
        while let Some(kind) = self.current_kind() {
            if kind == SyntaxKind::Garbage {
                return Err(self.garbage());
            }
            if !starts_primary(kind) {
                break;
            }
            terms.push(self.term()?);
        }
        if terms.is_empty() {
            return Err(self.expected_expression());
        }
        Ok(Node::seq(terms))
    }

    fn term(&mut self) -> PResult<Node> {
        let primary = self.primary()?;
        let node = match self.current_kind() {
            Some(SyntaxKind::Star) => Node::Repeat {
                child: Box::new(primary),
                min: 0,
            },
            Some(SyntaxKind::Plus) => Node::Repeat {
                child: Box::new(primary),
                min: 1,
            },
            Some(SyntaxKind::Question) => Node::Optional(Box::new(primary)),
            _ => return Ok(primary),
        };
        self.bump();
        Ok(node)
    }

    fn primary(&mut self) -> PResult<Node> {
        match self.current_kind() {
            Some(SyntaxKind::AtAt) => {
                let token = self.bump();
                Ok(self.node_capture(token))
            }
            Some(SyntaxKind::At) => {
                let token = self.bump();
                if !self.current_kind().is_some_and(starts_primary) {
                    let site = self.site(Self::loc(&token));
                    let detail = self.describe_current();
                    return Err(self.error(DiagnosticKind::CaptureWithoutTarget, site, Some(detail)));
                }
                let child = self.primary()?;
                Ok(Node::Capture {
                    field: token.field,
                    mode: CaptureMode::Value,
                    child: Box::new(child),
                    loc: Self::loc(&token),
                })
            }
            Some(SyntaxKind::Negation) => {
                let token = self.bump();
                if !self.current_kind().is_some_and(starts_primary) {
                    return Err(self.expected_expression());
                }
                let child = self.primary()?;
                Ok(Node::Not {
                    child: Box::new(child),
                    loc: Self::loc(&token),
                })
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> PResult<Node> {
        let Some(token) = self.current() else {
            return Err(self.expected_expression());
        };
        match token.kind {
            SyntaxKind::StringLiteral => self.literal(),
            SyntaxKind::Id => {
                self.bump();
                let loc = Self::loc(&token);
                let kind = self.kind_ref(self.text(&token), loc);
                Ok(Node::Token { kind, loc })
            }
            SyntaxKind::ParenOpen => {
                let inner = self.delimited(SyntaxKind::ParenClose, DiagnosticKind::UnclosedGroup)?;
                Ok(Node::Group(Box::new(inner)))
            }
            SyntaxKind::BracketOpen => {
                let inner =
                    self.delimited(SyntaxKind::BracketClose, DiagnosticKind::UnclosedOptional)?;
                Ok(Node::Optional(Box::new(inner)))
            }
            SyntaxKind::BraceOpen => {
                let inner =
                    self.delimited(SyntaxKind::BraceClose, DiagnosticKind::UnclosedRepetition)?;
                Ok(Node::Repeat {
                    child: Box::new(inner),
                    min: 0,
                })
            }
            _ => Err(self.expected_expression()),
        }
    }

    /// `"text"` or `"text":Kind`.
    fn literal(&mut self) -> PResult<Node> {
        let token = self.bump();
        let mut loc = Self::loc(&token);
        let text = match unquote(self.text(&token)) {
            Ok(text) => text,
            Err(reason) => {
                let site = self.site(loc);
                return Err(self.error(DiagnosticKind::InvalidEscape, site, Some(reason)));
            }
        };

        let mut kind = None;
        if let Some(colon) = self.eat(SyntaxKind::Colon) {
            let Some(name) = self.eat(SyntaxKind::Id) else {
                let site = self.site(Self::loc(&colon));
                let detail = self.describe_current();
                return Err(self.error(DiagnosticKind::ExpectedTokenKind, site, Some(detail)));
            };
            let name_loc = Self::loc(&name);
            kind = Some(self.kind_ref(self.text(&name), name_loc));
            loc = Loc::new(loc.field, loc.range.cover(name.range));
        }

        Ok(Node::Literal { text, kind, loc })
    }

    /// Parses `open expression close`; `open` is the current token.
    fn delimited(&mut self, close: SyntaxKind, unclosed: DiagnosticKind) -> PResult<Node> {
        let open = self.bump();
        let inner = self.expression()?;
        if self.eat(close).is_some() {
            return Ok(inner);
        }
        let site = self.site(Self::loc(&open));
        let detail = self.describe_current();
        Err(self.error(unclosed, site, Some(detail)))
    }

    /// `@@`: resolves the field's nested type.
    ///
    /// Problems with the target field are reported without aborting; the
    /// returned placeholder is never executed because the schema is rejected.
    fn node_capture(&mut self, token: Token) -> Node {
        let loc = Self::loc(&token);
        let field = &self.fields[token.field.index()];
        let strategy = field.binding().map(|b| b.strategy());
        match strategy {
            Some(Strategy::Node(target)) => {
                let target = self.type_ref(target);
                Node::Capture {
                    field: token.field,
                    mode: CaptureMode::Node,
                    child: Box::new(Node::Ref { target, loc }),
                    loc,
                }
            }
            Some(other) => {
                let detail = format!(
                    "`@@` parses a nested grammar type, but field `{}` holds a {} value",
                    field.name(),
                    other
                );
                let site = self.site(loc);
                self.diagnostics
                    .report(DiagnosticKind::IncompatibleCapture, self.type_name)
                    .at(site)
                    .message(detail)
                    .hint("use `@` to capture token text")
                    .emit();
                Node::Seq(Vec::new())
            }
            None => {
                let name = field.name().to_owned();
                let site = self.site(loc);
                self.diagnostics
                    .report(DiagnosticKind::UnboundCapture, self.type_name)
                    .at(site)
                    .message(name)
                    .emit();
                Node::Seq(Vec::new())
            }
        }
    }

    fn expected_expression(&mut self) -> Abort {
        let site = self.current_site();
        match self.current_kind() {
            None => self.error(DiagnosticKind::ExpectedExpression, site, None),
            Some(SyntaxKind::Garbage) => self.garbage(),
            Some(kind @ (SyntaxKind::Star | SyntaxKind::Plus | SyntaxKind::Question)) => {
                let detail = format!("{} has nothing to repeat", kind.describe());
                self.error(DiagnosticKind::ExpectedExpression, site, Some(detail))
            }
            Some(_) => {
                let detail = self.describe_current();
                self.error(DiagnosticKind::ExpectedExpression, site, Some(detail))
            }
        }
    }

    fn garbage(&mut self) -> Abort {
        let site = self.current_site();
        let text = self.current().map_or("", |token| self.text(&token));
        if text.starts_with(['"', '\'']) {
            return self.error(DiagnosticKind::UnterminatedString, site, None);
        }
        let detail = format!("unexpected `{text}`");
        self.error(DiagnosticKind::UnexpectedToken, site, Some(detail))
    }
}
