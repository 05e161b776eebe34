//! Parser state machine and low-level operations.

use rowan::{TextRange, TextSize};

use super::lexer::{SyntaxKind, Token, token_text};
use super::{KindTable, RefTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Site};
use crate::ir::{FieldId, KindRef, Loc, RefId};
use crate::schema::{FieldDescriptor, TypeRef};

/// Marker for a parse stopped by a reported syntax error.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Abort;

pub(crate) struct Parser<'a> {
    pub(super) type_name: &'a str,
    pub(super) fields: &'a [FieldDescriptor],
    tokens: Vec<Token>,
    pos: usize,
    pub(super) diagnostics: &'a mut Diagnostics,
    kinds: KindTable,
    refs: RefTable,
}

impl<'a> Parser<'a> {
    pub fn new(
        type_name: &'a str,
        fields: &'a [FieldDescriptor],
        tokens: Vec<Token>,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            type_name,
            fields,
            tokens,
            pos: 0,
            diagnostics,
            kinds: KindTable::new(),
            refs: RefTable::new(),
        }
    }

    pub fn finish(self) -> (KindTable, RefTable) {
        (self.kinds, self.refs)
    }

    pub(super) fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    pub(super) fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    pub(super) fn currently_is(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consumes the current token. Callers check `current()` first.
    pub(super) fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> Option<Token> {
        if self.currently_is(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    pub(super) fn text(&self, token: &Token) -> &'a str {
        token_text(self.fields[token.field.index()].annotation(), token)
    }

    pub(super) fn loc(token: &Token) -> Loc {
        Loc::new(token.field, token.range)
    }

    pub(super) fn site(&self, loc: Loc) -> Site {
        let field = &self.fields[loc.field.index()];
        Site::new(field.name(), field.annotation(), loc.range)
    }

    /// Site of the current token, or the end of the last annotation.
    pub(super) fn current_site(&self) -> Site {
        if let Some(token) = self.current() {
            return self.site(Self::loc(&token));
        }
        let field = self
            .tokens
            .last()
            .map_or(FieldId::new(0), |token| token.field);
        let annotation = self.fields[field.index()].annotation();
        let end = TextSize::from(annotation.len() as u32);
        self.site(Loc::new(field, TextRange::empty(end)))
    }

    pub(super) fn describe_current(&self) -> String {
        match self.current() {
            Some(token) => format!("found {}", token.kind.describe()),
            None => "the annotations end here".to_owned(),
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind, site: Site, detail: Option<String>) -> Abort {
        let mut builder = self.diagnostics.report(kind, self.type_name).at(site);
        if let Some(detail) = detail {
            builder = builder.message(detail);
        }
        builder.emit();
        Abort
    }

    pub(super) fn kind_ref(&mut self, name: &str, loc: Loc) -> KindRef {
        let entry = self.kinds.entry(name.to_owned());
        let index = entry.index();
        entry.or_insert(loc);
        KindRef::new(index)
    }

    pub(super) fn type_ref(&mut self, target: TypeRef) -> RefId {
        let (index, _) = self.refs.insert_full(target.type_id(), target);
        RefId::new(index)
    }
}
