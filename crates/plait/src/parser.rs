//! `Parser<T>`: a linked program bound to a lexer.

use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::sync::Arc;

use plait_compiler::{CompileError, Grammar, Program, TypeRef, link};
use plait_core::{
    LexError, LexerDefinition, Position, TextLexer, Token, TokenFilter, TokenKind, TokenMapper,
    TokenStream,
};
use plait_vm::{
    Consumption, FuelLimits, Materializer, NoopTracer, Outcome, ParseError, PrintTracer,
    TokenBuffer, Tracer, VM, Verbosity,
};

type MapFn = dyn Fn(Token) -> Result<Token, String> + Send + Sync;

/// Token post-processing, kept in registration order until kinds resolve.
enum Step {
    Elide(Vec<String>),
    Unquote(Vec<String>),
    Map(Vec<String>, Arc<MapFn>),
}

/// Configures and builds a [`Parser`].
pub struct ParserBuilder<T> {
    lexer: Arc<dyn LexerDefinition>,
    steps: Vec<Step>,
    limits: FuelLimits,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Grammar> ParserBuilder<T> {
    pub fn new() -> Self {
        Self {
            lexer: Arc::new(TextLexer::new()),
            steps: Vec::new(),
            limits: FuelLimits::default(),
            _marker: PhantomData,
        }
    }

    /// Tokenizer for string, byte and reader input (default: [`TextLexer`]).
    pub fn lexer(mut self, lexer: impl LexerDefinition + 'static) -> Self {
        self.lexer = Arc::new(lexer);
        self
    }

    /// Drops tokens of these kinds before the parser sees them.
    pub fn elide<'n>(mut self, kinds: impl IntoIterator<Item = &'n str>) -> Self {
        self.steps.push(Step::Elide(owned(kinds)));
        self
    }

    /// Strips quotes and resolves escapes in tokens of these kinds.
    pub fn unquote<'n>(mut self, kinds: impl IntoIterator<Item = &'n str>) -> Self {
        self.steps.push(Step::Unquote(owned(kinds)));
        self
    }

    /// Rewrites tokens of these kinds (every kind when empty) with `map`.
    ///
    /// An `Err` from `map` fails the parse with [`LexError::Mapping`].
    pub fn map<'n, F>(mut self, kinds: impl IntoIterator<Item = &'n str>, map: F) -> Self
    where
        F: Fn(Token) -> Result<Token, String> + Send + Sync + 'static,
    {
        self.steps.push(Step::Map(owned(kinds), Arc::new(map)));
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Compiles `T`, links it against the lexer and resolves the kinds
    /// named by `elide`, `unquote` and `map`.
    pub fn build(self) -> Result<Parser<T>, CompileError> {
        let program = link(&TypeRef::of::<T>(), self.lexer.symbols())?;

        let mut filter = TokenFilter::new();
        for step in self.steps {
            filter = match step {
                Step::Elide(names) => resolve(&program, &names)?
                    .into_iter()
                    .fold(filter, TokenFilter::elide),
                Step::Unquote(names) => {
                    filter.map(TokenMapper::unquote(resolve(&program, &names)?))
                }
                Step::Map(names, map) => {
                    let kinds = resolve(&program, &names)?;
                    filter.map(TokenMapper::new(kinds, move |token| map(token)))
                }
            };
        }

        Ok(Parser {
            program: Arc::new(program),
            lexer: self.lexer,
            filter,
            limits: self.limits,
            _marker: PhantomData,
        })
    }
}

impl<T: Grammar> Default for ParserBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn owned<'n>(kinds: impl IntoIterator<Item = &'n str>) -> Vec<String> {
    kinds.into_iter().map(str::to_owned).collect()
}

fn resolve(program: &Program, names: &[String]) -> Result<Vec<TokenKind>, CompileError> {
    program.resolve_kinds(names.iter().map(String::as_str))
}

/// Result of [`Parser::parse_prefix`].
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix<T> {
    pub value: T,
    /// Number of tokens the grammar consumed.
    pub consumed: usize,
    /// Position of the first token left unparsed (the end of input if none).
    pub rest: Position,
}

/// Parser for one output type.
///
/// Immutable after construction and cheap to clone; share it across threads
/// freely.
pub struct Parser<T> {
    program: Arc<Program>,
    lexer: Arc<dyn LexerDefinition>,
    filter: TokenFilter,
    limits: FuelLimits,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            program: Arc::clone(&self.program),
            lexer: Arc::clone(&self.lexer),
            filter: self.filter.clone(),
            limits: self.limits,
            _marker: PhantomData,
        }
    }
}

impl<T: Grammar> Parser<T> {
    /// Parser with the default [`TextLexer`] and limits.
    pub fn build() -> Result<Self, CompileError> {
        ParserBuilder::new().build()
    }

    pub fn builder() -> ParserBuilder<T> {
        ParserBuilder::new()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn lexer(&self) -> &dyn LexerDefinition {
        self.lexer.as_ref()
    }

    /// The linked grammar in EBNF, one production per type.
    pub fn ebnf(&self) -> String {
        self.program.to_string()
    }

    pub fn parse_str(&self, source: &str) -> Result<T, ParseError> {
        let mut value = T::default();
        self.parse_str_into(source, &mut value)?;
        Ok(value)
    }

    /// Parses into an existing instance. Fields the input does not capture
    /// keep their values.
    pub fn parse_str_into(&self, source: &str, target: &mut T) -> Result<(), ParseError> {
        self.parse_tokens(self.lexer.lex(source), target)
    }

    pub fn parse_bytes(&self, source: &[u8]) -> Result<T, ParseError> {
        let source = std::str::from_utf8(source).map_err(LexError::from)?;
        self.parse_str(source)
    }

    pub fn parse_reader(&self, mut reader: impl Read) -> Result<T, ParseError> {
        let mut source = Vec::new();
        reader.read_to_end(&mut source).map_err(LexError::from)?;
        self.parse_bytes(&source)
    }

    /// Parses tokens from any stream, e.g. one produced by an external lexer.
    ///
    /// Kinds must come from the symbol table of this parser's lexer.
    pub fn parse_tokens(&self, stream: impl TokenStream, target: &mut T) -> Result<(), ParseError> {
        let outcome = self.run(stream, Consumption::Full, &mut NoopTracer)?;
        self.materialize(&outcome, target)
    }

    /// Parses the longest prefix the grammar accepts and ignores the rest.
    pub fn parse_prefix(&self, source: &str) -> Result<Prefix<T>, ParseError> {
        let outcome = self.run(self.lexer.lex(source), Consumption::Prefix, &mut NoopTracer)?;
        let mut value = T::default();
        self.materialize(&outcome, &mut value)?;
        Ok(Prefix {
            value,
            consumed: outcome.end.index(),
            rest: outcome.tokens[outcome.end.index()].pos,
        })
    }

    /// Tokens of `source` as the grammar sees them: lexed, elided and mapped.
    pub fn lex(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut buffer = TokenBuffer::new(self.lexer.lex(source)).filter(&self.filter);
        buffer.fill()?;
        Ok(buffer.into_tokens())
    }

    /// Parses `source` while recording an execution trace.
    pub fn trace_str(
        &self,
        source: &str,
        verbosity: Verbosity,
    ) -> (Result<T, ParseError>, Vec<String>) {
        let mut tracer = PrintTracer::new(verbosity);
        let result = self
            .run(self.lexer.lex(source), Consumption::Full, &mut tracer)
            .and_then(|outcome| {
                let mut value = T::default();
                self.materialize(&outcome, &mut value)?;
                Ok(value)
            });
        (result, tracer.into_lines())
    }

    fn run<'a, Tr: Tracer>(
        &'a self,
        stream: impl TokenStream + 'a,
        consumption: Consumption,
        tracer: &mut Tr,
    ) -> Result<Outcome, ParseError> {
        let buffer = TokenBuffer::new(stream).filter(&self.filter);
        VM::builder(&self.program, buffer)
            .limits(self.limits)
            .build()
            .execute_with(consumption, tracer)
    }

    fn materialize(&self, outcome: &Outcome, target: &mut T) -> Result<(), ParseError> {
        Materializer::new(&self.program, &outcome.tokens).materialize(
            outcome.effects.as_slice(),
            target,
            outcome.end,
        )
    }
}

impl<T> fmt::Display for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("root", &self.program.rule(self.program.root()).name())
            .field("filter", &self.filter)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
