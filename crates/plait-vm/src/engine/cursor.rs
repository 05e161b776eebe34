//! Token positions and the lazily filled token buffer.

use plait_core::{LexError, Token, TokenFilter, TokenStream};

/// Index of a token in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cursor(u32);

impl Cursor {
    pub const START: Cursor = Cursor(0);

    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Cursor after consuming the token at `self`.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Tokens pulled from a stream on demand, kept so any cursor can be revisited.
///
/// The buffer ends with exactly one `EOF` token; reading past it yields that
/// token again.
pub struct TokenBuffer<'a> {
    stream: Box<dyn TokenStream + 'a>,
    filter: Option<&'a TokenFilter>,
    tokens: Vec<Token>,
    done: bool,
}

impl<'a> TokenBuffer<'a> {
    pub fn new(stream: impl TokenStream + 'a) -> Self {
        Self {
            stream: Box::new(stream),
            filter: None,
            tokens: Vec::new(),
            done: false,
        }
    }

    /// Elides and maps tokens as they are pulled.
    pub fn filter(mut self, filter: &'a TokenFilter) -> Self {
        if !filter.is_empty() {
            self.filter = Some(filter);
        }
        self
    }

    /// Token at `cursor`, pulling from the stream as needed.
    pub fn get(&mut self, cursor: Cursor) -> Result<&Token, LexError> {
        while self.tokens.len() <= cursor.index() && !self.done {
            self.pull()?;
        }
        // Either the cursor is buffered or the final EOF is.
        let index = cursor.index().min(self.tokens.len() - 1);
        Ok(&self.tokens[index])
    }

    /// Pulls the rest of the stream.
    pub fn fill(&mut self) -> Result<(), LexError> {
        while !self.done {
            self.pull()?;
        }
        Ok(())
    }

    /// Tokens buffered so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn pull(&mut self) -> Result<(), LexError> {
        let token = self.stream.next_token()?;
        let token = match self.filter {
            Some(filter) => match filter.apply(token)? {
                Some(token) => token,
                None => return Ok(()),
            },
            None => token,
        };
        self.done = token.is_eof();
        self.tokens.push(token);
        Ok(())
    }
}
