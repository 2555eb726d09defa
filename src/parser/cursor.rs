//! `TokenCursor`: save/restore/pop/unread over a token slice, grounded on
//! `ast_generator.cpp`'s `save()`/`restore()`/`unread_token()` idiom.

use crate::token::{Token, TokenKind};

pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    #[must_use]
    pub fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or_else(|| self.tokens.last().expect("non-empty token stream"))
    }

    #[must_use]
    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Pushes the most recently consumed token back onto the front of the
    /// stream, mirroring `unread_token()`.
    pub fn unread(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    #[must_use]
    pub fn save(&self) -> usize {
        self.position
    }

    pub fn restore(&mut self, mark: usize) {
        self.position = mark;
    }

    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }
}
