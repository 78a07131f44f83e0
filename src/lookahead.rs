//! A two-lexeme lookahead buffer wrapping the stateless scanner in
//! [`crate::lexer`].

use crate::lexer::{Lexeme, Tag, analyze};

/// Raised by [`Lookahead2::expect`] when the next lexeme does not have the
/// expected tag. Carries enough information for a caller to translate it
/// into a domain-specific parse error with the offending lexeme's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongLexeme {
    pub expected: Tag,
    pub found: Tag,
    pub at: usize,
}

/// Caches at most two upcoming lexemes ahead of a cursor into a borrowed
/// source string.
pub struct Lookahead2<'s> {
    source: &'s str,
    cursor: usize,
    slot0: Option<Lexeme>,
    slot1: Option<Lexeme>,
}

impl<'s> Lookahead2<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source, cursor: 0, slot0: None, slot1: None }
    }

    fn fill_slot0(&mut self) -> Lexeme {
        if self.slot0.is_none() {
            let (tag, len) = analyze(&self.source[self.cursor..]);
            self.slot0 = Some(Lexeme { tag, start: self.cursor, len });
        }
        self.slot0.expect("just filled")
    }

    /// Returns the next lexeme's tag without consuming it. Idempotent.
    pub fn peek(&mut self) -> Tag {
        self.fill_slot0().tag
    }

    /// Like [`Self::peek`], but returns the full lexeme (tag, start, length)
    /// rather than just its tag.
    pub fn peek_full(&mut self) -> Lexeme {
        self.fill_slot0()
    }

    /// Returns the tags of the next two lexemes without consuming either.
    pub fn peek2(&mut self) -> (Tag, Tag) {
        let slot0 = self.fill_slot0();
        if self.slot1.is_none() {
            let next_start = slot0.start + slot0.len;
            let (tag, len) = if slot0.tag == Tag::Eof {
                (Tag::Eof, 0)
            } else {
                analyze(&self.source[next_start..])
            };
            self.slot1 = Some(Lexeme { tag, start: next_start, len });
        }
        (slot0.tag, self.slot1.expect("just filled").tag)
    }

    /// Consumes the next lexeme, shifting slot two into slot one.
    ///
    /// Must be preceded by a call to [`Self::peek`] (directly, or
    /// transitively through [`Self::peek2`] or a prior [`Self::expect`]).
    /// At `Eof` this returns an empty lexeme and does not advance.
    pub fn accept(&mut self) -> (&'s str, Lexeme) {
        let slot0 = self
            .slot0
            .expect("accept() called without a preceding peek()");
        if slot0.tag == Tag::Eof {
            return ("", slot0);
        }
        self.cursor = slot0.start + slot0.len;
        self.slot0 = self.slot1.take();
        (slot0.text(self.source), slot0)
    }

    /// Peeks, and if the tag matches, accepts. Otherwise fails without
    /// advancing the cursor.
    pub fn expect(&mut self, tag: Tag) -> Result<(&'s str, Lexeme), WrongLexeme> {
        let found = self.peek();
        if found == tag {
            Ok(self.accept())
        } else {
            let at = self.slot0.expect("just peeked").start;
            Err(WrongLexeme { expected: tag, found, at })
        }
    }

    /// Byte offset of the cursor, i.e. the start of the next unconsumed
    /// lexeme.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_is_idempotent() {
        let mut la = Lookahead2::new("__ns:=/foo");
        assert_eq!(la.peek(), Tag::Ns);
        assert_eq!(la.peek(), Tag::Ns);
    }

    #[test]
    fn peek2_looks_past_slot_one() {
        let mut la = Lookahead2::new("__ns:=/foo");
        assert_eq!(la.peek2(), (Tag::Ns, Tag::Separator));
    }

    #[test]
    fn accept_shifts_slot_two_into_slot_one() {
        let mut la = Lookahead2::new("__ns:=/foo");
        la.peek2();
        let (text, lex) = la.accept();
        assert_eq!(text, "__ns");
        assert_eq!(lex.tag, Tag::Ns);
        assert_eq!(la.peek(), Tag::Separator);
    }

    #[test]
    fn accept_at_eof_is_empty_and_stays() {
        let mut la = Lookahead2::new("");
        la.peek();
        assert_eq!(la.accept(), ("", Lexeme { tag: Tag::Eof, start: 0, len: 0 }));
        assert_eq!(la.peek(), Tag::Eof);
    }

    #[test]
    fn expect_fails_without_advancing() {
        let mut la = Lookahead2::new("foo:=bar");
        let err = la.expect(Tag::Separator).unwrap_err();
        assert_eq!(err.expected, Tag::Separator);
        assert_eq!(err.found, Tag::Token);
        assert_eq!(err.at, 0);
        // cursor did not move
        assert_eq!(la.peek(), Tag::Token);
    }
}
