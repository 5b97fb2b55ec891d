//! Tokenizer for a single disassembly instruction line.
//!
//! The lexer is forward-only and lazy: tokens are produced one at a time as the parser asks for
//! them, and nothing is retained once the line has been parsed.

use core::fmt;

use crate::error::LineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    NumberLiteral,
    LParen,
    RParen,
    Comma,
    Dot,
    Minus,
    /// Pseudo-kind used in diagnostics when the line has no more tokens.
    EndOfLine,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::NumberLiteral => "number literal",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Minus => "`-`",
            TokenKind::EndOfLine => "end of line",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn punct(kind: TokenKind, c: char) -> Self {
        Self {
            kind,
            text: c.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_second_char(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek_char().is_some_and(&pred) {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Character column (1-based) of the current position, for diagnostics.
    fn column(&self) -> usize {
        self.text[..self.pos].chars().count() + 1
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LineError> {
        self.eat_while(char::is_whitespace);

        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        if c.is_alphabetic() {
            let text = self.eat_while(|c| c.is_alphanumeric() || c == '_');
            return Ok(Some(Token {
                kind: TokenKind::Identifier,
                text: text.to_owned(),
            }));
        }

        if c.is_ascii_digit() {
            let start = self.pos;
            self.eat_while(|c| c.is_ascii_digit());
            // A fractional part only when the dot is followed by a digit; `1.` leaves the dot for
            // the punctuation rule.
            if self.peek_char() == Some('.')
                && self.peek_second_char().is_some_and(|c| c.is_ascii_digit())
            {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit());
            }
            return Ok(Some(Token {
                kind: TokenKind::NumberLiteral,
                text: self.text[start..self.pos].to_owned(),
            }));
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            _ => {
                return Err(LineError::UnrecognizedCharacter {
                    ch: c,
                    column: self.column(),
                })
            }
        };
        self.bump();
        Ok(Some(Token::punct(kind, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(text);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            out.push((tok.kind, tok.text));
        }
        out
    }

    #[test]
    fn splits_register_operands() {
        let toks = kinds("mul r0.w, r0.w, -v5.w");
        let expected = [
            (TokenKind::Identifier, "mul"),
            (TokenKind::Identifier, "r0"),
            (TokenKind::Dot, "."),
            (TokenKind::Identifier, "w"),
            (TokenKind::Comma, ","),
            (TokenKind::Identifier, "r0"),
            (TokenKind::Dot, "."),
            (TokenKind::Identifier, "w"),
            (TokenKind::Comma, ","),
            (TokenKind::Minus, "-"),
            (TokenKind::Identifier, "v5"),
            (TokenKind::Dot, "."),
            (TokenKind::Identifier, "w"),
        ];
        assert_eq!(toks.len(), expected.len());
        for ((kind, text), (ek, et)) in toks.iter().zip(expected) {
            assert_eq!(*kind, ek);
            assert_eq!(text, et);
        }
    }

    #[test]
    fn numbers_keep_fraction_and_drop_sign() {
        let toks = kinds("l(-1.500000, 2, 0.0)");
        assert_eq!(toks[2], (TokenKind::Minus, "-".to_owned()));
        assert_eq!(toks[3], (TokenKind::NumberLiteral, "1.500000".to_owned()));
        assert_eq!(toks[5], (TokenKind::NumberLiteral, "2".to_owned()));
        assert_eq!(toks[7], (TokenKind::NumberLiteral, "0.0".to_owned()));
    }

    #[test]
    fn dot_without_digits_is_punctuation() {
        let toks = kinds("1.x");
        assert_eq!(
            toks,
            vec![
                (TokenKind::NumberLiteral, "1".to_owned()),
                (TokenKind::Dot, ".".to_owned()),
                (TokenKind::Identifier, "x".to_owned()),
            ]
        );
    }

    #[test]
    fn skips_any_whitespace() {
        let toks = kinds("\tmov\u{a0} r0 ,\r\n r1 ");
        assert_eq!(toks.len(), 4);
        assert_eq!(toks[3].1, "r1");
    }

    #[test]
    fn identifiers_keep_underscores() {
        let toks = kinds("sample_indexable g_linear");
        assert_eq!(toks[0].1, "sample_indexable");
        assert_eq!(toks[1].1, "g_linear");
    }

    #[test]
    fn rejects_unknown_characters_with_column() {
        let mut lexer = Lexer::new("mov r0, cb0[1]");
        let mut err = None;
        loop {
            match lexer.next_token() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    err = Some(e);
                    break;
                }
            }
        }
        assert_eq!(
            err,
            Some(LineError::UnrecognizedCharacter { ch: '[', column: 12 })
        );
    }
}
