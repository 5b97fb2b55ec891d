//! Recursive-descent parser for one instruction line.
//!
//! Grammar (operands of every opcode are built from these rules):
//!
//! ```text
//! instruction    := IDENT descriptor* operands
//! descriptor     := '(' IDENT (',' IDENT)* ')'
//! param          := '-'? (NUMBER | expr)
//! functionParams := '(' param (',' param)* ')'
//! expr           := '-'? IDENT ( ('.' IDENT)+ | functionParams )?
//! ```

use crate::ast::{Node, Variable};
use crate::error::LineError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::opcode::{self, Mnemonic, Operands};

/// Dispatch result for one line: the mnemonic as written, and the tree when a handler exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub opcode: Option<Mnemonic>,
    pub node: Option<Node>,
}

impl Instruction {
    /// The parsed tree, or [`LineError::UnknownMnemonic`] when no handler was registered.
    pub fn into_node(self) -> Result<Node, LineError> {
        self.node.ok_or(LineError::UnknownMnemonic {
            name: self.mnemonic,
        })
    }
}

/// Parse the instruction text of one listing line (index prefix already removed).
pub fn parse_instruction(text: &str) -> Result<Instruction, LineError> {
    Parser::new(text)?.instruction()
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Result<Self, LineError> {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn peek_kind(&self) -> TokenKind {
        self.current
            .as_ref()
            .map_or(TokenKind::EndOfLine, |tok| tok.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn unexpected(&self, expected: TokenKind) -> LineError {
        LineError::UnexpectedToken {
            expected,
            found: self.peek_kind(),
            text: self
                .current
                .as_ref()
                .map(|tok| tok.text.clone())
                .unwrap_or_default(),
        }
    }

    /// Consume the current token if it has the expected kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<Token, LineError> {
        match self.current.take() {
            Some(tok) if tok.kind == kind => {
                self.current = self.lexer.next_token()?;
                Ok(tok)
            }
            other => {
                self.current = other;
                Err(self.unexpected(kind))
            }
        }
    }

    fn eat_end(&self) -> Result<(), LineError> {
        if self.current.is_some() {
            return Err(self.unexpected(TokenKind::EndOfLine));
        }
        Ok(())
    }

    /// `instruction := IDENT descriptor* operands`
    pub fn instruction(mut self) -> Result<Instruction, LineError> {
        let mnemonic = self.eat(TokenKind::Identifier)?.text;
        let Some(def) = opcode::lookup(&mnemonic) else {
            return Ok(Instruction {
                mnemonic,
                opcode: None,
                node: None,
            });
        };

        for &count in def.descriptor {
            self.descriptor(count)?;
        }

        let mut operands = Operands::new(&mut self);
        let node = (def.lower)(&mut operands)?;
        debug_assert_eq!(
            operands.taken(),
            def.operands,
            "`{}` consumed a different operand count than registered",
            def.mnemonic.name()
        );
        self.eat_end()?;

        Ok(Instruction {
            mnemonic,
            opcode: Some(def.mnemonic),
            node: Some(node),
        })
    }

    /// `'(' IDENT (',' IDENT){count-1} ')'`, e.g. `(texture2d)` or `(float,float,float,float)`.
    fn descriptor(&mut self, count: usize) -> Result<(), LineError> {
        self.eat(TokenKind::LParen)?;
        for i in 0..count {
            if i > 0 {
                self.eat(TokenKind::Comma)?;
            }
            self.eat(TokenKind::Identifier)?;
        }
        self.eat(TokenKind::RParen)?;
        Ok(())
    }

    /// `param := '-'? (NUMBER | expr)`
    pub fn param(&mut self) -> Result<Node, LineError> {
        if self.at(TokenKind::Minus) {
            self.eat(TokenKind::Minus)?;
            let inner = self.param_body()?;
            return Ok(Node::negated(inner));
        }
        self.param_body()
    }

    fn param_body(&mut self) -> Result<Node, LineError> {
        if self.at(TokenKind::NumberLiteral) {
            let tok = self.eat(TokenKind::NumberLiteral)?;
            return Ok(Node::NumberLiteral(tok.text));
        }
        self.expr()
    }

    /// `functionParams := '(' param (',' param)* ')'`
    pub fn function_params(&mut self) -> Result<Vec<Node>, LineError> {
        self.eat(TokenKind::LParen)?;
        let mut args = vec![self.param()?];
        while self.at(TokenKind::Comma) {
            self.eat(TokenKind::Comma)?;
            args.push(self.param()?);
        }
        self.eat(TokenKind::RParen)?;
        Ok(args)
    }

    /// `expr := '-'? IDENT ( ('.' IDENT)+ | functionParams )?`
    pub fn expr(&mut self) -> Result<Node, LineError> {
        let negate = if self.at(TokenKind::Minus) {
            self.eat(TokenKind::Minus)?;
            true
        } else {
            false
        };

        let name = self.eat(TokenKind::Identifier)?.text;
        let node = if self.at(TokenKind::LParen) {
            let args = self.function_params()?;
            Node::Call {
                name: call_name(name, args.len()),
                args,
            }
        } else {
            Node::Variable(self.member_chain(name)?)
        };

        Ok(if negate { Node::negated(node) } else { node })
    }

    /// An operand that must name a register or resource: `IDENT ('.' IDENT)*`.
    pub(crate) fn variable(&mut self) -> Result<Variable, LineError> {
        let name = self.eat(TokenKind::Identifier)?.text;
        self.member_chain(name)
    }

    fn member_chain(&mut self, mut name: String) -> Result<Variable, LineError> {
        while self.at(TokenKind::Dot) {
            self.eat(TokenKind::Dot)?;
            let member = self.eat(TokenKind::Identifier)?;
            name.push('.');
            name.push_str(&member.text);
        }
        Ok(Variable::new(name))
    }
}

/// `l(...)` is the disassembler's immediate vector; it becomes a `float`/`floatN` constructor.
fn call_name(name: String, arg_count: usize) -> String {
    if name != "l" {
        return name;
    }
    match arg_count {
        1 => "float".to_owned(),
        n => format!("float{n}"),
    }
}
