//! Translate SM4/SM5 disassembly listings into HLSL-style statements.
//!
//! Each listing line (`<index>: <instruction>`) is handled on its own:
//!
//! - [`lexer`] turns the instruction text into tokens,
//! - [`parser`] applies the operand grammar and the [`opcode`] registration table to build one
//!   [`ast::Node`],
//! - [`translate`] lowers that node to a single statement, using the destination write mask to
//!   pick the declared type and narrow source swizzles.
//!
//! Failures never cross a line: [`ListingTranslator`] records a [`Diagnostic`] and moves on.
//!
//! ```
//! use aero_dxasm::{feed, Translator};
//!
//! let out = feed("mul r0.w, r0.w, v5.w", &Translator::default()).unwrap();
//! assert_eq!(out, "float r0.w = r0.w * v5.w;");
//! ```

#![forbid(unsafe_code)]

pub mod ast;
mod config;
mod error;
pub mod lexer;
pub mod listing;
pub mod mask;
pub mod opcode;
pub mod parser;
pub mod translate;

pub use crate::ast::{Action, BinaryOperator, CompareOp, Node, Variable};
pub use crate::config::{ScalarType, TranslateOptions};
pub use crate::error::LineError;
pub use crate::lexer::{Lexer, Token, TokenKind};
pub use crate::listing::{
    feed, strip_line_index, Diagnostic, ListingOutput, ListingTranslator, TranslatedLine,
};
pub use crate::mask::ComponentMask;
pub use crate::opcode::{Mnemonic, OPCODES};
pub use crate::parser::{parse_instruction, Instruction, Parser};
pub use crate::translate::{Translated, Translator, ValueType};
