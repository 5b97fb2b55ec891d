//! Mnemonic registration table.
//!
//! Each row names an opcode, the descriptor groups that follow its mnemonic, how many operands it
//! takes, and the function that lowers those operands into an AST node. Supporting a new opcode
//! means adding a [`Mnemonic`] variant and a row to [`OPCODES`].

use crate::ast::{Action, BinaryOperator, CompareOp, Node, Variable};
use crate::error::LineError;
use crate::lexer::TokenKind;
use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Mov,
    MovSat,
    Mul,
    MulSat,
    Add,
    AddSat,
    Mad,
    MadSat,
    Div,
    Exp,
    Log,
    Sqrt,
    Rsq,
    Frc,
    Min,
    Max,
    And,
    Or,
    Ge,
    Lt,
    Movc,
    Dp2,
    Dp3,
    Dp4,
    DiscardNz,
    DerivRtx,
    DerivRty,
    DerivRtxCoarse,
    DerivRtyCoarse,
    DerivRtxFine,
    DerivRtyFine,
    Sample,
    SampleIndexable,
}

impl Mnemonic {
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Mov => "mov",
            Mnemonic::MovSat => "mov_sat",
            Mnemonic::Mul => "mul",
            Mnemonic::MulSat => "mul_sat",
            Mnemonic::Add => "add",
            Mnemonic::AddSat => "add_sat",
            Mnemonic::Mad => "mad",
            Mnemonic::MadSat => "mad_sat",
            Mnemonic::Div => "div",
            Mnemonic::Exp => "exp",
            Mnemonic::Log => "log",
            Mnemonic::Sqrt => "sqrt",
            Mnemonic::Rsq => "rsq",
            Mnemonic::Frc => "frc",
            Mnemonic::Min => "min",
            Mnemonic::Max => "max",
            Mnemonic::And => "and",
            Mnemonic::Or => "or",
            Mnemonic::Ge => "ge",
            Mnemonic::Lt => "lt",
            Mnemonic::Movc => "movc",
            Mnemonic::Dp2 => "dp2",
            Mnemonic::Dp3 => "dp3",
            Mnemonic::Dp4 => "dp4",
            Mnemonic::DiscardNz => "discard_nz",
            Mnemonic::DerivRtx => "deriv_rtx",
            Mnemonic::DerivRty => "deriv_rty",
            Mnemonic::DerivRtxCoarse => "deriv_rtx_coarse",
            Mnemonic::DerivRtyCoarse => "deriv_rty_coarse",
            Mnemonic::DerivRtxFine => "deriv_rtx_fine",
            Mnemonic::DerivRtyFine => "deriv_rty_fine",
            Mnemonic::Sample => "sample",
            Mnemonic::SampleIndexable => "sample_indexable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        lookup(name).map(|def| def.mnemonic)
    }
}

impl core::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

pub type LowerFn = fn(&mut Operands<'_, '_>) -> Result<Node, LineError>;

pub struct OpcodeDef {
    pub mnemonic: Mnemonic,
    /// Identifier counts of the parenthesized groups right after the mnemonic. Parsed and discarded.
    pub descriptor: &'static [usize],
    pub operands: usize,
    pub lower: LowerFn,
}

const fn def(mnemonic: Mnemonic, operands: usize, lower: LowerFn) -> OpcodeDef {
    OpcodeDef {
        mnemonic,
        descriptor: &[],
        operands,
        lower,
    }
}

/// `(texture2d)(float,float,float,float)`
const RESOURCE_DESCRIPTOR: &[usize] = &[1, 4];

pub static OPCODES: &[OpcodeDef] = &[
    def(Mnemonic::Mov, 2, lower_mov),
    def(Mnemonic::MovSat, 2, lower_mov_sat),
    def(Mnemonic::Mul, 3, lower_mul),
    def(Mnemonic::MulSat, 3, lower_mul_sat),
    def(Mnemonic::Add, 3, lower_add),
    def(Mnemonic::AddSat, 3, lower_add_sat),
    def(Mnemonic::Mad, 4, lower_mad),
    def(Mnemonic::MadSat, 4, lower_mad_sat),
    def(Mnemonic::Div, 3, lower_div),
    def(Mnemonic::Exp, 2, lower_exp),
    def(Mnemonic::Log, 2, lower_log),
    def(Mnemonic::Sqrt, 2, lower_sqrt),
    def(Mnemonic::Rsq, 2, lower_rsq),
    def(Mnemonic::Frc, 2, lower_frc),
    def(Mnemonic::Min, 3, lower_min),
    def(Mnemonic::Max, 3, lower_max),
    def(Mnemonic::And, 3, lower_and),
    def(Mnemonic::Or, 3, lower_or),
    def(Mnemonic::Ge, 3, lower_ge),
    def(Mnemonic::Lt, 3, lower_lt),
    def(Mnemonic::Movc, 4, lower_movc),
    def(Mnemonic::Dp2, 3, lower_dp2),
    def(Mnemonic::Dp3, 3, lower_dp3),
    def(Mnemonic::Dp4, 3, lower_dp4),
    def(Mnemonic::DiscardNz, 1, lower_discard_nz),
    def(Mnemonic::DerivRtx, 2, lower_deriv_rtx),
    def(Mnemonic::DerivRty, 2, lower_deriv_rty),
    def(Mnemonic::DerivRtxCoarse, 2, lower_deriv_rtx_coarse),
    def(Mnemonic::DerivRtyCoarse, 2, lower_deriv_rty_coarse),
    def(Mnemonic::DerivRtxFine, 2, lower_deriv_rtx_fine),
    def(Mnemonic::DerivRtyFine, 2, lower_deriv_rty_fine),
    def(Mnemonic::Sample, 4, lower_sample),
    OpcodeDef {
        mnemonic: Mnemonic::SampleIndexable,
        descriptor: RESOURCE_DESCRIPTOR,
        operands: 4,
        lower: lower_sample,
    },
];

/// Exact, case-sensitive mnemonic lookup.
pub fn lookup(name: &str) -> Option<&'static OpcodeDef> {
    OPCODES.iter().find(|def| def.mnemonic.name() == name)
}

/// Comma-separated operand cursor handed to a lowering function.
pub struct Operands<'p, 'a> {
    parser: &'p mut Parser<'a>,
    taken: usize,
}

impl<'p, 'a> Operands<'p, 'a> {
    pub(crate) fn new(parser: &'p mut Parser<'a>) -> Self {
        Self { parser, taken: 0 }
    }

    pub fn taken(&self) -> usize {
        self.taken
    }

    fn separator(&mut self) -> Result<(), LineError> {
        if self.taken > 0 {
            self.parser.eat(TokenKind::Comma)?;
        }
        self.taken += 1;
        Ok(())
    }

    /// Written operand; must be a plain (possibly dotted) name.
    pub fn dest(&mut self) -> Result<Variable, LineError> {
        self.separator()?;
        self.parser.variable()
    }

    pub fn src(&mut self) -> Result<Node, LineError> {
        self.separator()?;
        self.parser.expr()
    }

    /// Resource operand of a sample; must be a plain name.
    pub fn resource(&mut self) -> Result<Variable, LineError> {
        self.separator()?;
        self.parser.variable()
    }
}

/// `max(min(x, 1), 0)`
pub fn saturate(value: Node) -> Node {
    Node::call(
        "max",
        vec![
            Node::call("min", vec![value, Node::number("1")]),
            Node::number("0"),
        ],
    )
}

fn binary(ops: &mut Operands<'_, '_>, op: BinaryOperator) -> Result<(Variable, Node), LineError> {
    let dest = ops.dest()?;
    let a = ops.src()?;
    let b = ops.src()?;
    Ok((dest, Node::binary(a, op, b)))
}

fn multiply_add(ops: &mut Operands<'_, '_>) -> Result<(Variable, Node), LineError> {
    let (dest, product) = binary(ops, BinaryOperator::Mul)?;
    let c = ops.src()?;
    Ok((dest, Node::binary(product, BinaryOperator::Add, c)))
}

fn call1(ops: &mut Operands<'_, '_>, name: &str) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let a = ops.src()?;
    Ok(Node::assign(dest, Node::call(name, vec![a])))
}

fn call2(ops: &mut Operands<'_, '_>, name: &str) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let a = ops.src()?;
    let b = ops.src()?;
    Ok(Node::assign(dest, Node::call(name, vec![a, b])))
}

fn lower_mov(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let src = ops.src()?;
    Ok(Node::assign(dest, src))
}

fn lower_mov_sat(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let src = ops.src()?;
    Ok(Node::assign(dest, saturate(src)))
}

fn lower_mul(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = binary(ops, BinaryOperator::Mul)?;
    Ok(Node::assign(dest, value))
}

fn lower_mul_sat(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = binary(ops, BinaryOperator::Mul)?;
    Ok(Node::assign(dest, saturate(value)))
}

fn lower_add(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = binary(ops, BinaryOperator::Add)?;
    Ok(Node::assign(dest, value))
}

fn lower_add_sat(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = binary(ops, BinaryOperator::Add)?;
    Ok(Node::assign(dest, saturate(value)))
}

fn lower_mad(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = multiply_add(ops)?;
    Ok(Node::assign(dest, value))
}

fn lower_mad_sat(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = multiply_add(ops)?;
    Ok(Node::assign(dest, saturate(value)))
}

fn lower_div(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let (dest, value) = binary(ops, BinaryOperator::Div)?;
    Ok(Node::assign(dest, value))
}

fn lower_exp(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "exp2")
}

fn lower_log(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "log2")
}

fn lower_sqrt(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "sqrt")
}

fn lower_rsq(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "rsqrt")
}

fn lower_frc(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "frac")
}

fn lower_min(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call2(ops, "min")
}

fn lower_max(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call2(ops, "max")
}

fn lower_and(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let left = Box::new(ops.src()?);
    let right = Box::new(ops.src()?);
    Ok(Node::assign(dest, Node::LogicalAnd { left, right }))
}

fn lower_or(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let left = Box::new(ops.src()?);
    let right = Box::new(ops.src()?);
    Ok(Node::assign(dest, Node::LogicalOr { left, right }))
}

fn compare(ops: &mut Operands<'_, '_>, op: CompareOp) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let a = ops.src()?;
    let b = ops.src()?;
    Ok(Node::assign(dest, Node::compare(op, a, b)))
}

fn lower_ge(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    compare(ops, CompareOp::Ge)
}

fn lower_lt(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    compare(ops, CompareOp::Lt)
}

fn lower_movc(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let cond = Box::new(ops.src()?);
    let src_true = Box::new(ops.src()?);
    let src_false = Box::new(ops.src()?);
    Ok(Node::ConditionalAssign {
        dest,
        cond,
        src_true,
        src_false,
    })
}

fn lower_dp2(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call2(ops, "dot2")
}

fn lower_dp3(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call2(ops, "dot3")
}

fn lower_dp4(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call2(ops, "dot4")
}

fn lower_discard_nz(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let condition = Box::new(ops.src()?);
    Ok(Node::IfBlock {
        condition,
        then_action: Action::Discard,
        else_action: None,
    })
}

fn lower_deriv_rtx(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddx")
}

fn lower_deriv_rty(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddy")
}

fn lower_deriv_rtx_coarse(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddx_coarse")
}

fn lower_deriv_rty_coarse(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddy_coarse")
}

fn lower_deriv_rtx_fine(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddx_fine")
}

fn lower_deriv_rty_fine(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    call1(ops, "ddy_fine")
}

/// `sample dest, location, texture, sampler`
fn lower_sample(ops: &mut Operands<'_, '_>) -> Result<Node, LineError> {
    let dest = ops.dest()?;
    let location = Box::new(ops.src()?);
    let texture = ops.resource()?;
    let sampler = Box::new(ops.src()?);
    Ok(Node::assign(
        dest,
        Node::TextureLookup {
            texture,
            sampler,
            location,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::parser::parse_instruction;

    fn sample_line(def: &OpcodeDef) -> String {
        let mut line = def.mnemonic.name().to_owned();
        for &count in def.descriptor {
            line.push('(');
            line.push_str(&vec!["float"; count].join(","));
            line.push(')');
        }
        let operands: Vec<String> = (0..def.operands).map(|i| format!("r{i}.x")).collect();
        line.push(' ');
        line.push_str(&operands.join(", "));
        line
    }

    #[test]
    fn every_row_consumes_its_registered_operand_count() {
        for def in OPCODES {
            let line = sample_line(def);
            let inst = parse_instruction(&line).unwrap_or_else(|e| panic!("{line}: {e}"));
            assert_eq!(inst.opcode, Some(def.mnemonic), "{line}");
            assert!(inst.node.is_some(), "{line}");
        }
    }

    #[test]
    fn mnemonic_names_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for def in OPCODES {
            let name = def.mnemonic.name();
            assert!(seen.insert(name), "duplicate row for {name}");
            assert_eq!(Mnemonic::from_name(name), Some(def.mnemonic));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert!(lookup("mul").is_some());
        assert!(lookup("MUL").is_none());
        assert!(lookup("mul_").is_none());
        assert!(lookup("ret").is_none());
    }

    #[test]
    fn sample_without_descriptor() {
        let node = parse_instruction("sample r0.xyzw, v1.xyxx, t0.xyzw, s0")
            .unwrap()
            .into_node()
            .unwrap();
        let Node::Assign { src, .. } = node else {
            panic!("expected assignment");
        };
        assert!(matches!(*src, Node::TextureLookup { ref texture, .. } if texture.name == "t0.xyzw"));
    }
}
