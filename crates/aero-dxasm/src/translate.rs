//! AST → shading-language text.
//!
//! The destination of an assignment decides both the declared type and which source components
//! are read: its write mask is passed down (as an explicit argument, never stored) while the
//! assignment's source is lowered, and any source register selecting more components than the
//! mask writes is narrowed to the written positions.

use crate::ast::{Node, Variable};
use crate::config::TranslateOptions;
use crate::error::LineError;
use crate::mask::ComponentMask;

/// Inferred result width of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Scalar,
    Vector(u8),
}

impl ValueType {
    pub fn from_width(width: usize) -> Self {
        match width {
            0 | 1 => ValueType::Scalar,
            n => ValueType::Vector(n.min(4) as u8),
        }
    }

    pub fn width(self) -> usize {
        match self {
            ValueType::Scalar => 1,
            ValueType::Vector(n) => usize::from(n),
        }
    }

    fn wider(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.width() > a.width() { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub text: String,
    /// `None` when the width cannot be told from the operand alone (e.g. an unswizzled name).
    pub ty: Option<ValueType>,
}

impl Translated {
    fn new(text: String, ty: Option<ValueType>) -> Self {
        Self { text, ty }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> TranslateOptions {
        self.options
    }

    /// Lower a whole instruction tree to one `;`-terminated statement.
    pub fn statement(&self, node: &Node) -> Result<String, LineError> {
        let mut text = self.translate(node, None)?.text;
        text.push(';');
        Ok(text)
    }

    pub fn type_name(&self, ty: ValueType) -> String {
        let keyword = self.options.scalar.keyword();
        match ty {
            ValueType::Scalar => keyword.to_owned(),
            ValueType::Vector(n) => format!("{keyword}{n}"),
        }
    }

    /// Lower `node`, narrowing source swizzles to `mask` where one is active.
    pub fn translate(
        &self,
        node: &Node,
        mask: Option<ComponentMask>,
    ) -> Result<Translated, LineError> {
        match node {
            Node::NumberLiteral(text) => Ok(Translated::new(text.clone(), Some(ValueType::Scalar))),
            Node::Variable(var) => Ok(variable(var, mask)),
            Node::Negated(inner) => {
                let inner = self.translate(inner, mask)?;
                Ok(Translated::new(format!("-{}", inner.text), inner.ty))
            }
            Node::BinaryOp { left, op, right } => self.infix(left, op.symbol(), right, mask),
            Node::LogicalAnd { left, right } => self.infix(left, "&", right, mask),
            Node::LogicalOr { left, right } => self.infix(left, "|", right, mask),
            Node::Comparison { op, left, right } => self.infix(left, op.symbol(), right, mask),
            Node::Call { name, args } => {
                // Arguments keep their own components.
                let args = args
                    .iter()
                    .map(|arg| self.translate(arg, None))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = call_type(name, &args);
                let joined = args
                    .iter()
                    .map(|arg| arg.text.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(Translated::new(format!("{name}({joined})"), ty))
            }
            Node::TextureLookup {
                texture,
                sampler,
                location,
            } => {
                let sampler = self.translate(sampler, None)?;
                let location = self.translate(location, None)?;
                let mut text = format!(
                    "{}.Sample({}, {})",
                    texture.base(),
                    sampler.text,
                    location.text
                );
                let ty = texture.swizzle().map(|swz| {
                    text.push('.');
                    text.push_str(swz);
                    ValueType::from_width(swz.len())
                });
                Ok(Translated::new(text, ty))
            }
            Node::Assign { dest, src } => {
                let (mask, ty) = destination(dest);
                let src = self.translate(src, Some(mask))?;
                Ok(Translated::new(
                    format!("{} = {}", self.declare(dest, ty), src.text),
                    Some(ty),
                ))
            }
            Node::ConditionalAssign {
                dest,
                cond,
                src_true,
                src_false,
            } => {
                let (mask, ty) = destination(dest);
                let cond = self.translate(cond, Some(mask))?;
                let src_true = self.translate(src_true, Some(mask))?;
                let src_false = self.translate(src_false, Some(mask))?;
                Ok(Translated::new(
                    format!(
                        "{} = {} ? {} : {}",
                        self.declare(dest, ty),
                        cond.text,
                        src_true.text,
                        src_false.text
                    ),
                    Some(ty),
                ))
            }
            // TODO: lower `discard_nz` once the target's discard/`if` statement form is settled.
            Node::IfBlock { .. } => Err(LineError::UnsupportedNode {
                variant: node.variant_name(),
            }),
        }
    }

    fn infix(
        &self,
        left: &Node,
        op: &str,
        right: &Node,
        mask: Option<ComponentMask>,
    ) -> Result<Translated, LineError> {
        let left = self.translate(left, mask)?;
        let right = self.translate(right, mask)?;
        Ok(Translated::new(
            format!("{} {op} {}", left.text, right.text),
            ValueType::wider(left.ty, right.ty),
        ))
    }

    fn declare(&self, dest: &Variable, ty: ValueType) -> String {
        if self.options.declare_types {
            format!("{} {dest}", self.type_name(ty))
        } else {
            dest.to_string()
        }
    }
}

/// Write mask and declared type of an assignment target. A target without a selector writes all
/// four components.
fn destination(dest: &Variable) -> (ComponentMask, ValueType) {
    let mask = dest
        .swizzle()
        .and_then(ComponentMask::from_swizzle)
        .unwrap_or(ComponentMask::XYZW);
    (mask, ValueType::from_width(mask.count()))
}

fn variable(var: &Variable, mask: Option<ComponentMask>) -> Translated {
    let Some(swizzle) = var.swizzle() else {
        return Translated::new(var.name.clone(), None);
    };
    let swizzle = match mask {
        Some(mask) => mask.narrow(swizzle),
        None => swizzle.to_owned(),
    };
    let ty = ValueType::from_width(swizzle.len());
    Translated::new(format!("{}.{swizzle}", var.base()), Some(ty))
}

fn call_type(name: &str, args: &[Translated]) -> Option<ValueType> {
    if name == "float" {
        return Some(ValueType::Scalar);
    }
    if let Some(width) = name.strip_prefix("float").and_then(|n| n.parse::<usize>().ok()) {
        return Some(ValueType::from_width(width));
    }
    if name.starts_with("dot") {
        return Some(ValueType::Scalar);
    }
    args.iter()
        .fold(None, |acc, arg| ValueType::wider(acc, arg.ty))
}
