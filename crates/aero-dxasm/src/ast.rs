//! Parsed form of one instruction line.
//!
//! Nodes own their children; a tree is built once per line and dropped after translation.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Immediate constant, kept as written.
    NumberLiteral(String),
    Variable(Variable),
    Negated(Box<Node>),
    BinaryOp {
        left: Box<Node>,
        op: BinaryOperator,
        right: Box<Node>,
    },
    LogicalAnd {
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalOr {
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        op: CompareOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Intrinsic or constructor call. `args` is never empty.
    Call { name: String, args: Vec<Node> },
    TextureLookup {
        texture: Variable,
        sampler: Box<Node>,
        location: Box<Node>,
    },
    Assign { dest: Variable, src: Box<Node> },
    /// `dest = cond ? src_true : src_false`
    ConditionalAssign {
        dest: Variable,
        cond: Box<Node>,
        src_true: Box<Node>,
        src_false: Box<Node>,
    },
    IfBlock {
        condition: Box<Node>,
        then_action: Action,
        else_action: Option<Action>,
    },
}

impl Node {
    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable(Variable::new(name))
    }

    pub fn number(text: impl Into<String>) -> Self {
        Node::NumberLiteral(text.into())
    }

    pub fn negated(inner: Node) -> Self {
        Node::Negated(Box::new(inner))
    }

    pub fn binary(left: Node, op: BinaryOperator, right: Node) -> Self {
        Node::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn compare(op: CompareOp, left: Node, right: Node) -> Self {
        Node::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        debug_assert!(!args.is_empty(), "calls always carry at least one argument");
        Node::Call {
            name: name.into(),
            args,
        }
    }

    pub fn assign(dest: Variable, src: Node) -> Self {
        Node::Assign {
            dest,
            src: Box::new(src),
        }
    }

    /// Variant name, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Node::NumberLiteral(_) => "NumberLiteral",
            Node::Variable(_) => "Variable",
            Node::Negated(_) => "Negated",
            Node::BinaryOp { .. } => "BinaryOp",
            Node::LogicalAnd { .. } => "LogicalAnd",
            Node::LogicalOr { .. } => "LogicalOr",
            Node::Comparison { .. } => "Comparison",
            Node::Call { .. } => "Call",
            Node::TextureLookup { .. } => "TextureLookup",
            Node::Assign { .. } => "Assign",
            Node::ConditionalAssign { .. } => "ConditionalAssign",
            Node::IfBlock { .. } => "IfBlock",
        }
    }
}

/// A register or named operand, e.g. `r0.xyzw`, `g_linear` or `cb0.light.xy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Trailing component selector, if the last dotted segment is one.
    ///
    /// Only segments of one to four letters from `xyzw` count; any other member name (for
    /// example `cb0.light`) leaves the variable without a swizzle.
    pub fn swizzle(&self) -> Option<&str> {
        let (_, last) = self.name.rsplit_once('.')?;
        is_swizzle(last).then_some(last)
    }

    /// Everything before the swizzle; the full name when there is none.
    pub fn base(&self) -> &str {
        match self.swizzle() {
            Some(swz) => &self.name[..self.name.len() - swz.len() - 1],
            None => &self.name,
        }
    }
}

impl core::fmt::Display for Variable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

pub(crate) fn is_swizzle(s: &str) -> bool {
    (1..=4).contains(&s.len()) && s.bytes().all(|b| matches!(b, b'x' | b'y' | b'z' | b'w'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Ge,
    Lt,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
        }
    }
}

/// Control action guarded by an [`Node::IfBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_register_swizzle() {
        let v = Variable::new("r0.xyzw");
        assert_eq!(v.swizzle(), Some("xyzw"));
        assert_eq!(v.base(), "r0");
    }

    #[test]
    fn member_names_are_not_swizzles() {
        let v = Variable::new("cb0.light");
        assert_eq!(v.swizzle(), None);
        assert_eq!(v.base(), "cb0.light");

        let v = Variable::new("cb0.light.xy");
        assert_eq!(v.swizzle(), Some("xy"));
        assert_eq!(v.base(), "cb0.light");

        // Five components is never a swizzle.
        assert_eq!(Variable::new("r0.xyzwx").swizzle(), None);
    }

    #[test]
    fn bare_name_has_no_swizzle() {
        let v = Variable::new("g_linear");
        assert_eq!(v.swizzle(), None);
        assert_eq!(v.base(), "g_linear");
    }
}
