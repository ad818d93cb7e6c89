use std::fmt::Display;

use crate::symtab::Slot;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_punct(punct: &str) -> Option<Self> {
        match punct {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            _ => None,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "Add"),
            BinaryOp::Sub => write!(f, "Sub"),
            BinaryOp::Mul => write!(f, "Mul"),
            BinaryOp::Div => write!(f, "Div"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A declared variable, read through its storage slot.
    Var(Slot),
    /// A compiler-introduced temporary, written exactly once.
    Temp(Slot),
    IntLit(i64),
    LongLit(i64),
    FloatLit(f64),
}

impl ExprKind {
    pub fn typed(self, ty: Type) -> Expr {
        Expr { kind: self, ty }
    }
}

/// The synthesized attribute for every parsed subtree: what the value is and
/// which numeric type it carries. Constructed values are always typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

/// The operand representation shared by every emitter call: the storage slot
/// for variables and temporaries, the textual value for literals.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Var(slot) => write!(f, "{slot}"),
            ExprKind::Temp(slot) => write!(f, "{slot}"),
            ExprKind::IntLit(value) => write!(f, "{value}"),
            ExprKind::LongLit(value) => write!(f, "{value}"),
            ExprKind::FloatLit(value) => write!(f, "{value}"),
        }
    }
}
