//! Operator tables shared by the parser and the expression arena.

use std::fmt;

/// Binary operators without an effect of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Cat,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Identity,
    NotIdentity,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Cat => "~",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Identity => "is",
            Self::NotIdentity => "!is",
        }
    }

    /// Binding strength, higher binds tighter. Shared by the parser and the printer.
    pub fn precedence(self) -> u8 {
        match self {
            Self::BitOr => Precedence::BIT_OR,
            Self::BitXor => Precedence::BIT_XOR,
            Self::BitAnd => Precedence::BIT_AND,
            Self::Eq
            | Self::Ne
            | Self::Lt
            | Self::Le
            | Self::Gt
            | Self::Ge
            | Self::Identity
            | Self::NotIdentity => Precedence::CMP,
            Self::Shl | Self::Shr | Self::UShr => Precedence::SHIFT,
            Self::Add | Self::Sub | Self::Cat => Precedence::ADD,
            Self::Mul | Self::Div | Self::Mod => Precedence::MUL,
            Self::Pow => Precedence::POW,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, Self::Pow)
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == Precedence::CMP
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Operators of `op=` compound assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Add,
    Sub,
    Cat,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    Pow,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Cat => "~=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
            Self::UShr => ">>>=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::Pow => "^^=",
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    Complement,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::Complement => "~",
        }
    }
}

/// Whether `++`/`--` was written before or after its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Postfix,
}

/// Precedence levels of the expression grammar, loosest first.
pub struct Precedence;

impl Precedence {
    pub const COMMA: u8 = 1;
    pub const ASSIGN: u8 = 2;
    pub const COND: u8 = 3;
    pub const OR_OR: u8 = 4;
    pub const AND_AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const CMP: u8 = 9;
    pub const SHIFT: u8 = 10;
    pub const ADD: u8 = 11;
    pub const MUL: u8 = 12;
    pub const POW: u8 = 13;
    pub const UNARY: u8 = 14;
    pub const POSTFIX: u8 = 15;
    pub const PRIMARY: u8 = 16;
}
