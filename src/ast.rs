use crate::error::SourceLocation;
use crate::value::{Arith, Value};

/// A complete program: blocks in source order
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub blocks: Vec<Block>,
}

impl Program {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// When a block runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Once, before any record
    Begin,
    /// Once, after all records
    End,
    /// Once per record, guarded by an optional pattern
    Main,
}

/// A braced block of statements. Top-level blocks carry a kind and, for
/// MAIN blocks, an optional pattern; a bare `{ ... }` used as a statement is
/// a MAIN block without a pattern.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub pattern: Option<Expr>,
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

impl Block {
    pub fn new(kind: BlockKind, pattern: Option<Expr>, statements: Vec<Stmt>, location: SourceLocation) -> Self {
        debug_assert!(kind == BlockKind::Main || pattern.is_none());
        Self {
            kind,
            pattern,
            statements,
            location,
        }
    }
}

/// Statement types
#[derive(Debug, Clone)]
pub enum Stmt {
    /// print expr, expr, ...
    Print {
        args: Vec<Expr>,
        location: SourceLocation,
    },

    /// name op= expr
    Assign {
        name: String,
        op: AssignOp,
        value: Expr,
        location: SourceLocation,
    },

    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },

    /// C-style for loop; a missing condition is always true
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },

    Break { location: SourceLocation },

    /// ++x, --x, x++, x--
    Increment {
        name: String,
        op: IncrementOp,
        fixity: Fixity,
        location: SourceLocation,
    },

    /// Bare block used as a statement
    Block(Block),
}

/// Expression types
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value, SourceLocation),

    /// Variable reference
    Var(String, SourceLocation),

    /// Field access: $expr
    Field(Box<Expr>, SourceLocation),

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -x
    Not, // !x
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    DivAssign, // /=
    ModAssign, // %=
}

impl AssignOp {
    /// The arithmetic a compound assignment applies, `None` for plain `=`
    pub fn arith(self) -> Option<Arith> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(Arith::Add),
            AssignOp::SubAssign => Some(Arith::Sub),
            AssignOp::MulAssign => Some(Arith::Mul),
            AssignOp::DivAssign => Some(Arith::Div),
            AssignOp::ModAssign => Some(Arith::Mod),
        }
    }
}

/// Increment direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOp {
    Increment, // ++
    Decrement, // --
}

/// Whether the operator came before or after the name. Recorded only;
/// both positions mutate the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}
