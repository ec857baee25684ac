use std::fmt;

use smol_str::SmolStr;

/// Stack machine instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(ArithOp),
    Label(SmolStr),
    Goto(SmolStr),
    IfGoto(SmolStr),
    /// Subroutine header with its qualified name and number of locals.
    Function(SmolStr, u16),
    /// Call a qualified subroutine with the given number of arguments.
    Call(SmolStr, u16),
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// Outputs instruction as VM text.
impl fmt::Display for Instr {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Push(segment, index)  => write!(f, "push {segment} {index}"),
            Instr::Pop(segment, index)   => write!(f, "pop {segment} {index}"),
            Instr::Arith(op)             => write!(f, "{op}"),
            Instr::Label(label)          => write!(f, "label {label}"),
            Instr::Goto(label)           => write!(f, "goto {label}"),
            Instr::IfGoto(label)         => write!(f, "if-goto {label}"),
            Instr::Function(name, local) => write!(f, "function {name} {local}"),
            Instr::Call(name, argc)      => write!(f, "call {name} {argc}"),
            Instr::Return                => write!(f, "return"),
        }
    }
}

impl fmt::Display for Segment {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local    => "local",
            Segment::Static   => "static",
            Segment::This     => "this",
            Segment::That     => "that",
            Segment::Pointer  => "pointer",
            Segment::Temp     => "temp",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ArithOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq  => "eq",
            ArithOp::Gt  => "gt",
            ArithOp::Lt  => "lt",
            ArithOp::And => "and",
            ArithOp::Or  => "or",
            ArithOp::Not => "not",
        };
        f.write_str(name)
    }
}

/// Render instructions as VM text, one instruction per line.
pub fn write_text(code: &[Instr]) -> String {
    let mut text = String::new();
    for instr in code {
        text.push_str(&instr.to_string());
        text.push('\n');
    }
    text
}
