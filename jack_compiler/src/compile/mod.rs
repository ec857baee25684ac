//! Semantic analysis and code generation.
mod classes;
pub mod codegen;
mod ir;
mod labels;
mod symbol;

pub use classes::{ClassOrigin, KnownClasses};
pub use codegen::{CodeGen, Context};
pub use ir::{write_text, ArithOp, Instr, Segment};
pub use labels::{LabelAllocator, LabelFamily};
pub use symbol::{Scopes, StorageClass, Symbol, SymbolExists, SymbolTable};
