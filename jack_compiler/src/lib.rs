//! Compiler for the Jack class language, targeting the text form of the
//! Hack stack virtual machine.
//!
//! ```
//! let code = jack_compiler::compile_str(
//!     "class Main { function void main() { do Output.printInt(5); return; } }",
//! )
//! .unwrap();
//! assert!(code.starts_with("function Main.main 0\n"));
//! ```
pub mod compile;
pub mod config;
pub mod error;
pub mod lex;
pub mod parsing;
pub mod token_stream;
pub mod tokens;

use compile::KnownClasses;
use config::CompilerConf;
use error::CompileResult;
use smol_str::SmolStr;

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output of compiling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledClass {
    /// Name of the class as declared in the source.
    pub name: SmolStr,
    /// VM text, one instruction per line.
    pub code: String,
}

/// Compiles classes one at a time, remembering the
/// names of classes seen during the run.
pub struct Compiler {
    conf: CompilerConf,
    classes: KnownClasses,
}

impl Compiler {
    pub fn new(conf: CompilerConf) -> Self {
        let classes = KnownClasses::with_builtins(conf.builtin_classes.iter().cloned());
        Self { conf, classes }
    }

    /// Announce a class before it's compiled, so other classes
    /// can call its functions.
    pub fn declare_class(&mut self, name: impl Into<SmolStr>) {
        self.classes.declare(name);
    }

    pub fn known_classes(&self) -> &KnownClasses {
        &self.classes
    }

    /// Compile the single class contained in `source`.
    pub fn compile(&mut self, source: &str) -> CompileResult<CompiledClass> {
        // Lexical analysis
        let lexer = lex::Lexer::new(source);
        let stream = token_stream::TokenStream::new(lexer);

        // Syntactic analysis and code generation
        parsing::Parser::new(stream, &mut self.classes, &self.conf).parse_class()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConf::default())
    }
}

/// Compile one class with the default configuration.
pub fn compile_str(source: &str) -> CompileResult<String> {
    let class = Compiler::default().compile(source)?;
    Ok(class.code)
}
