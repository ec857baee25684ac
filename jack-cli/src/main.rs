//! Entrypoint for CLI
use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use jack_compiler::{
    config::CompilerConf,
    error::CompileResult,
    lex::{debug_print_lexer, Lexer},
    Compiler, IMPL_VERSION,
};
use log::{error, info, warn};

static USAGE: &str = r#"
usage: jackc CMD PATH [--conf FILE]

commands:
    compile   Compile a .jack file, or every .jack file in a directory
    tokens    Print the tokens of a .jack file

options:
    --conf    YAML compiler configuration

examples:
    jackc compile Main.jack
    jackc compile Pong/ --conf jack.yaml
    jackc tokens Main.jack
"#;

const SOURCE_EXT: &str = "jack";
const OUTPUT_EXT: &str = "vm";

fn run_compiler(path: &Path, conf: CompilerConf) -> CompileResult<()> {
    let sources = collect_sources(path)?;
    let mut compiler = Compiler::new(conf);

    // Classes of the same program may call each other in any order.
    for source in &sources {
        if let Some(stem) = file_stem(source) {
            compiler.declare_class(stem);
        }
    }

    for source in &sources {
        info!("compiling {}", source.display());

        let start = Instant::now();
        let source_code = fs::read_to_string(source)?;
        let class = match compiler.compile(&source_code) {
            Ok(class) => class,
            Err(err) => {
                error!("{}: compile error\n{err}", source.display());
                return Err(err);
            }
        };

        if file_stem(source) != Some(class.name.as_str()) {
            warn!(
                "{} declares class {}, output is named after the class",
                source.display(),
                class.name
            );
        }

        let outpath = source.with_file_name(class.name.as_str()).with_extension(OUTPUT_EXT);
        fs::write(&outpath, &class.code)?;

        info!(
            "wrote {} in {}ms",
            outpath.display(),
            start.elapsed().as_nanos() as f64 / 1000000.0
        ); // to millis
    }

    Ok(())
}

fn run_tokens(path: &Path) -> CompileResult<()> {
    let source_code = fs::read_to_string(path)?;
    debug_print_lexer(Lexer::new(source_code.as_str()));
    Ok(())
}

/// A single file, or the `.jack` files of a directory in name order.
fn collect_sources(path: &Path) -> CompileResult<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(path)? {
        let filepath = entry?.path();
        if filepath.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXT) {
            sources.push(filepath);
        }
    }
    sources.sort();

    if sources.is_empty() {
        warn!("no .{SOURCE_EXT} files in {}", path.display());
    }

    Ok(sources)
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    match parse_args() {
        Some(Cmd::Compile { path, conf }) => {
            let conf = match conf {
                Some(conf_path) => CompilerConf::from_file(conf_path)?,
                None => CompilerConf::default(),
            };
            run_compiler(Path::new(&path), conf)?
        }
        Some(Cmd::Tokens { path }) => run_tokens(Path::new(&path))?,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    }

    Ok(())
}

fn parse_args() -> Option<Cmd> {
    let mut args = env::args().skip(1);
    let cmd = args.next()?;
    let path = args.next()?;

    match cmd.as_str() {
        "compile" => {
            let conf = match args.next() {
                Some(flag) if flag == "--conf" => Some(args.next()?),
                Some(_) => return None,
                None => None,
            };
            Some(Cmd::Compile { path, conf })
        }
        "tokens" => Some(Cmd::Tokens { path }),
        _ => None,
    }
}

fn print_usage() {
    println!("Jack compiler v{IMPL_VERSION}");
    println!("{USAGE}");
}

enum Cmd {
    /// Compile file or directory
    Compile { path: String, conf: Option<String> },
    /// Dump tokens
    Tokens { path: String },
}
