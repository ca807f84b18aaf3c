//! faxc-drv - the compiler driver: CLI parsing, phase orchestration, and
//! the `-vm`/`--emit` entry points.
//!
//! Pipeline: lex -> parse -> infer -> lower -> {interpret | emit LLVM IR}.
//! `--emit` stops the pipeline early and dumps an intermediate
//! representation instead of running the back end.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser as ClapParser, ValueEnum};
use inkwell::context::Context;
use inkwell::OptimizationLevel;
use log::{debug, info};

use faxc_lex::Lexer;
use faxc_mir::{lower_program, Interpreter};
use faxc_par::Parser as FaxParser;
use faxc_sem::infer;
use faxc_util::Handler;

/// `faxc <input path> [-o <path>] [-vm] [--emit=tokens|ast|ir|llvm-ir]`
#[derive(Debug, ClapParser)]
#[command(name = "faxc", about = "Compiler for the fax language")]
pub struct Config {
    /// Source file to compile
    pub input: PathBuf,

    /// Output path (defaults to printing to stdout for --emit, ignored
    /// under -vm)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Run the tree-walking interpreter instead of emitting LLVM IR
    #[arg(long = "vm")]
    pub vm: bool,

    /// Stop the pipeline early and dump an intermediate representation
    #[arg(long = "emit", value_enum)]
    pub emit: Option<EmitType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitType {
    Tokens,
    Ast,
    Ir,
    #[value(name = "llvm-ir")]
    LlvmIr,
}

/// One compiler invocation: owns the diagnostic handler for the run and
/// drives lex -> parse -> infer -> lower -> back end.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<()> {
        let source = fs::read_to_string(&self.config.input)
            .with_context(|| format!("reading {}", self.config.input.display()))?;

        let mut handler = Handler::new();

        debug!("lexing {}", self.config.input.display());
        let tokens: Vec<_> = Lexer::new(&source, &mut handler).collect();
        if handler.has_errors() {
            bail!(render_diagnostics(&handler));
        }

        if self.config.emit == Some(EmitType::Tokens) {
            self.write_output(&format!("{tokens:#?}"))?;
            return Ok(());
        }

        debug!("parsing {}", self.config.input.display());
        let mut parser = FaxParser::new(tokens, &mut handler);
        let nodes = parser.parse_program();
        if handler.has_errors() {
            bail!(render_diagnostics(&handler));
        }

        if self.config.emit == Some(EmitType::Ast) {
            self.write_output(&format!("{nodes:#?}"))?;
            return Ok(());
        }

        debug!("type-checking {}", self.config.input.display());
        infer(&nodes).map_err(|e| anyhow::anyhow!("{e}"))?;

        debug!("lowering to IR");
        let program = lower_program(&nodes);

        if self.config.emit == Some(EmitType::Ir) {
            self.write_output(&format!("{program:#?}"))?;
            return Ok(());
        }

        if self.config.vm {
            info!("running under the interpreter");
            let result = Interpreter::new(&program)
                .run_main()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{result:?}");
            return Ok(());
        }

        info!("emitting LLVM IR for {}", self.config.input.display());
        let context = Context::create();
        let module_name = self
            .config
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("fax_module");
        let mut backend = faxc_gen::LlvmBackend::new(
            &context,
            module_name,
            default_target_triple(),
            OptimizationLevel::Default,
        );
        backend
            .compile_program(&program)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        backend
            .verify()
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        let ir = backend.emit_llvm_ir();
        self.write_output(&ir)?;
        Ok(())
    }

    fn write_output(&self, text: &str) -> Result<()> {
        match &self.config.output {
            Some(path) => {
                fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            }
            None => println!("{text}"),
        }
        Ok(())
    }
}

fn render_diagnostics(handler: &Handler) -> String {
    handler
        .diagnostics()
        .iter()
        .map(|d| format!("{}: {}", d.level, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn default_target_triple() -> String {
    std::env::var("TARGET").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "x86_64-apple-darwin".to_string()
        } else if cfg!(target_os = "windows") {
            "x86_64-pc-windows-msvc".to_string()
        } else {
            "x86_64-unknown-linux-gnu".to_string()
        }
    })
}

/// Entry point used by `main.rs`.
pub fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();
    Session::new(config).run()
}
