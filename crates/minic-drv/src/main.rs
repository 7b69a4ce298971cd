//! `minic` — compiles one of the built-in fixture programs to IA-32
//! assembly, or reports the diagnostics that stopped it.

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use minic_ast::Stmt;
use minic_drv::{compile, fixtures, format_diagnostic, CompileOutcome};

/// A small imperative-language compiler targeting 32-bit IA-32 assembly.
#[derive(Parser, Debug)]
#[command(name = "minic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles a built-in fixture program to IA-32 assembly", long_about = None)]
struct Cli {
    /// Which built-in program to compile
    #[arg(value_enum)]
    fixture: FixtureName,

    /// Write the assembly here instead of stdout
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FixtureName {
    AddZero,
    ConstantFold,
    UseBeforeInit,
    IfElse,
    WhileLoop,
    UndeclaredId,
    BxorNegate,
    ShortCircuit,
}

impl FixtureName {
    fn build(self) -> Stmt {
        match self {
            FixtureName::AddZero => fixtures::add_zero(),
            FixtureName::ConstantFold => fixtures::constant_fold(),
            FixtureName::UseBeforeInit => fixtures::use_before_init(),
            FixtureName::IfElse => fixtures::if_else(),
            FixtureName::WhileLoop => fixtures::while_loop(),
            FixtureName::UndeclaredId => fixtures::undeclared_id(),
            FixtureName::BxorNegate => fixtures::bxor_negate(),
            FixtureName::ShortCircuit => fixtures::short_circuit(),
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let subscriber = fmt::layer().with_target(false);
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!(fixture = ?cli.fixture, "starting compilation");
    let program = cli.fixture.build();
    match compile(&program)? {
        CompileOutcome::Assembly(asm) => {
            match cli.output {
                Some(path) => std::fs::write(&path, asm)?,
                None => print!("{asm}"),
            }
            Ok(())
        }
        CompileOutcome::Diagnostics(diags) => {
            for diag in &diags {
                eprintln!("{}", format_diagnostic(diag));
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_a_fixture_name() {
        let cli = Cli::parse_from(["minic", "add-zero"]);
        assert!(matches!(cli.fixture, FixtureName::AddZero));
    }

    #[test]
    fn cli_accepts_output_path() {
        let cli = Cli::parse_from(["minic", "while-loop", "--output", "out.s"]);
        assert_eq!(cli.output, Some(std::path::PathBuf::from("out.s")));
    }

    #[test]
    fn cli_rejects_unknown_fixture() {
        assert!(Cli::try_parse_from(["minic", "not-a-fixture"]).is_err());
    }
}
