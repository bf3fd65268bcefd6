use std::path::PathBuf;
use std::process::ExitCode;
use std::fs;

use clap::{Parser, ValueEnum};
use dw_lang::err::{DwErr, FullDwErr};
use dw_lang::lexer::token::TokenKind;
use dw_lang::compile;

/// Compiles a Dw file into an ESTree (JavaScript) syntax tree.
#[derive(Parser, Debug)]
#[command(name = "dwc", version, about)]
struct Args {
    /// The Dw file to compile.
    file: PathBuf,

    /// The compilation stage to print.
    #[arg(long, value_enum, default_value_t = Emit::Estree)]
    emit: Emit,

    /// Print JSON output on a single line.
    #[arg(long)]
    compact: bool,

    /// Continue to the requested stage even if there are errors.
    #[arg(long)]
    keep_going: bool
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// The tokens of the file, one per line.
    Tokens,
    /// The concrete syntax tree.
    Cst,
    /// The abstract syntax tree, as Dw source.
    Ast,
    /// The target syntax tree, as ESTree JSON.
    Estree
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let code = match fs::read_to_string(&args.file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("cannot read {}: {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let comp = compile(&code, args.file.to_string_lossy().into_owned());
    let diagnostics = comp.diagnostics(&code);
    for d in &diagnostics {
        eprintln!("{d}\n");
    }
    if !diagnostics.is_empty() && !args.keep_going {
        return ExitCode::FAILURE;
    }

    macro_rules! unwrap_or_exit {
        ($r:expr) => {
            match $r {
                Ok(t) => t,
                Err(fe) => {
                    report(&fe, &code);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    match args.emit {
        Emit::Tokens => {
            for token in comp.tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                println!("{} {token}", token.span);
            }
        },
        Emit::Cst => {
            println!("{:#?}", comp.cst);
        },
        Emit::Ast => {
            let program = unwrap_or_exit! { comp.lower() };
            print!("{program}");
        },
        Emit::Estree => {
            let program = unwrap_or_exit! { comp.transpile() };
            let json = match args.compact {
                true  => serde_json::to_string(&program),
                false => serde_json::to_string_pretty(&program),
            };

            match json {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("cannot serialize output: {e}");
                    return ExitCode::FAILURE;
                }
            }
        },
    }

    ExitCode::SUCCESS
}

fn report<E: DwErr>(err: &FullDwErr<E>, code: &str) {
    eprintln!("{}", err.full_msg(code));
}
