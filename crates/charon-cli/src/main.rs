//! `charon` — CLI du front end Charon
//!
//! Parsing d'arguments, initialisation (logger, couleur), puis délégation à
//! `charon_cli` (lib).

#![forbid(unsafe_code)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use charon_cli as cli;

// ──────────────────────────── CLI (clap) ────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "charon", version, about = "Charon front end: tokens, declarations, bytecode listings", long_about = None)]
struct Opt {
    /// Augmente la verbosité (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux (erreurs uniquement)
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true)]
    quiet: bool,

    /// Couleur des statuts sur stderr
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lister les tokens d'une source
    Tokens {
        /// Fichier source (ou - pour stdin)
        input: Option<PathBuf>,
        /// Fichier de sortie (stdout si omis)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Garder les tokens d'espacement
        #[arg(long = "keep-whitespace")]
        keep_whitespace: bool,
        /// Traiter la tabulation comme un saut de ligne
        #[arg(long = "tab-newline")]
        tab_newline: bool,
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Parser une source et lister ses déclarations
    Parse {
        /// Fichier source (ou - pour stdin)
        input: Option<PathBuf>,
        /// Fichier de sortie (stdout si omis)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// S'arrêter à la première instruction non reconnue
        #[arg(long = "fail-fast")]
        fail_fast: bool,
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Assembler un listing texte puis le désassembler
    Disasm {
        /// Listing (ou - pour stdin)
        input: Option<PathBuf>,
        /// Fichier de sortie (stdout si omis)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Nom affiché dans l'en-tête
        #[arg(long, default_value = "chunk")]
        name: String,
    },
}

// ──────────────────────────── Logger / couleur ────────────────────────────

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_color(choice: ColorChoice) {
    #[cfg(feature = "color")]
    {
        match choice {
            ColorChoice::Auto => {}
            ColorChoice::Always => owo_colors::set_override(true),
            ColorChoice::Never => owo_colors::set_override(false),
        }
    }
    #[cfg(not(feature = "color"))]
    {
        let _ = choice;
    }
}

// ──────────────────────────── main ────────────────────────────

fn main() -> ExitCode {
    match real_main() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<i32> {
    let opt = Opt::parse();

    init_color(opt.color);
    cli::init_logger(log_level(opt.verbose, opt.quiet));

    let command = match opt.cmd {
        Command::Tokens { input, output, keep_whitespace, tab_newline, json } => {
            cli::Command::Tokens(cli::TokensTask {
                input: cli::Input::from_arg(input),
                output: cli::Output::from_arg(output),
                keep_whitespace,
                tab_newline,
                json,
            })
        }
        Command::Parse { input, output, fail_fast, json } => cli::Command::Parse(cli::ParseTask {
            input: cli::Input::from_arg(input),
            output: cli::Output::from_arg(output),
            fail_fast,
            json,
        }),
        Command::Disasm { input, output, name } => cli::Command::Disasm(cli::DisasmTask {
            input: cli::Input::from_arg(input),
            output: cli::Output::from_arg(output),
            name,
        }),
    };

    cli::execute(command).context("échec d'exécution de la commande")
}
