//! charon-cli — bibliothèque interne du binaire `charon`
//!
//! `main.rs` lit les arguments et construit une [`Command`] ; le reste
//! (lecture des sources, front end, rendu et écriture) vit ici pour être
//! testé sans processus.
//!
//! - `tokens` : lexe une source et liste ses tokens
//! - `parse`  : lexe + parse, liste les déclarations et les diagnostics
//! - `disasm` : assemble un listing texte en chunk puis le désassemble
//!
//! Features optionnelles : `trace` (env_logger) et `color` (owo-colors).

#![deny(unused_must_use)]
#![forbid(unsafe_code)]

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    iter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use charon_core::{asm::assemble, Span};
use tempfile::NamedTempFile;
use charon_lexer::{strip_trivia, Lexer, LexerOptions};
use charon_parser::{Diagnostic, ParseOutput, Parser, ParserOptions, Severity, UnrecognizedPolicy};

#[cfg(feature = "color")]
use owo_colors::{OwoColorize, Stream, Style};

// ───────────────────────────── Types publics ─────────────────────────────

/// Une commande, déjà résolue depuis les arguments.
#[derive(Clone, Debug)]
pub enum Command {
    /// Lister les tokens d'une source.
    Tokens(TokensTask),
    /// Parser une source et lister ses déclarations.
    Parse(ParseTask),
    /// Assembler un listing et afficher son désassemblage.
    Disasm(DisasmTask),
}

/// `charon tokens`
#[derive(Clone, Debug, Default)]
pub struct TokensTask {
    /// Source.
    pub input: Input,
    /// Destination.
    pub output: Output,
    /// Garder les tokens `Whitespace`.
    pub keep_whitespace: bool,
    /// Lexer `\t` comme un saut de ligne.
    pub tab_newline: bool,
    /// JSON au lieu d'une ligne par token.
    pub json: bool,
}

/// `charon parse`
#[derive(Clone, Debug, Default)]
pub struct ParseTask {
    /// Source.
    pub input: Input,
    /// Destination.
    pub output: Output,
    /// S'arrêter à la première instruction non reconnue.
    pub fail_fast: bool,
    /// JSON au lieu d'une ligne par nœud.
    pub json: bool,
}

/// `charon disasm`
#[derive(Clone, Debug, Default)]
pub struct DisasmTask {
    /// Listing d'assemblage.
    pub input: Input,
    /// Destination.
    pub output: Output,
    /// Nom affiché dans l'en-tête.
    pub name: String,
}

/// Entrée texte : fichier ou `-` (stdin).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Input {
    /// Fichier sur disque.
    Path(PathBuf),
    /// Entrée standard.
    #[default]
    Stdin,
}

impl Input {
    /// `-` ou aucun argument : stdin.
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => Input::Path(path),
            _ => Input::Stdin,
        }
    }
}

/// Sortie texte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Output {
    /// Fichier sur disque, écrit atomiquement.
    Path(PathBuf),
    /// Sortie standard.
    #[default]
    Stdout,
}

impl Output {
    /// Aucun argument : stdout.
    pub fn from_arg(arg: Option<PathBuf>) -> Self { arg.map_or(Output::Stdout, Output::Path) }
}

/// Résultat rendu d'une commande.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Sortie principale.
    pub text: String,
    /// Diagnostics du parser, pour stderr.
    pub diagnostics: Vec<Diagnostic>,
    /// Code de sortie du processus.
    pub code: i32,
}

// ───────────────────────────── Initialisation ─────────────────────────────

/// Initialise le logger (feature `trace`). `RUST_LOG` prime sur `default_level`.
pub fn init_logger(default_level: &str) {
    #[cfg(feature = "trace")]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_secs()
            .try_init();
    }
    #[cfg(not(feature = "trace"))]
    {
        let _ = default_level;
    }
}

// ───────────────────────────── Exécution ─────────────────────────────

/// Exécute `cmd`, écrit sa sortie et renvoie le code de sortie.
pub fn execute(cmd: Command) -> Result<i32> {
    let (input, output, name) = match &cmd {
        Command::Tokens(t) => (&t.input, &t.output, "TOKENS"),
        Command::Parse(t) => (&t.input, &t.output, "PARSE"),
        Command::Disasm(t) => (&t.input, &t.output, "DISASM"),
    };
    let src = read_source(input).context("lecture de la source")?;

    let report = match &cmd {
        Command::Tokens(t) => render_tokens(&src, t)?,
        Command::Parse(t) => render_parse(&src, t)?,
        Command::Disasm(t) => render_disasm(&src, t)?,
    };

    for d in &report.diagnostics {
        status_diagnostic(&src, d);
    }
    write_output(output, &report.text)?;
    if report.code == 0 {
        status_ok(name, &describe(input));
    }
    Ok(report.code)
}

/// Lexe `src` et rend la liste des tokens.
pub fn render_tokens(src: &str, task: &TokensTask) -> Result<Report> {
    let opts = LexerOptions { tab_is_line_break: task.tab_newline };
    let mut tokens = Lexer::with_options(src, opts).run();
    if !task.keep_whitespace {
        tokens = strip_trivia(tokens);
    }
    log::info!("{} tokens", tokens.len());

    let text = if task.json {
        json_line(&tokens)?
    } else {
        tokens.iter().map(|t| format!("{t}\n")).collect()
    };
    Ok(Report { text, ..Report::default() })
}

/// Lexe et parse `src` ; code 1 si une erreur a été notée.
pub fn render_parse(src: &str, task: &ParseTask) -> Result<Report> {
    let tokens = strip_trivia(Lexer::new(src).run());
    let unrecognized = if task.fail_fast { UnrecognizedPolicy::FailFast } else { UnrecognizedPolicy::Warn };
    let ParseOutput { nodes, diagnostics } = Parser::with_options(&tokens, ParserOptions { unrecognized }).run();
    log::info!("{} nodes, {} diagnostics", nodes.len(), diagnostics.len());

    let code = i32::from(diagnostics.iter().any(|d| d.severity == Severity::Error));
    let text = if task.json {
        let diags: Vec<_> = diagnostics
            .iter()
            .map(|d| {
                let span = d.error.span();
                serde_json::json!({
                    "severity": d.severity.to_string(),
                    "line": span.line,
                    "column": span.column,
                    "message": d.error.to_string(),
                })
            })
            .collect();
        json_line(&serde_json::json!({ "nodes": nodes, "diagnostics": diags }))?
    } else {
        nodes.iter().map(|n| format!("{n}\n")).collect()
    };
    Ok(Report { text, diagnostics, code })
}

/// Assemble `src` et rend le désassemblage.
pub fn render_disasm(src: &str, task: &DisasmTask) -> Result<Report> {
    let chunk = assemble(src).context("assemblage du listing")?;
    log::info!("{} bytes, {} constants", chunk.len(), chunk.constants().len());
    Ok(Report { text: chunk.disassemble(&task.name), ..Report::default() })
}

/// Ligne de `src` désignée par `span`, puis un `^` sous sa colonne.
///
/// `None` si `src` n'a pas cette ligne.
pub fn source_excerpt(src: &str, span: Span) -> Option<String> {
    let idx = usize::try_from(span.line).ok()?.checked_sub(1)?;
    let line = src.lines().nth(idx)?;
    let col = usize::try_from(span.column).unwrap_or(usize::MAX).saturating_sub(1);
    // Les tabulations sont recopiées dans le décalage.
    let pad: String = line
        .chars()
        .chain(iter::repeat(' '))
        .take(col)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    Some(format!("{line}\n{pad}^"))
}

// ───────────────────────────── Utilitaires E/S ─────────────────────────────

fn read_source(input: &Input) -> Result<String> {
    let mut s = String::new();
    match input {
        Input::Stdin => {
            io::stdin().read_to_string(&mut s)?;
        }
        Input::Path(p) => {
            let f = File::open(p).with_context(|| format!("ouverture: {}", p.display()))?;
            BufReader::new(f).read_to_string(&mut s)?;
        }
    }
    Ok(s)
}

fn write_output(output: &Output, text: &str) -> Result<()> {
    match output {
        Output::Stdout => {
            let mut w = BufWriter::new(io::stdout().lock());
            w.write_all(text.as_bytes())?;
            w.flush()?;
        }
        Output::Path(p) => write_text_atomic(p, text).with_context(|| format!("écriture de {}", p.display()))?,
    }
    Ok(())
}

/// Le fichier temporaire est supprimé à son drop si une étape échoue.
fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        w.write_all(text.as_bytes())?;
        w.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn json_line<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut s = serde_json::to_string_pretty(value)?;
    s.push('\n');
    Ok(s)
}

fn describe(input: &Input) -> String {
    match input {
        Input::Path(p) => p.display().to_string(),
        Input::Stdin => "<stdin>".to_string(),
    }
}

// ───────────────────────────── Sorties jolies ─────────────────────────────

fn status_ok(tag: &str, msg: &str) {
    #[cfg(feature = "color")]
    {
        eprintln!("{} {}", styled(tag, Style::new().green().bold()), msg);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{tag} {msg}");
    }
}

fn status_diagnostic(src: &str, d: &Diagnostic) {
    #[cfg(feature = "color")]
    {
        let style = match d.severity {
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
        };
        eprintln!("{}: {}", styled(&d.severity.to_string(), style), d.error);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{d}");
    }
    if let Some(excerpt) = source_excerpt(src, d.error.span()) {
        eprintln!("{excerpt}");
    }
}

/// Respecte `--color` via `owo_colors::set_override`.
#[cfg(feature = "color")]
fn styled(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |t| t.style(style)).to_string()
}

// ───────────────────────────── Tests ─────────────────────────────
