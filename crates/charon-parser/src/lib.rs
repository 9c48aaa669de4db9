//! charon-parser — parseur du langage Charon
//!
//! Branches :
//! - `charon-lexer` pour les tokens
//! - `charon-core` pour `Span`
//! - `charon-ast` pour l'AST cible
//!
//! Grammaire (partielle):
//! ```text
//! program   := stmt* EOI
//! stmt      := decl | trivia | ";"
//! decl      := ("const" | "let") … IDENT … "=" value
//! value     := token+            (jusqu'à LNBREAK | ";" | EOI, trivia ignorées)
//! ```
//!
//! Les scanners de déclaration sautent les tokens d'autres catégories jusqu'à
//! trouver celui attendu : `let (x) = 1` déclare donc `x`. Un scanner qui
//! échoue restaure le curseur de départ.
//!
//! Le parsing ne s'interrompt jamais sur une mauvaise déclaration : l'erreur est
//! notée comme [`Diagnostic`], aucun nœud n'est émis et le parser reprend après
//! la prochaine frontière d'instruction.

#![deny(missing_docs)]

use core::fmt;

use charon_ast::{AstNode, Var, VarType};
use charon_core::Span;
use charon_lexer::{TokenEntry, TokenKind};

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Échec de parsing, limité à une instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Un scanner a atteint la fin d'entrée sans trouver `expected`.
    #[error("{span}: expected {expected}")]
    NotFound {
        /// Catégorie cherchée.
        expected: TokenKind,
        /// Position d'arrêt du scan.
        span: Span,
    },
    /// `=` n'est suivi d'aucun token de valeur.
    #[error("{span}: declaration of `{identifier}` has no value")]
    EmptyBody {
        /// Nom déclaré.
        identifier: String,
        /// Frontière d'instruction atteinte juste après `=`.
        span: Span,
    },
    /// Aucune instruction ne commence par ce type de token.
    #[error("{span}: unrecognized statement starting with {kind}")]
    Unrecognized {
        /// Catégorie du token fautif.
        kind: TokenKind,
        /// Son span.
        span: Span,
    },
}

impl ParseError {
    /// Position de l'échec.
    pub fn span(&self) -> Span {
        match self {
            ParseError::NotFound { span, .. }
            | ParseError::EmptyBody { span, .. }
            | ParseError::Unrecognized { span, .. } => *span,
        }
    }
}

/// Alias de résultat du parser.
pub type PResult<T> = Result<T, ParseError>;

/// Gravité d'un diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// L'instruction a été abandonnée.
    Error,
    /// L'instruction a été sautée sous [`UnrecognizedPolicy::Warn`].
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Un problème relevé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Gravité.
    pub severity: Severity,
    /// Cause.
    pub error: ParseError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}: {}", self.severity, self.error) }
}

/* ─────────────────────────── Options ─────────────────────────── */

/// Traitement d'une instruction qui commence par un token inattendu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnrecognizedPolicy {
    /// Noter un avertissement et passer à l'instruction suivante.
    #[default]
    Warn,
    /// Noter une erreur et arrêter le parsing.
    FailFast,
}

/// Options du parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Traitement des instructions non reconnues.
    pub unrecognized: UnrecognizedPolicy,
}

/* ─────────────────────────── Sortie ─────────────────────────── */

/// Nœuds et diagnostics d'un parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    /// Nœuds dans l'ordre source.
    pub nodes: Vec<AstNode>,
    /// Diagnostics dans l'ordre source.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Au moins un diagnostic de niveau erreur.
    pub fn has_errors(&self) -> bool { self.errors().next().is_some() }

    /// Diagnostics de niveau erreur.
    pub fn errors(&self) -> impl Iterator<Item = &ParseError> { self.with_severity(Severity::Error) }

    /// Diagnostics de niveau avertissement.
    pub fn warnings(&self) -> impl Iterator<Item = &ParseError> { self.with_severity(Severity::Warning) }

    /// Les nœuds, ou la première erreur. Les avertissements sont ignorés.
    pub fn into_result(self) -> PResult<Vec<AstNode>> {
        match self.diagnostics.into_iter().find(|d| d.severity == Severity::Error) {
            Some(d) => Err(d.error),
            None => Ok(self.nodes),
        }
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ParseError> {
        self.diagnostics.iter().filter(move |d| d.severity == severity).map(|d| &d.error)
    }
}

/* ─────────────────────────── Parser ─────────────────────────── */

/// Parser d'une tranche de tokens.
///
/// La tranche peut être passée ou non par
/// [`strip_trivia`](charon_lexer::strip_trivia) ; les trivia sont ignorées dans les deux cas.
pub struct Parser<'t> {
    tokens: &'t [TokenEntry],
    /// Indice du prochain token non lu.
    pos: usize,
    opts: ParserOptions,
    out: ParseOutput,
}

impl<'t> Parser<'t> {
    /// Parser avec les options par défaut.
    pub fn new(tokens: &'t [TokenEntry]) -> Self { Self::with_options(tokens, ParserOptions::default()) }

    /// Parser avec des options explicites.
    pub fn with_options(tokens: &'t [TokenEntry], opts: ParserOptions) -> Self {
        Self { tokens, pos: 0, opts, out: ParseOutput::default() }
    }

    /// Parse chaque instruction jusqu'à `Eoi` (ou la fin de la tranche).
    pub fn run(mut self) -> ParseOutput {
        let tokens = self.tokens;
        while let Some(tok) = tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Eoi => break,
                k if k.is_trivia() || k == TokenKind::Semi => self.pos += 1,
                TokenKind::Const | TokenKind::Let => {
                    self.pos += 1;
                    self.declaration(tok);
                }
                kind => {
                    let error = ParseError::Unrecognized { kind, span: tok.span };
                    match self.opts.unrecognized {
                        UnrecognizedPolicy::Warn => {
                            log::debug!("skipping statement: {error}");
                            self.report(Severity::Warning, error);
                            self.skip_statement();
                        }
                        UnrecognizedPolicy::FailFast => {
                            self.report(Severity::Error, error);
                            break;
                        }
                    }
                }
            }
        }

        log::debug!(
            "parsed {} nodes, {} diagnostics",
            self.out.nodes.len(),
            self.out.diagnostics.len()
        );
        self.out
    }

    /* ─────────── Déclarations ─────────── */

    /// Le curseur est juste après `keyword`.
    fn declaration(&mut self, keyword: &TokenEntry) {
        let after_keyword = self.pos;
        match self.variable(keyword) {
            Ok(node) => {
                log::debug!("{node}");
                self.out.nodes.push(node);
            }
            Err(error) => {
                log::debug!("dropping declaration at {}: {error}", keyword.span);
                self.report(Severity::Error, error);
                self.pos = after_keyword;
                self.skip_statement();
            }
        }
    }

    fn variable(&mut self, keyword: &TokenEntry) -> PResult<AstNode> {
        let variable_type = match VarType::from_keyword(keyword.kind) {
            Some(vt) => vt,
            None => return Err(ParseError::Unrecognized { kind: keyword.kind, span: keyword.span }),
        };
        let identifier = self.next_of_kind(TokenKind::Identifier)?.text.clone();
        self.next_of_kind(TokenKind::Equal)?;
        let value = match self.until_end_of_statement() {
            Some(value) => value,
            None => return Err(ParseError::EmptyBody { identifier, span: self.current_span() }),
        };
        Ok(AstNode::variable(keyword.span, Var { variable_type, identifier, value }))
    }

    /* ─────────── Scanners ─────────── */

    /// Avance jusqu'au prochain token de catégorie `kind` et le consomme.
    ///
    /// S'arrête à `Eoi` ; en cas d'échec le curseur ne bouge pas.
    fn next_of_kind(&mut self, kind: TokenKind) -> PResult<&'t TokenEntry> {
        let tokens = self.tokens;
        let checkpoint = self.pos;
        while let Some(tok) = tokens.get(self.pos) {
            if tok.kind == kind {
                self.pos += 1;
                return Ok(tok);
            }
            if tok.kind == TokenKind::Eoi {
                break;
            }
            self.pos += 1;
        }
        let span = self.current_span();
        self.pos = checkpoint;
        Err(ParseError::NotFound { expected: kind, span })
    }

    /// Collecte la fin de l'instruction, sans trivia.
    ///
    /// Le token de frontière n'est pas consommé. Renvoie `None`, curseur restauré,
    /// si seules des trivia précèdent la frontière.
    fn until_end_of_statement(&mut self) -> Option<Vec<TokenEntry>> {
        let tokens = self.tokens;
        let checkpoint = self.pos;
        let mut value = Vec::new();
        while let Some(tok) = tokens.get(self.pos) {
            if is_boundary(tok.kind) {
                break;
            }
            if !matches!(tok.kind, TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment) {
                value.push(tok.clone());
            }
            self.pos += 1;
        }
        if value.is_empty() {
            self.pos = checkpoint;
            return None;
        }
        Some(value)
    }

    /// Passe le prochain `LnBreak` / `Semi`, ou s'arrête à `Eoi`.
    fn skip_statement(&mut self) {
        let tokens = self.tokens;
        while let Some(tok) = tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Eoi => return,
                TokenKind::LnBreak | TokenKind::Semi => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /* ─────────── Utilitaires ─────────── */

    /// Span du token sous le curseur, ou du dernier token.
    fn current_span(&self) -> Span {
        self.tokens.get(self.pos).or_else(|| self.tokens.last()).map_or(Span::START, |t| t.span)
    }

    fn report(&mut self, severity: Severity, error: ParseError) {
        self.out.diagnostics.push(Diagnostic { severity, error });
    }
}

fn is_boundary(kind: TokenKind) -> bool { matches!(kind, TokenKind::LnBreak | TokenKind::Semi | TokenKind::Eoi) }

/* ─────────────────────────── API ─────────────────────────── */

/// Parse `tokens` avec les options par défaut.
pub fn parse(tokens: &[TokenEntry]) -> ParseOutput { Parser::new(tokens).run() }

/* ─────────────────────────── Tests ─────────────────────────── */
