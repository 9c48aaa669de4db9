//! Charon AST (partiel)
//!
//! Nœuds produits par `charon-parser`, un par instruction. Seules les
//! déclarations de variables ont une règle de parsing ; les autres [`NodeKind`]
//! sont réservés à la grammaire des expressions et des fonctions.
//!
//! # Features
//! - `serde` : dérive `Serialize` sur tous les nœuds
//!
//! # Exemple
//! ```rust
//! use charon_ast::{AstNode, NodeBody, NodeKind, Var, VarType};
//! use charon_core::Span;
//!
//! let node = AstNode::variable(
//!     Span::new(1, 1),
//!     Var { variable_type: VarType::Mutable, identifier: "x".into(), value: Vec::new() },
//! );
//! assert_eq!(node.node_type, NodeKind::Variable);
//! assert_eq!(node.as_var().map(|v| v.identifier.as_str()), Some("x"));
//! ```

#![deny(missing_docs)]

use core::fmt;

use charon_core::Span;
use charon_lexer::{TokenEntry, TokenKind};

#[cfg(feature = "serde")]
use serde::Serialize;

/* ─────────────────────────── Kinds ─────────────────────────── */

/// Catégorie d'un nœud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NodeKind {
    /// Fin de programme.
    End,
    /// Déclaration de fonction.
    Function,
    /// Expression binaire.
    BinaryExpr,
    /// Expression unaire.
    UnaryExpr,
    /// Appel de fonction.
    FnCall,
    /// Déclaration `const` / `let`.
    Variable,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::End => "end",
            NodeKind::Function => "function",
            NodeKind::BinaryExpr => "binary expression",
            NodeKind::UnaryExpr => "unary expression",
            NodeKind::FnCall => "function call",
            NodeKind::Variable => "variable",
        })
    }
}

/// Mutabilité d'une variable déclarée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum VarType {
    /// Déclarée avec `const`.
    Constant,
    /// Déclarée avec `let`.
    Mutable,
}

impl VarType {
    /// Mutabilité introduite par un mot-clé de déclaration.
    pub const fn from_keyword(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Const => Some(VarType::Constant),
            TokenKind::Let => Some(VarType::Mutable),
            _ => None,
        }
    }

    /// Mot-clé source.
    pub const fn keyword(self) -> &'static str {
        match self {
            VarType::Constant => "const",
            VarType::Mutable => "let",
        }
    }
}

/* ─────────────────────────── Payloads ─────────────────────────── */

/// Contenu d'une déclaration de variable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Var {
    /// `const` ou `let`.
    pub variable_type: VarType,
    /// Nom déclaré.
    pub identifier: String,
    /// Tokens d'initialisation non analysés, sans trivia.
    pub value: Vec<TokenEntry>,
}

/// Contenu propre à la catégorie du nœud.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NodeBody {
    /// Aucun contenu.
    #[default]
    Empty,
    /// Déclaration de variable.
    Var(Var),
    /// Suite brute de tokens.
    Tokens(Vec<TokenEntry>),
}

/* ─────────────────────────── Node ─────────────────────────── */

/// Une instruction parsée.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AstNode {
    /// Span du premier token de l'instruction.
    pub span: Span,
    /// Catégorie.
    pub node_type: NodeKind,
    /// Contenu.
    pub body: NodeBody,
}

impl AstNode {
    /// Construit un nœud.
    pub fn new(span: Span, node_type: NodeKind, body: NodeBody) -> Self { Self { span, node_type, body } }

    /// Nœud `Variable` portant `var`.
    pub fn variable(span: Span, var: Var) -> Self { Self::new(span, NodeKind::Variable, NodeBody::Var(var)) }

    /// Contenu de déclaration, si le nœud en porte un.
    pub fn as_var(&self) -> Option<&Var> {
        match &self.body {
            NodeBody::Var(v) => Some(v),
            NodeBody::Empty | NodeBody::Tokens(_) => None,
        }
    }

    /// Suite brute de tokens, si le nœud en porte une.
    pub fn as_tokens(&self) -> Option<&[TokenEntry]> {
        match &self.body {
            NodeBody::Tokens(t) => Some(t),
            NodeBody::Empty | NodeBody::Var(_) => None,
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.span, self.node_type)?;
        match &self.body {
            NodeBody::Empty => Ok(()),
            NodeBody::Var(v) => {
                write!(f, " {} {} =", v.variable_type.keyword(), v.identifier)?;
                for t in &v.value {
                    write!(f, " {}", t.text)?;
                }
                Ok(())
            }
            NodeBody::Tokens(ts) => write!(f, " ({} tokens)", ts.len()),
        }
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */
