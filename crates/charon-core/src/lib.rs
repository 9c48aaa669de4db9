//! charon-core — primitives partagées de la chaîne Charon
//!
//! Fournit :
//! - `Span`, le curseur ligne/colonne copié dans chaque token et nœud d'AST
//! - `GrowBuffer<T>`, un buffer possédé à capacité explicite (croissance ×2)
//! - `bytecode` : `Chunk`, `ValueArray`, `OpCode`, assembleur et désassembleur
//! - `ChunkError` + alias `ChunkResult<T>`
//!
//! Features :
//! - `serde` : dérive `Serialize` sur `Span`

#![deny(missing_docs)]

/* ─────────────────────────── Imports ─────────────────────────── */

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Primitives bytecode (chunk, table de constantes, opcodes, asm, disasm).
pub mod bytecode;

/// Buffers possédés dont la capacité est suivie à part.
pub mod buffer;

pub use buffer::GrowBuffer;
pub use bytecode::{asm, disasm};
pub use bytecode::{Chunk, ChunkError, ChunkResult, OpCode, Value, ValueArray};

/* ─────────────────────────── Span ─────────────────────────── */

/// Curseur de position dans la source.
///
/// `line` commence à 1. `column` compte les caractères consommés sur la ligne
/// courante : un token estampillé juste après son premier caractère porte
/// donc la colonne (base 1) de ce caractère.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Span {
    /// Numéro de ligne, à partir de 1.
    pub line: u32,
    /// Colonne, remise à 0 après chaque saut de ligne.
    pub column: u32,
}

impl Default for Span {
    fn default() -> Self { Self::START }
}

impl Span {
    /// Position avant le premier caractère d'une source.
    pub const START: Self = Self { line: 1, column: 0 };

    /// Construit un span.
    pub const fn new(line: u32, column: u32) -> Self { Self { line, column } }

    /// Un caractère de plus consommé sur la ligne courante.
    pub fn advance_column(&mut self) { self.column = self.column.saturating_add(1); }

    /// Un saut de ligne a été consommé.
    pub fn advance_line(&mut self) {
        self.column = 0;
        self.line = self.line.saturating_add(1);
    }

    /// `n` caractères ont été remis en entrée. Sature à la colonne 0.
    pub fn retreat_column(&mut self, n: u32) { self.column = self.column.saturating_sub(n); }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_starts_at_line_one_column_zero() {
        assert_eq!(Span::default(), Span::new(1, 0));
    }

    #[test]
    fn span_line_break_resets_column() {
        let mut sp = Span::default();
        sp.advance_column();
        sp.advance_column();
        assert_eq!(sp, Span::new(1, 2));
        sp.advance_line();
        assert_eq!(sp, Span::new(2, 0));
        sp.advance_column();
        assert_eq!(sp.to_string(), "2:1");
    }

    #[test]
    fn span_retreat_saturates() {
        let mut sp = Span::new(3, 2);
        sp.retreat_column(1);
        assert_eq!(sp.column, 1);
        sp.retreat_column(5);
        assert_eq!(sp.column, 0);
        assert_eq!(sp.line, 3);
    }
}
