//! Primitives bytecode : chunk, table de constantes, opcodes, et l'outillage
//! texte (assembleur, désassembleur) construit par-dessus.

/// Chunk, table de constantes et opcodes.
pub mod chunk;
/// Listing texte → chunk.
pub mod asm;
/// Chunk → listing texte.
pub mod disasm;

pub use chunk::{Chunk, ChunkError, ChunkResult, OpCode, Value, ValueArray};
