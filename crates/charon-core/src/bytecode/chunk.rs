//! Flux d'instructions et table de constantes d'une unité compilée.

use core::fmt;

use crate::buffer::GrowBuffer;

/// Les constantes sont pour l'instant des flottants 64 bits.
pub type Value = f64;

/// Alias de résultat pour les opérations sur un chunk.
pub type ChunkResult<T> = Result<T, ChunkError>;

/* ─────────────────────────── Opcodes ─────────────────────────── */

/// Jeu d'instructions reconnu par l'outillage du chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Quitte le chunk courant.
    Return = 0,
    /// Empile la constante `pool[opérande]` ; un octet d'opérande suit.
    Constant = 1,
}

impl OpCode {
    /// Mnémonique affiché par le désassembleur.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Return => "OP_RETURN",
            OpCode::Constant => "OP_CONSTANT",
        }
    }

    /// Nombre d'octets d'opérande après l'opcode.
    pub const fn operand_len(self) -> usize {
        match self {
            OpCode::Return => 0,
            OpCode::Constant => 1,
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self { op as u8 }
}

impl TryFrom<u8> for OpCode {
    type Error = ChunkError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(OpCode::Return),
            1 => Ok(OpCode::Constant),
            other => Err(ChunkError::InvalidOpcode(other)),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.mnemonic()) }
}

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Erreurs de construction ou de décodage d'un chunk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    /// La table de constantes dépasse l'opérande d'un octet de `OP_CONSTANT`.
    #[error("too many constants in one chunk (limit {limit})")]
    TooManyConstants {
        /// Nombre de constantes adressables par un octet d'opérande.
        limit: usize,
    },
    /// Octet qui ne désigne aucun opcode.
    #[error("invalid opcode 0x{0:02X}")]
    InvalidOpcode(u8),
    /// Entrée de l'assembleur incompréhensible.
    #[error("line {line}: {message}")]
    Asm {
        /// Ligne du listing (base 1).
        line: usize,
        /// Cause.
        message: String,
    },
}

/* ─────────────────────────── ValueArray ─────────────────────────── */

/// Table de constantes d'un chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueArray {
    values: GrowBuffer<Value>,
}

impl ValueArray {
    /// Table vide, capacité initiale par défaut.
    pub fn new() -> Self { Self::default() }

    /// Ajoute une constante et renvoie son indice.
    pub fn write(&mut self, value: Value) -> usize { self.values.write(value) }

    /// Nombre de constantes.
    pub fn len(&self) -> usize { self.values.len() }

    /// Vrai si la table est vide.
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Cases allouées.
    pub fn capacity(&self) -> usize { self.values.capacity() }

    /// Constante à l'indice `idx`.
    pub fn get(&self, idx: usize) -> Option<Value> { self.values.get(idx).copied() }

    /// Constantes vivantes dans l'ordre d'insertion.
    pub fn as_slice(&self) -> &[Value] { self.values.as_slice() }
}

/* ─────────────────────────── Chunk ─────────────────────────── */

/// Bytecode d'une unité compilée et constantes qu'il référence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    code: GrowBuffer<u8>,
    constants: ValueArray,
}

impl Chunk {
    /// Chunk vide (capacité 8 pour le code, 8 pour la table).
    pub fn new() -> Self { Self::default() }

    /// Ajoute un octet d'instruction ; renvoie son offset.
    pub fn write(&mut self, byte: u8) -> usize { self.code.write(byte) }

    /// Ajoute un opcode ; renvoie son offset.
    pub fn write_op(&mut self, op: OpCode) -> usize { self.write(op.into()) }

    /// Ajoute `value` à la table et émet `OP_CONSTANT <indice>`.
    ///
    /// Échoue sans modifier le chunk dès que 256 constantes sont stockées.
    pub fn write_constant(&mut self, value: Value) -> ChunkResult<u8> {
        let limit = usize::from(u8::MAX) + 1;
        let idx = u8::try_from(self.constants.len())
            .map_err(|_| ChunkError::TooManyConstants { limit })?;
        self.constants.write(value);
        self.write_op(OpCode::Constant);
        self.write(idx);
        Ok(idx)
    }

    /// Ajoute une constante sans émettre d'instruction ; renvoie son indice.
    pub fn add_constant(&mut self, value: Value) -> usize { self.constants.write(value) }

    /// Nombre d'octets d'instruction vivants.
    pub fn len(&self) -> usize { self.code.len() }

    /// Vrai si aucune instruction n'a été écrite.
    pub fn is_empty(&self) -> bool { self.code.is_empty() }

    /// Cases d'instruction allouées.
    pub fn capacity(&self) -> usize { self.code.capacity() }

    /// Les octets d'instruction vivants `[0, len)`.
    pub fn code(&self) -> &[u8] { self.code.as_slice() }

    /// Octet d'instruction à `offset`.
    pub fn get(&self, offset: usize) -> Option<u8> { self.code.get(offset).copied() }

    /// La table de constantes.
    pub fn constants(&self) -> &ValueArray { &self.constants }

    /// Listing texte du chunk, voir [`crate::disasm::disassemble`].
    pub fn disassemble(&self, name: &str) -> String { crate::disasm::disassemble(self, name) }
}

/* ─────────────────────────── Tests ─────────────────────────── */
