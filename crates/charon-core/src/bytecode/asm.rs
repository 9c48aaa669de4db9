//! Mini assembleur qui alimente le désassembleur depuis la ligne de commande.
//!
//! Une instruction par ligne :
//!
//! ```text
//! ; commentaire
//! CONSTANT 1.5
//! RETURN
//! ```
//!
//! Le préfixe `OP_` est accepté ; la casse des mnémoniques est ignorée.

use crate::bytecode::chunk::{Chunk, ChunkError, ChunkResult, OpCode};

/// Assemble `source` dans un nouveau [`Chunk`].
pub fn assemble(source: &str) -> ChunkResult<Chunk> {
    let mut chunk = Chunk::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw_line.split(';').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let mut parts = text.split_whitespace();
        let mnemonic = parts.next().unwrap_or_default().to_ascii_uppercase();
        let operand = parts.next();
        if parts.next().is_some() {
            return Err(asm_error(line, "too many operands"));
        }

        match (mnemonic.strip_prefix("OP_").unwrap_or(&mnemonic), operand) {
            ("RETURN", None) => {
                chunk.write_op(OpCode::Return);
            }
            ("CONSTANT", Some(raw)) => {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| asm_error(line, format!("`{raw}` is not a number")))?;
                chunk.write_constant(value)?;
            }
            ("RETURN", Some(_)) => return Err(asm_error(line, "RETURN takes no operand")),
            ("CONSTANT", None) => return Err(asm_error(line, "CONSTANT needs a value")),
            (other, _) => return Err(asm_error(line, format!("unknown instruction `{other}`"))),
        }
    }

    Ok(chunk)
}

fn asm_error(line: usize, message: impl Into<String>) -> ChunkError {
    ChunkError::Asm { line, message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_listing() {
        let chunk = assemble("; demo\nCONSTANT 1.5\n  op_constant 2 ; trailing\n\nRETURN\n").unwrap();
        assert_eq!(chunk.code(), &[1, 0, 1, 1, 0]);
        assert_eq!(chunk.constants().as_slice(), &[1.5, 2.0]);
    }

    #[test]
    fn reports_line_of_bad_instruction() {
        let err = assemble("RETURN\nJUMP 3\n").unwrap_err();
        assert_eq!(err, ChunkError::Asm { line: 2, message: "unknown instruction `JUMP`".into() });
    }

    #[test]
    fn operand_checks() {
        assert!(matches!(assemble("CONSTANT"), Err(ChunkError::Asm { line: 1, .. })));
        assert!(matches!(assemble("CONSTANT x"), Err(ChunkError::Asm { line: 1, .. })));
        assert!(matches!(assemble("RETURN 1"), Err(ChunkError::Asm { line: 1, .. })));
        assert!(matches!(assemble("CONSTANT 1 2"), Err(ChunkError::Asm { line: 1, .. })));
    }
}
