//! Désassemblage texte utilisé par la commande `charon disasm`.

use core::fmt::Write;

use crate::bytecode::chunk::{Chunk, OpCode};

/// Rend chaque instruction de `chunk` sous un en-tête `== name ==`.
///
/// ```text
/// == demo ==
/// 0000 OP_CONSTANT       0 '1.5'
/// 0002 OP_RETURN
/// ```
pub fn disassemble(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");
    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Rend l'instruction à `offset` dans `out` ; renvoie l'offset suivant.
///
/// Un octet non décodable s'affiche `<invalid opcode 0xNN>` et on avance
/// d'un octet.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");
    let Some(byte) = chunk.get(offset) else {
        let _ = writeln!(out, "<out of range>");
        return offset + 1;
    };
    match OpCode::try_from(byte) {
        Ok(op @ OpCode::Return) => simple(op, offset, out),
        Ok(op @ OpCode::Constant) => constant(chunk, op, offset, out),
        Err(_) => {
            let _ = writeln!(out, "<invalid opcode 0x{byte:02X}>");
            offset + 1
        }
    }
}

fn simple(op: OpCode, offset: usize, out: &mut String) -> usize {
    let _ = writeln!(out, "{}", op.mnemonic());
    offset + 1
}

fn constant(chunk: &Chunk, op: OpCode, offset: usize, out: &mut String) -> usize {
    let Some(idx) = chunk.get(offset + 1) else {
        let _ = writeln!(out, "{} <truncated operand>", op.mnemonic());
        return offset + 1;
    };
    match chunk.constants().get(usize::from(idx)) {
        Some(v) => {
            let _ = writeln!(out, "{:<14} {idx:4} '{v}'", op.mnemonic());
        }
        None => {
            let _ = writeln!(out, "{:<14} {idx:4} <missing constant>", op.mnemonic());
        }
    }
    offset + 1 + op.operand_len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn returns_only() {
        let mut c = Chunk::new();
        for _ in 0..4 {
            c.write_op(OpCode::Return);
        }
        assert_eq!(
            c.disassemble("chunk"),
            "== chunk ==\n0000 OP_RETURN\n0001 OP_RETURN\n0002 OP_RETURN\n0003 OP_RETURN\n"
        );
    }

    #[test]
    fn constant_shows_index_and_value() {
        let mut c = Chunk::new();
        c.write_constant(1.5).unwrap();
        c.write_op(OpCode::Return);
        let text = disassemble(&c, "demo");
        assert_eq!(text, "== demo ==\n0000 OP_CONSTANT       0 '1.5'\n0002 OP_RETURN\n");
    }

    #[test]
    fn invalid_and_truncated_bytes() {
        let mut c = Chunk::new();
        c.write(0x7F);
        c.write_op(OpCode::Constant);
        let text = disassemble(&c, "bad");
        assert_eq!(text, "== bad ==\n0000 <invalid opcode 0x7F>\n0001 OP_CONSTANT <truncated operand>\n");
    }

    #[test]
    fn dangling_constant_index() {
        let mut c = Chunk::new();
        c.write_op(OpCode::Constant);
        c.write(3);
        assert!(disassemble(&c, "x").contains("<missing constant>"));
    }
}
