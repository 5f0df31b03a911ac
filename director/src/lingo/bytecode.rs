//! Decodes a handler's compiled bytes into a linear array of
//! [`Instruction`]s, resolving each instruction's byte position so branch
//! targets can be mapped back to array indices.

use anyhow::Result as AResult;
use byteordered::Endianness;
use std::collections::HashMap;
use std::io::Cursor;

use crate::byte_stream::ByteStream;
use crate::lingo::opcodes::OpCode;

/// What kind of loop (if any) a `jmp_if_zero` instruction starts, assigned
/// by [`crate::lingo::loop_tagger`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopTag {
    RepeatWhile,
    RepeatWithTo,
    RepeatWithDownTo,
    RepeatWithIn,
}

#[derive(Clone, Debug)]
pub struct Instruction {
    /// Offset of the raw opcode byte within the handler's compiled region.
    pub pos: usize,
    pub raw_op: u8,
    pub op: Option<OpCode>,
    pub operand: i32,
    /// Set on the `jmp_if_zero` that opens a recognized loop shape.
    pub loop_tag: Option<LoopTag>,
    /// Set on the instruction after a loop body that `jmp` targeting it
    /// should translate to `next repeat` (rather than a plain `jmp`).
    pub is_next_repeat_target: bool,
    /// Index (not byte position) of the `jmp_if_zero`/`end_repeat` pair
    /// that owns this instruction, when inside a recognized loop body.
    pub owner_loop: Option<usize>,
}

pub struct Bytecode {
    pub instructions: Vec<Instruction>,
    /// Maps a byte position to its instruction's index, for branch-target
    /// resolution.
    pub pos_to_index: HashMap<usize, usize>,
}

impl Bytecode {
    pub fn decode(bytes: &[u8]) -> AResult<Self> {
        let mut stream = ByteStream::new(Cursor::new(bytes.to_vec()), Endianness::Big);
        let mut instructions = Vec::new();
        let mut pos_to_index = HashMap::new();

        loop {
            let pos = stream.pos()? as usize;
            if pos >= bytes.len() {
                break;
            }
            let raw_op = stream.read_u8()?;
            let op = OpCode::from_logical(OpCode::fold(raw_op));

            // Only push_int_8/push_int_16 hold a signed immediate; every
            // other opcode's 1-/2-byte operand (e.g. push_cons, get_global)
            // is an unsigned index/count and must not be sign-extended.
            let operand = match raw_op {
                0x00..=0x3F => 0,
                0x40..=0x7F => {
                    if op == Some(OpCode::PushInt8) {
                        i32::from(stream.read_i8()?)
                    } else {
                        i32::from(stream.read_u8()?)
                    }
                }
                0x80..=0xBF => {
                    if op == Some(OpCode::PushInt16) {
                        i32::from(stream.read_i16()?)
                    } else {
                        i32::from(stream.read_u16()?)
                    }
                }
                _ => stream.read_i32()?,
            };

            pos_to_index.insert(pos, instructions.len());
            instructions.push(Instruction {
                pos, raw_op, op, operand,
                loop_tag: None, is_next_repeat_target: false, owner_loop: None,
            });
        }

        Ok(Self { instructions, pos_to_index })
    }

    /// Resolves a byte offset to its instruction index.
    #[must_use]
    pub fn index_of(&self, pos: usize) -> Option<usize> {
        self.pos_to_index.get(&pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_single_byte_opcode_with_no_operand() {
        let bytecode = Bytecode::decode(&[0x01]).unwrap();
        assert_eq!(bytecode.instructions.len(), 1);
        assert_eq!(bytecode.instructions[0].op, Some(OpCode::Ret));
        assert_eq!(bytecode.instructions[0].operand, 0);
    }

    #[test]
    fn decodes_a_one_byte_immediate() {
        // pushint8 raw op 0x41, signed immediate -5
        let bytecode = Bytecode::decode(&[0x41, 0xFB]).unwrap();
        assert_eq!(bytecode.instructions[0].op, Some(OpCode::PushInt8));
        assert_eq!(bytecode.instructions[0].operand, -5);
    }

    #[test]
    fn decodes_a_four_byte_immediate() {
        // jmp raw op 0xD3 folds to 0x53, 4-byte operand
        let bytecode = Bytecode::decode(&[0xD3, 0x00, 0x00, 0x00, 0x10]).unwrap();
        assert_eq!(bytecode.instructions[0].op, Some(OpCode::Jmp));
        assert_eq!(bytecode.instructions[0].operand, 16);
    }

    #[test]
    fn pos_to_index_resolves_the_second_instruction() {
        let bytecode = Bytecode::decode(&[0x01, 0x41, 0x05]).unwrap();
        assert_eq!(bytecode.index_of(1), Some(1));
    }
}
