//! Classifies each `jmp_if_zero` that opens a loop body as a `repeat
//! while`, `repeat with … to/down to`, or `repeat with … in list`, by
//! inspecting the instructions immediately preceding it and immediately
//! preceding its matching `end_repeat`.

use crate::lingo::bytecode::{Bytecode, LoopTag};
use crate::lingo::opcodes::OpCode;

pub fn tag_loops(bytecode: &mut Bytecode) {
    let candidates: Vec<usize> = bytecode.instructions.iter().enumerate()
        .filter(|(_, i)| i.op == Some(OpCode::JmpIfZero))
        .map(|(idx, _)| idx)
        .collect();

    for start in candidates {
        let target_pos = (bytecode.instructions[start].pos as i64 + i64::from(bytecode.instructions[start].operand)) as usize;
        let Some(end) = bytecode.index_of(target_pos) else { continue };
        if end == 0 {
            continue;
        }
        let Some(end_repeat_idx) = end.checked_sub(1) else { continue };
        if bytecode.instructions[end_repeat_idx].op != Some(OpCode::EndRepeat) {
            continue;
        }

        let tag = classify(bytecode, start, end_repeat_idx);
        bytecode.instructions[start].loop_tag = Some(tag);
        for i in start..=end_repeat_idx {
            bytecode.instructions[i].owner_loop = Some(start);
        }
        bytecode.instructions[end_repeat_idx].is_next_repeat_target = true;
    }
}

fn classify(bytecode: &Bytecode, start: usize, end_repeat_idx: usize) -> LoopTag {
    // The comparison immediately before the jmp_if_zero distinguishes a
    // counted `to`/`down to` loop from a plain `while`.
    let comparison = start.checked_sub(1).map(|i| bytecode.instructions[i].op);
    match comparison {
        Some(Some(OpCode::LtEq)) => LoopTag::RepeatWithTo,
        Some(Some(OpCode::GtEq)) => LoopTag::RepeatWithDownTo,
        _ => {
            // `repeat with x in list` ends its body with `push_int_8 1`,
            // `add`, `end_repeat`, `pop 3` — a `peek`-based count/index
            // preamble that a plain comparison does not have.
            if end_repeat_idx >= 1
                && bytecode.instructions[end_repeat_idx - 1].op == Some(OpCode::Add)
                && start >= 3
                && bytecode.instructions[start - 3..start].iter().any(|i| i.op == Some(OpCode::Peek))
            {
                LoopTag::RepeatWithIn
            } else {
                LoopTag::RepeatWhile
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lingo::bytecode::Bytecode;

    /// `repeat with i = 1 to 3 ... end repeat` with an empty body:
    /// `set i to 1 / lbl: get i; push 3; lteq; jmpifz END / push 1; get i;
    /// add; set i; endrepeat lbl / END: ret`.
    fn counted_up_loop_bytes() -> Vec<u8> {
        vec![
            0x41, 0x01,                   // 0: pushint8 1
            0x52, 0x00,                   // 2: setlocal 0
            0x4C, 0x00,                   // 4: getlocal 0   <- loop label
            0x41, 0x03,                   // 6: pushint8 3
            0x0D,                         // 8: lteq
            0xD5, 0x00, 0x00, 0x00, 0x11, // 9: jmpifz +17 -> pos 26
            0x41, 0x01,                   // 14: pushint8 1
            0x4C, 0x00,                   // 16: getlocal 0
            0x05,                         // 18: add
            0x52, 0x00,                   // 19: setlocal 0
            0xD4, 0x00, 0x00, 0x00, 0x11, // 21: endrepeat -17 -> pos 4
            0x01,                         // 26: ret (END:)
        ]
    }

    #[test]
    fn tags_a_counted_up_loop() {
        let mut bytecode = Bytecode::decode(&counted_up_loop_bytes()).unwrap();
        tag_loops(&mut bytecode);

        let jmp_idx = bytecode.index_of(9).unwrap();
        let end_repeat_idx = bytecode.index_of(21).unwrap();

        assert_eq!(bytecode.instructions[jmp_idx].loop_tag, Some(LoopTag::RepeatWithTo));
        assert_eq!(bytecode.instructions[jmp_idx].owner_loop, Some(jmp_idx));
        assert_eq!(bytecode.instructions[end_repeat_idx].owner_loop, Some(jmp_idx));
        assert!(bytecode.instructions[end_repeat_idx].is_next_repeat_target);
    }
}
