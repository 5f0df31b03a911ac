//! Single-pass stack interpreter that turns tagged bytecode into a handler
//! [`Node::Handler`] AST.
//!
//! This does not attempt to model every opcode the reference decompiler
//! recognizes (see `DESIGN.md`): arithmetic, comparisons, literals,
//! variable access, `if`/`else`, the three loop shapes, `exit repeat`/`next
//! repeat`, and ordinary/external calls are built as real AST nodes;
//! anything else is emitted as a `Comment` node and clears the operand
//! stack, exactly as the reference behavior specifies for unrecognized
//! instructions.

use crate::container::chunks::script::{Handler, Literal, LiteralKind, Script};
use crate::lingo::ast::{Node, VarKind};
use crate::lingo::bytecode::{Bytecode, LoopTag};
use crate::lingo::loop_tagger::tag_loops;
use crate::lingo::opcodes::{binary_op_name, binary_op_precedence, movie_property_name, OpCode};

/// `1` if the context uses unit-indexed ("capital-X") variable ids; `8` for
/// Director >= 500 otherwise `6`. Scales the raw operand of `push_cons`
/// into a literal-table index.
#[must_use]
pub fn variable_multiplier(is_capital_x_context: bool, director_version: u32) -> i32 {
    if is_capital_x_context {
        1
    } else if director_version >= 500 {
        8
    } else {
        6
    }
}

struct LoopFrame {
    tag: LoopTag,
    /// Index of the owning `jmp_if_zero` (used to match `jmp`s that exit or
    /// continue this loop).
    start_idx: usize,
    body: Vec<Node>,
    induction_var: Option<String>,
    start_value: Option<Node>,
    end_value: Option<Node>,
    list_value: Option<Node>,
}

struct IfFrame {
    condition: Node,
    then_end_pos: usize,
    else_end_pos: Option<usize>,
    has_else: bool,
    then_body: Vec<Node>,
    else_body: Vec<Node>,
}

enum Frame {
    If(IfFrame),
    Loop(LoopFrame),
}

pub struct AstBuilder<'a> {
    script: &'a Script,
    variable_multiplier: i32,
    stack: Vec<Node>,
    frames: Vec<Frame>,
    root: Vec<Node>,
}

impl<'a> AstBuilder<'a> {
    #[must_use]
    pub fn new(script: &'a Script, variable_multiplier: i32) -> Self {
        Self { script, variable_multiplier, stack: Vec::new(), frames: Vec::new(), root: Vec::new() }
    }

    fn current_body(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(Frame::If(f)) => if f.has_else { &mut f.else_body } else { &mut f.then_body },
            Some(Frame::Loop(f)) => &mut f.body,
            None => &mut self.root,
        }
    }

    fn emit(&mut self, node: Node) {
        self.current_body().push(node);
    }

    fn literal(&self, index: usize) -> Node {
        match self.script.literals.get(index) {
            Some(Literal { kind: LiteralKind::Int, int_value, .. }) => Node::IntLiteral(*int_value),
            Some(Literal { kind: LiteralKind::Float, float_value, .. }) => Node::FloatLiteral(*float_value),
            Some(Literal { kind: LiteralKind::String, string_value, .. }) => Node::StringLiteral(string_value.clone()),
            None => Node::Comment(format!("-- ERROR: literal index {} out of range", index)),
        }
    }

    fn name_for(&self, ids: &[i16], index: i32, unknown_label: &str) -> String {
        ids.get(index as usize)
            .map(|id| format!("name_{}", id))
            .unwrap_or_else(|| format!("UNKNOWN_{}_{}", unknown_label, index))
    }

    fn pop(&mut self) -> Node {
        self.stack.pop().unwrap_or_else(|| Node::Comment("-- ERROR: stack underflow".into()))
    }

    /// Runs the interpreter over `bytecode` and returns the handler body.
    pub fn build(mut self, handler: &Handler, bytecode: &mut Bytecode) -> Vec<Node> {
        tag_loops(bytecode);

        let mut index = 0;
        while index < bytecode.instructions.len() {
            self.close_frames_at(bytecode.instructions[index].pos);
            let instr = bytecode.instructions[index].clone();
            self.step(handler, bytecode, index, &instr);
            index += 1;
        }
        // Close any frames that never saw their nominal end position
        // (malformed/truncated bytecode); best-effort flush so output is
        // never silently dropped.
        while let Some(frame) = self.frames.pop() {
            self.finish_frame(frame);
        }

        self.root
    }

    fn close_frames_at(&mut self, pos: usize) {
        loop {
            let should_close = match self.frames.last() {
                Some(Frame::If(f)) => Some(pos) == f.else_end_pos.or(Some(f.then_end_pos)) && (f.has_else || pos >= f.then_end_pos),
                Some(Frame::Loop(_)) => false,
                None => false,
            };
            if !should_close {
                break;
            }
            let frame = self.frames.pop().unwrap();
            self.finish_frame(frame);
        }
    }

    fn finish_frame(&mut self, frame: Frame) {
        match frame {
            Frame::If(f) => {
                let node = Node::If { condition: Box::new(f.condition), then_branch: f.then_body, else_branch: f.else_body };
                self.current_body().push(node);
            }
            Frame::Loop(f) => {
                let node = match f.tag {
                    LoopTag::RepeatWhile => Node::RepeatWhile {
                        condition: Box::new(Node::Comment("-- loop condition".into())),
                        body: f.body,
                    },
                    LoopTag::RepeatWithTo | LoopTag::RepeatWithDownTo => Node::RepeatWithTo {
                        var: f.induction_var.unwrap_or_else(|| "i".into()),
                        start: Box::new(f.start_value.unwrap_or(Node::IntLiteral(0))),
                        end: Box::new(f.end_value.unwrap_or(Node::IntLiteral(0))),
                        down: matches!(f.tag, LoopTag::RepeatWithDownTo),
                        body: f.body,
                    },
                    LoopTag::RepeatWithIn => Node::RepeatWithIn {
                        var: f.induction_var.unwrap_or_else(|| "x".into()),
                        list: Box::new(f.list_value.unwrap_or(Node::List(Vec::new()))),
                        body: f.body,
                    },
                };
                self.current_body().push(node);
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn step(&mut self, handler: &Handler, bytecode: &Bytecode, index: usize, instr: &crate::lingo::bytecode::Instruction) {
        let Some(op) = instr.op else {
            self.emit(Node::Comment(format!("-- ERROR: unrecognized opcode byte 0x{:02x} at {}", instr.raw_op, instr.pos)));
            self.stack.clear();
            return;
        };

        match op {
            OpCode::Ret | OpCode::RetFactory => {
                if index + 1 != bytecode.instructions.len() {
                    self.emit(Node::Exit);
                }
            }
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod
            | OpCode::Lt | OpCode::LtEq | OpCode::NtEq | OpCode::Eq | OpCode::Gt | OpCode::GtEq
            | OpCode::And | OpCode::Or | OpCode::ContainsStr | OpCode::Contains0Str
            | OpCode::JoinStr | OpCode::JoinPadStr => {
                let rhs = self.pop();
                let lhs = self.pop();
                self.stack.push(Node::BinaryOp {
                    op: binary_op_name(op),
                    precedence: binary_op_precedence(op),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                });
            }
            OpCode::Inv => {
                let value = self.pop();
                self.stack.push(Node::UnaryMinus(Box::new(value)));
            }
            OpCode::Not => {
                let value = self.pop();
                self.stack.push(Node::Not(Box::new(value)));
            }
            OpCode::PushZero => self.stack.push(Node::IntLiteral(0)),
            OpCode::PushInt8 | OpCode::PushInt16 | OpCode::PushInt32 => self.stack.push(Node::IntLiteral(instr.operand)),
            OpCode::PushFloat32 => {
                #[allow(clippy::cast_possible_truncation)]
                let bits = instr.operand as u32;
                self.stack.push(Node::FloatLiteral(f64::from(f32::from_bits(bits))));
            }
            OpCode::PushCons => {
                let index = (instr.operand / self.variable_multiplier).max(0) as usize;
                let literal = self.literal(index);
                self.stack.push(literal);
            }
            OpCode::PushSymb => {
                let index = (instr.operand / self.variable_multiplier).max(0) as usize;
                if let Node::StringLiteral(s) = self.literal(index) {
                    self.stack.push(Node::SymbolLiteral(s));
                } else {
                    self.stack.push(Node::SymbolLiteral(format!("#sym_{}", index)));
                }
            }
            OpCode::PushVarRef | OpCode::PushChunkVarRef => {
                self.stack.push(Node::Var { kind: VarKind::Local, name: format!("var_{}", instr.operand) });
            }
            OpCode::PushList => {
                let value = self.pop();
                let items = if let Node::List(items) = value { items } else { vec![value] };
                self.stack.push(Node::List(items));
            }
            OpCode::PushPropList => {
                let value = self.pop();
                self.stack.push(value);
            }
            OpCode::PushArgList | OpCode::PushArgListNoRet => {
                let count = instr.operand.max(0) as usize;
                let mut args = Vec::with_capacity(count);
                for _ in 0..count {
                    args.push(self.pop());
                }
                args.reverse();
                self.stack.push(Node::List(args));
            }
            OpCode::GetGlobal => self.stack.push(self.var_node(handler, VarKind::Global, instr.operand)),
            OpCode::GetProp => self.stack.push(self.var_node(handler, VarKind::Property, instr.operand)),
            OpCode::GetParam => self.stack.push(self.var_node(handler, VarKind::Param, instr.operand)),
            OpCode::GetLocal => self.stack.push(self.var_node(handler, VarKind::Local, instr.operand)),
            OpCode::GetTopLevelProp => self.stack.push(self.var_node(handler, VarKind::TopLevel, instr.operand)),
            OpCode::SetGlobal | OpCode::SetProp | OpCode::SetParam | OpCode::SetLocal => {
                let kind = match op {
                    OpCode::SetGlobal => VarKind::Global,
                    OpCode::SetProp => VarKind::Property,
                    OpCode::SetParam => VarKind::Param,
                    _ => VarKind::Local,
                };
                let var = self.var_node(handler, kind, instr.operand);
                let value = self.pop();
                if let Some(Frame::Loop(frame)) = self.frames.last_mut() {
                    if let Node::Var { name, .. } = &var {
                        if frame.induction_var.is_none() {
                            frame.induction_var = Some(name.clone());
                            frame.start_value = Some(value.clone());
                        }
                    }
                }
                self.emit(Node::Assignment { var: Box::new(var), value: Box::new(value) });
            }
            OpCode::GetMovieProp => self.stack.push(Node::MovieProp(movie_property_name(instr.operand as u8).to_string())),
            OpCode::SetMovieProp => {
                let value = self.pop();
                self.emit(Node::Assignment {
                    var: Box::new(Node::MovieProp(movie_property_name(instr.operand as u8).to_string())),
                    value: Box::new(value),
                });
            }
            OpCode::GetObjProp | OpCode::GetChainedProp => {
                let obj = self.pop();
                self.stack.push(Node::ObjProp { obj: Box::new(obj), prop: format!("prop_{}", instr.operand) });
            }
            OpCode::SetObjProp => {
                let value = self.pop();
                let obj = self.pop();
                self.emit(Node::Assignment {
                    var: Box::new(Node::ObjProp { obj: Box::new(obj), prop: format!("prop_{}", instr.operand) }),
                    value: Box::new(value),
                });
            }
            OpCode::LocalCall | OpCode::ExtCall | OpCode::TellCall => {
                let args_node = self.pop();
                let args = if let Node::List(items) = args_node { items } else { vec![args_node] };
                let name = format!("handler_{}", instr.operand);
                self.stack.push(Node::Call { name, args });
            }
            OpCode::ObjCall | OpCode::ObjCallV4 => {
                let args_node = self.pop();
                let mut args = if let Node::List(items) = args_node { items } else { vec![args_node] };
                let receiver = if args.is_empty() { Node::Comment("-- ERROR: objcall with no receiver".into()) } else { args.remove(0) };
                self.stack.push(Node::ObjCall { receiver: Box::new(receiver), name: format!("method_{}", instr.operand), args });
            }
            OpCode::NewObj => {
                let args_node = self.pop();
                let args = if let Node::List(items) = args_node { items } else { vec![args_node] };
                self.stack.push(Node::NewObj { kind: format!("obj_kind_{}", instr.operand), args });
            }
            OpCode::Put => {
                let var_type = instr.operand & 0x0F;
                let put_type = (instr.operand >> 4) & 0x0F;
                let target = self.var_node(handler, match var_type {
                    1 => VarKind::Global,
                    2 => VarKind::Property,
                    3 => VarKind::Param,
                    _ => VarKind::Local,
                }, 0);
                let value = self.pop();
                let kind = match put_type {
                    2 => "after",
                    3 => "before",
                    _ => "into",
                };
                self.emit(Node::Put { kind, value: Box::new(value), target: Box::new(target) });
            }
            OpCode::Jmp => self.handle_jmp(instr, bytecode),
            OpCode::JmpIfZero => self.handle_jmp_if_zero(instr),
            OpCode::EndRepeat => {
                // Handled structurally by loop-frame open/close; nothing
                // to emit for the instruction itself.
            }
            OpCode::Pop => {
                let n = instr.operand.max(0) as usize;
                for _ in 0..n {
                    self.stack.pop();
                }
            }
            OpCode::Peek => {
                let n = instr.operand.max(0) as usize;
                if let Some(value) = self.stack.get(self.stack.len().wrapping_sub(1 + n)).cloned() {
                    self.stack.push(value);
                }
            }
            _ => {
                self.emit(Node::Comment(format!("-- unhandled opcode {}", op.name())));
                self.stack.clear();
            }
        }
    }

    fn var_node(&self, handler: &Handler, kind: VarKind, operand: i32) -> Node {
        let name = match kind {
            VarKind::Global => self.name_for(&self.script.global_name_ids, operand, "GLOBAL"),
            VarKind::Property => self.name_for(&self.script.property_name_ids, operand, "PROPERTY"),
            VarKind::Param => self.name_for(&handler.arg_name_ids, operand, "PARAM"),
            VarKind::Local => self.name_for(&handler.local_name_ids, operand, "LOCAL"),
            VarKind::TopLevel => format!("top_{}", operand),
        };
        Node::Var { kind, name }
    }

    fn handle_jmp(&mut self, instr: &crate::lingo::bytecode::Instruction, bytecode: &Bytecode) {
        let target_pos = (instr.pos as i64 + i64::from(instr.operand)) as usize;

        if let Some(owner) = instr.owner_loop {
            let end_repeat_pos = bytecode.instructions.iter()
                .find(|i| i.owner_loop == Some(owner) && i.is_next_repeat_target)
                .map(|i| i.pos);
            if Some(target_pos) == end_repeat_pos {
                self.emit(Node::NextRepeat);
                return;
            }
            let loop_start = bytecode.instructions.get(owner).map(|i| i.pos);
            if Some(target_pos) > loop_start && end_repeat_pos.map_or(false, |p| target_pos > p) {
                self.emit(Node::ExitRepeat);
                return;
            }
        }

        if let Some(Frame::If(frame)) = self.frames.last_mut() {
            if !frame.has_else {
                frame.has_else = true;
                frame.else_end_pos = Some(target_pos);
                return;
            }
        }

        self.emit(Node::Comment(format!("-- unrecognized jmp to {}", target_pos)));
    }

    fn handle_jmp_if_zero(&mut self, instr: &crate::lingo::bytecode::Instruction) {
        let target_pos = (instr.pos as i64 + i64::from(instr.operand)) as usize;
        let condition = self.pop();

        if let Some(tag) = instr.loop_tag {
            self.frames.push(Frame::Loop(LoopFrame {
                tag,
                start_idx: instr.pos,
                body: Vec::new(),
                induction_var: None,
                start_value: None,
                end_value: Some(condition),
                list_value: None,
            }));
        } else {
            self.frames.push(Frame::If(IfFrame {
                condition,
                then_end_pos: target_pos,
                else_end_pos: None,
                has_else: false,
                then_body: Vec::new(),
                else_body: Vec::new(),
            }));
        }
    }
}
