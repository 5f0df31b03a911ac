//! Lingo bytecode opcodes and the fixed string tables used to print
//! properties and operators by name. Numeric ids and mnemonics are taken
//! verbatim from the reference decompiler so that printed text matches it
//! byte-for-byte.

/// A decoded instruction's logical opcode. Raw bytes `>= 0x40` fold down to
/// `0x40 + (raw % 0x40)` before being looked up here (see
/// [`crate::lingo::bytecode`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum OpCode {
    Ret = 0x01,
    RetFactory = 0x02,
    PushZero = 0x03,
    Mul = 0x04,
    Add = 0x05,
    Sub = 0x06,
    Div = 0x07,
    Mod = 0x08,
    Inv = 0x09,
    JoinStr = 0x0A,
    JoinPadStr = 0x0B,
    Lt = 0x0C,
    LtEq = 0x0D,
    NtEq = 0x0E,
    Eq = 0x0F,
    Gt = 0x10,
    GtEq = 0x11,
    And = 0x12,
    Or = 0x13,
    Not = 0x14,
    ContainsStr = 0x15,
    Contains0Str = 0x16,
    GetChunk = 0x17,
    HiliteChunk = 0x18,
    OntoSpr = 0x19,
    IntoSpr = 0x1A,
    GetField = 0x1B,
    StartTell = 0x1C,
    EndTell = 0x1D,
    PushList = 0x1E,
    PushPropList = 0x1F,
    Swap = 0x21,

    PushInt8 = 0x41,
    PushArgListNoRet = 0x42,
    PushArgList = 0x43,
    PushCons = 0x44,
    PushSymb = 0x45,
    PushVarRef = 0x46,
    GetGlobal = 0x49,
    GetProp = 0x4A,
    GetParam = 0x4B,
    GetLocal = 0x4C,
    SetGlobal = 0x4F,
    SetProp = 0x50,
    SetParam = 0x51,
    SetLocal = 0x52,
    Jmp = 0x53,
    EndRepeat = 0x54,
    JmpIfZero = 0x55,
    LocalCall = 0x56,
    ExtCall = 0x57,
    ObjCallV4 = 0x58,
    Put = 0x59,
    PutChunk = 0x5A,
    DeleteChunk = 0x5B,
    Get = 0x5C,
    Set = 0x5D,
    GetMovieProp = 0x5F,
    SetMovieProp = 0x60,
    GetObjProp = 0x61,
    SetObjProp = 0x62,
    TellCall = 0x63,
    Peek = 0x64,
    Pop = 0x65,
    TheBuiltin = 0x66,
    ObjCall = 0x67,
    PushChunkVarRef = 0x6D,
    PushInt16 = 0x6E,
    PushInt32 = 0x6F,
    GetChainedProp = 0x70,
    PushFloat32 = 0x71,
    GetTopLevelProp = 0x72,
    NewObj = 0x73,
}

impl OpCode {
    /// Folds a raw opcode byte to its logical value (multi-byte opcodes are
    /// packed into the high range in groups of 0x40).
    #[must_use]
    pub fn fold(raw: u8) -> u8 {
        if raw >= 0x40 { 0x40 + (raw % 0x40) } else { raw }
    }

    #[must_use]
    pub fn from_logical(value: u8) -> Option<Self> {
        Some(match value {
            0x01 => Self::Ret,
            0x02 => Self::RetFactory,
            0x03 => Self::PushZero,
            0x04 => Self::Mul,
            0x05 => Self::Add,
            0x06 => Self::Sub,
            0x07 => Self::Div,
            0x08 => Self::Mod,
            0x09 => Self::Inv,
            0x0A => Self::JoinStr,
            0x0B => Self::JoinPadStr,
            0x0C => Self::Lt,
            0x0D => Self::LtEq,
            0x0E => Self::NtEq,
            0x0F => Self::Eq,
            0x10 => Self::Gt,
            0x11 => Self::GtEq,
            0x12 => Self::And,
            0x13 => Self::Or,
            0x14 => Self::Not,
            0x15 => Self::ContainsStr,
            0x16 => Self::Contains0Str,
            0x17 => Self::GetChunk,
            0x18 => Self::HiliteChunk,
            0x19 => Self::OntoSpr,
            0x1A => Self::IntoSpr,
            0x1B => Self::GetField,
            0x1C => Self::StartTell,
            0x1D => Self::EndTell,
            0x1E => Self::PushList,
            0x1F => Self::PushPropList,
            0x21 => Self::Swap,
            0x41 => Self::PushInt8,
            0x42 => Self::PushArgListNoRet,
            0x43 => Self::PushArgList,
            0x44 => Self::PushCons,
            0x45 => Self::PushSymb,
            0x46 => Self::PushVarRef,
            0x49 => Self::GetGlobal,
            0x4A => Self::GetProp,
            0x4B => Self::GetParam,
            0x4C => Self::GetLocal,
            0x4F => Self::SetGlobal,
            0x50 => Self::SetProp,
            0x51 => Self::SetParam,
            0x52 => Self::SetLocal,
            0x53 => Self::Jmp,
            0x54 => Self::EndRepeat,
            0x55 => Self::JmpIfZero,
            0x56 => Self::LocalCall,
            0x57 => Self::ExtCall,
            0x58 => Self::ObjCallV4,
            0x59 => Self::Put,
            0x5A => Self::PutChunk,
            0x5B => Self::DeleteChunk,
            0x5C => Self::Get,
            0x5D => Self::Set,
            0x5F => Self::GetMovieProp,
            0x60 => Self::SetMovieProp,
            0x61 => Self::GetObjProp,
            0x62 => Self::SetObjProp,
            0x63 => Self::TellCall,
            0x64 => Self::Peek,
            0x65 => Self::Pop,
            0x66 => Self::TheBuiltin,
            0x67 => Self::ObjCall,
            0x6D => Self::PushChunkVarRef,
            0x6E => Self::PushInt16,
            0x6F => Self::PushInt32,
            0x70 => Self::GetChainedProp,
            0x71 => Self::PushFloat32,
            0x72 => Self::GetTopLevelProp,
            0x73 => Self::NewObj,
            _ => return None,
        })
    }

    /// The mnemonic Lingo's own disassembler prints for this opcode.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ret => "ret",
            Self::RetFactory => "retfactory",
            Self::PushZero => "pushzero",
            Self::Mul => "mul",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Inv => "inv",
            Self::JoinStr => "joinstr",
            Self::JoinPadStr => "joinpadstr",
            Self::Lt => "lt",
            Self::LtEq => "lteq",
            Self::NtEq => "nteq",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::GtEq => "gteq",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::ContainsStr => "containsstr",
            Self::Contains0Str => "contains0str",
            Self::GetChunk => "getchunk",
            Self::HiliteChunk => "hilitechunk",
            Self::OntoSpr => "ontospr",
            Self::IntoSpr => "intospr",
            Self::GetField => "getfield",
            Self::StartTell => "starttell",
            Self::EndTell => "endtell",
            Self::PushList => "pushlist",
            Self::PushPropList => "pushproplist",
            Self::Swap => "swap",
            Self::PushInt8 => "pushint8",
            Self::PushArgListNoRet => "pusharglistnoret",
            Self::PushArgList => "pusharglist",
            Self::PushCons => "pushcons",
            Self::PushSymb => "pushsymb",
            Self::PushVarRef => "pushvarref",
            Self::GetGlobal => "getglobal",
            Self::GetProp => "getprop",
            Self::GetParam => "getparam",
            Self::GetLocal => "getlocal",
            Self::SetGlobal => "setglobal",
            Self::SetProp => "setprop",
            Self::SetParam => "setparam",
            Self::SetLocal => "setlocal",
            Self::Jmp => "jmp",
            Self::EndRepeat => "endrepeat",
            Self::JmpIfZero => "jmpifz",
            Self::LocalCall => "localcall",
            Self::ExtCall => "extcall",
            Self::ObjCallV4 => "objcallv4",
            Self::Put => "put",
            Self::PutChunk => "putchunk",
            Self::DeleteChunk => "deletechunk",
            Self::Get => "get",
            Self::Set => "set",
            Self::GetMovieProp => "getmovieprop",
            Self::SetMovieProp => "setmovieprop",
            Self::GetObjProp => "getobjprop",
            Self::SetObjProp => "setobjprop",
            Self::TellCall => "tellcall",
            Self::Peek => "peek",
            Self::Pop => "pop",
            Self::TheBuiltin => "thebuiltin",
            Self::ObjCall => "objcall",
            Self::PushChunkVarRef => "pushchunkvarref",
            Self::PushInt16 => "pushint16",
            Self::PushInt32 => "pushint32",
            Self::PushFloat32 => "pushfloat32",
            Self::GetChainedProp => "getchainedprop",
            Self::GetTopLevelProp => "gettoplevelprop",
            Self::NewObj => "newobj",
        }
    }
}

/// Operator precedence; lower binds tighter. Used by the printer to decide
/// parenthesization.
#[must_use]
pub fn binary_op_precedence(op: OpCode) -> u8 {
    match op {
        OpCode::Mul | OpCode::Div | OpCode::Mod => 1,
        OpCode::Add | OpCode::Sub => 2,
        OpCode::Lt | OpCode::LtEq | OpCode::NtEq | OpCode::Eq | OpCode::Gt | OpCode::GtEq => 3,
        OpCode::And => 4,
        OpCode::Or => 5,
        _ => 0,
    }
}

/// The printable operator for a binary-op opcode.
#[must_use]
pub fn binary_op_name(op: OpCode) -> &'static str {
    match op {
        OpCode::Mul => "*",
        OpCode::Add => "+",
        OpCode::Sub => "-",
        OpCode::Div => "/",
        OpCode::Mod => "mod",
        OpCode::Lt => "<",
        OpCode::LtEq => "<=",
        OpCode::NtEq => "<>",
        OpCode::Eq => "=",
        OpCode::Gt => ">",
        OpCode::GtEq => ">=",
        OpCode::And => "and",
        OpCode::Or => "or",
        OpCode::ContainsStr => "contains",
        OpCode::Contains0Str => "starts",
        OpCode::JoinStr => "&",
        OpCode::JoinPadStr => "&&",
        _ => "?",
    }
}

/// Chunk-reference type names (`char`/`word`/`item`/`line`), indexed by the
/// `ChunkExprType` discriminant 1..=4.
#[must_use]
pub fn chunk_type_name(kind: u8) -> &'static str {
    match kind {
        1 => "char",
        2 => "word",
        3 => "item",
        4 => "line",
        _ => "chunk",
    }
}

/// `the <name>` movie-property names, indexed by the property id used by
/// `getmovieprop`/`setmovieprop`.
#[must_use]
pub fn movie_property_name(id: u8) -> &'static str {
    match id {
        0x01 => "floatPrecision",
        0x02 => "mouseDownScript",
        0x03 => "mouseUpScript",
        0x04 => "keyDownScript",
        0x05 => "keyUpScript",
        0x06 => "timeoutScript",
        0x07 => "short time",
        0x08 => "abbr time",
        0x09 => "long time",
        0x0A => "short date",
        0x0B => "abbr date",
        0x0C => "long date",
        _ => "UNKNOWN_MOVIE_PROPERTY",
    }
}

/// `when <event> ... end <event>` names, indexed by `WhenStmtNode`'s event
/// id.
#[must_use]
pub fn when_event_name(id: u8) -> &'static str {
    match id {
        1 => "mouseDown",
        2 => "mouseUp",
        3 => "keyDown",
        4 => "keyUp",
        5 => "timeOut",
        _ => "UNKNOWN_EVENT",
    }
}

/// `the <name> of menu N` names.
#[must_use]
pub fn menu_property_name(id: u8) -> &'static str {
    match id {
        1 => "name",
        2 => "number of menuItems",
        _ => "UNKNOWN_MENU_PROPERTY",
    }
}

/// `the <name> of menuItem I of menu N` names.
#[must_use]
pub fn menu_item_property_name(id: u8) -> &'static str {
    match id {
        1 => "name",
        2 => "checkMark",
        3 => "enabled",
        4 => "script",
        _ => "UNKNOWN_MENU_ITEM_PROPERTY",
    }
}

/// `the <name> of sound N` names.
#[must_use]
pub fn sound_property_name(id: u8) -> &'static str {
    match id {
        1 => "volume",
        _ => "UNKNOWN_SOUND_PROPERTY",
    }
}

/// `the <name> of sprite N` names (group 1, ids 0x01-0x2a per the original
/// table).
#[must_use]
pub fn sprite_property_name(id: u8) -> &'static str {
    match id {
        0x01 => "type",
        0x02 => "backColor",
        0x03 => "bottom",
        0x04 => "castNum",
        0x05 => "constraint",
        0x06 => "cursor",
        0x07 => "foreColor",
        0x08 => "height",
        0x09 => "immediate",
        0x0A => "ink",
        0x0B => "left",
        0x0C => "lineSize",
        0x0D => "locH",
        0x0E => "locV",
        0x0F => "movieRate",
        0x10 => "movieTime",
        0x11 => "pattern",
        0x12 => "puppet",
        0x13 => "right",
        0x14 => "startTime",
        0x15 => "stopTime",
        0x16 => "stretch",
        0x17 => "top",
        0x18 => "trails",
        0x19 => "visible",
        0x1A => "volume",
        0x1B => "width",
        0x1C => "blend",
        0x1D => "scriptNum",
        0x1E => "moveableSprite",
        0x1F => "editableText",
        0x20 => "scoreColor",
        0x21 => "loc",
        0x22 => "rect",
        0x23 => "memberNum",
        0x24 => "castLibNum",
        0x25 => "member",
        0x26 => "scriptInstanceList",
        0x27 => "currentSpriteNum",
        0x28 => "mostRecentCuePoint",
        0x29 => "tweened",
        0x2A => "name",
        _ => "UNKNOWN_SPRITE_PROPERTY",
    }
}

/// `the <name>` animation-scope property names (group 1).
#[must_use]
pub fn animation_property_name(id: u8) -> &'static str {
    match id {
        0x01 => "beepOn",
        0x02 => "buttonStyle",
        0x03 => "centerStage",
        0x04 => "checkBoxAccess",
        0x05 => "checkboxType",
        0x06 => "colorDepth",
        0x07 => "colorQD",
        0x08 => "exitLock",
        0x09 => "fixStageSize",
        0x0A => "fullColorPermit",
        0x0B => "imageDirect",
        0x0C => "doubleClick",
        0x0D => "key",
        0x0E => "lastClick",
        0x0F => "lastEvent",
        0x10 => "keyCode",
        0x11 => "lastKey",
        0x12 => "lastRoll",
        0x13 => "timeoutLapsed",
        0x14 => "multiSound",
        0x15 => "pauseState",
        0x16 => "quickTimePresent",
        0x17 => "selEnd",
        0x18 => "selStart",
        0x19 => "soundEnabled",
        0x1A => "soundLevel",
        0x1B => "stageColor",
        0x1C => "switchColorDepth",
        0x1D => "timeoutKeyDown",
        0x1E => "timeoutLength",
        0x1F => "timeoutMouse",
        0x20 => "timeoutPlay",
        0x21 => "timer",
        0x22 => "preLoadEventAbort",
        0x23 => "videoForWindowsPresent",
        0x24 => "netPresent",
        0x25 => "safePlayer",
        0x26 => "soundKeepDevice",
        0x27 => "soundMixMedia",
        0x28 => "trace",
        _ => "UNKNOWN_ANIMATION_PROPERTY",
    }
}

/// `the <name>` animation-scope property names (group 2 — movie-wide counts
/// and the castLib-qualified "number of castMembers" form).
#[must_use]
pub fn animation2_property_name(id: u8) -> &'static str {
    match id {
        0x01 => "perFrameHook",
        0x02 => "number of castMembers",
        0x03 => "number of menus",
        0x04 => "number of castLibs",
        0x05 => "number of xtras",
        _ => "UNKNOWN_ANIMATION2_PROPERTY",
    }
}

/// `the <name> of member M` names.
#[must_use]
pub fn member_property_name(id: u8) -> &'static str {
    match id {
        0x01 => "name",
        0x02 => "text",
        0x03 => "textStyle",
        0x04 => "textFont",
        0x05 => "textHeight",
        0x06 => "textAlign",
        0x07 => "textSize",
        0x08 => "picture",
        0x09 => "hilite",
        0x0A => "number",
        0x0B => "size",
        0x0C => "loop",
        0x0D => "duration",
        0x0E => "controller",
        0x0F => "directToStage",
        0x10 => "sound",
        0x11 => "foreColor",
        0x12 => "backColor",
        _ => "UNKNOWN_MEMBER_PROPERTY",
    }
}

/// `put <into|after|before>` put-type names.
#[must_use]
pub fn put_type_name(kind: u8) -> &'static str {
    match kind {
        1 => "into",
        2 => "after",
        3 => "before",
        _ => "into",
    }
}
