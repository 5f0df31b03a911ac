//! The handler-level AST that [`crate::lingo::ast_builder`] produces and
//! [`crate::lingo::ast_printer`] renders back to text.

/// A variable's storage class, used by `Var`/`Assignment` nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VarKind {
    Global,
    Property,
    Param,
    Local,
    TopLevel,
}

#[derive(Clone, Debug)]
pub enum Node {
    Comment(String),

    // --- literals ---
    IntLiteral(i32),
    FloatLiteral(f64),
    StringLiteral(String),
    SymbolLiteral(String),
    List(Vec<Node>),
    PropList(Vec<(Node, Node)>),

    // --- references ---
    Var { kind: VarKind, name: String },
    ChunkExpr { kind: u8, first: Box<Node>, last: Option<Box<Node>>, of: Box<Node> },

    // --- expressions ---
    BinaryOp { op: &'static str, precedence: u8, lhs: Box<Node>, rhs: Box<Node> },
    UnaryMinus(Box<Node>),
    Not(Box<Node>),
    MovieProp(String),
    WhenEvent(String),
    MenuProp { menu: Box<Node>, prop: String },
    MenuItemProp { menu: Box<Node>, item: Box<Node>, prop: String },
    SoundProp { sound: Box<Node>, prop: String },
    SpriteProp { sprite: Box<Node>, prop: String },
    AnimationProp(String),
    MemberProp { member: Box<Node>, prop: String, chunk: Option<Box<Node>> },
    ObjProp { obj: Box<Node>, prop: String },
    ObjBracket { obj: Box<Node>, index: Box<Node> },
    ObjPropIndex { obj: Box<Node>, prop: String, index: Box<Node> },
    LastStringChunk { kind: u8, of: Box<Node> },
    StringChunkCount { kind: u8, of: Box<Node> },
    Call { name: String, args: Vec<Node> },
    ObjCall { receiver: Box<Node>, name: String, args: Vec<Node> },
    NewObj { kind: String, args: Vec<Node> },

    // --- statements ---
    Assignment { var: Box<Node>, value: Box<Node> },
    Put { kind: &'static str, value: Box<Node>, target: Box<Node> },
    ChunkDelete { target: Box<Node> },
    ExitRepeat,
    NextRepeat,
    Exit,
    TellStmt { window: Box<Node>, body: Vec<Node> },
    SoundCmdStmt { name: String, args: Vec<Node> },

    If { condition: Box<Node>, then_branch: Vec<Node>, else_branch: Vec<Node> },
    RepeatWhile { condition: Box<Node>, body: Vec<Node> },
    RepeatWithTo { var: String, start: Box<Node>, end: Box<Node>, down: bool, body: Vec<Node> },
    RepeatWithIn { var: String, list: Box<Node>, body: Vec<Node> },
    CaseLabel { value: Box<Node>, alternates: Vec<Node>, body: Vec<Node> },
    Otherwise { body: Vec<Node> },
    Case { subject: Box<Node>, labels: Vec<Node> },
    When { event: String, body: Vec<Node> },

    Handler { name: String, args: Vec<String>, is_generic_event: bool, body: Vec<Node> },
    Factory { name: String, methods: Vec<Node> },
}
