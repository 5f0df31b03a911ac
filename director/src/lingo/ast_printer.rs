//! Renders a [`Node`] tree back into Lingo source text.
//!
//! Two surface syntaxes are supported for object access: "dot syntax"
//! (`sprite(1).locH`) used by Director 8.5 and later, and the older bracket
//! form (`the locH of sprite 1`). Which one prints is controlled by
//! [`AstPrinter::dot_syntax`]; everything else about the output is
//! identical between the two.

use crate::lingo::ast::{Node, VarKind};

pub struct AstPrinter {
    pub dot_syntax: bool,
    indent: usize,
    out: String,
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self { dot_syntax: false, indent: 0, out: String::new() }
    }
}

impl AstPrinter {
    #[must_use]
    pub fn new(dot_syntax: bool) -> Self {
        Self { dot_syntax, indent: 0, out: String::new() }
    }

    #[must_use]
    pub fn print_handler(mut self, handler: &Node) -> String {
        self.print_node(handler);
        self.out
    }

    fn push_line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn print_block(&mut self, body: &[Node]) {
        self.indent += 1;
        if body.is_empty() {
            // empty block; nothing to print
        }
        for node in body {
            self.print_node(node);
        }
        self.indent -= 1;
    }

    fn print_node(&mut self, node: &Node) {
        match node {
            Node::Handler { name, args, is_generic_event, body } => {
                if *is_generic_event {
                    self.print_block(body);
                    return;
                }
                let params = args.join(", ");
                self.push_line(&format!("on {}{}", name, if params.is_empty() { String::new() } else { format!(" {}", params) }));
                self.print_block(body);
                self.push_line("end");
            }
            Node::Factory { name, methods } => {
                self.push_line(&format!("factory {}", name));
                for m in methods {
                    self.print_node(m);
                }
            }
            Node::Assignment { var, value } => {
                self.push_line(&format!("set {} to {}", self.expr(var), self.expr(value)));
            }
            Node::Put { kind, value, target } => {
                self.push_line(&format!("put {} {} {}", self.expr(value), kind, self.expr(target)));
            }
            Node::ChunkDelete { target } => {
                self.push_line(&format!("delete {}", self.expr(target)));
            }
            Node::ExitRepeat => self.push_line("exit repeat"),
            Node::NextRepeat => self.push_line("next repeat"),
            Node::Exit => self.push_line("exit"),
            Node::Call { name, args } => {
                self.push_line(&format!("{}({})", name, self.args(args)));
            }
            Node::ObjCall { receiver, name, args } => {
                self.push_line(&self.call_expr(receiver, name, args));
            }
            Node::TellStmt { window, body } => {
                self.push_line(&format!("tell {}", self.expr(window)));
                self.print_block(body);
                self.push_line("end tell");
            }
            Node::SoundCmdStmt { name, args } => {
                self.push_line(&format!("{} {}", name, self.args(args)));
            }
            Node::If { condition, then_branch, else_branch } => {
                self.push_line(&format!("if {} then", self.expr(condition)));
                self.print_block(then_branch);
                if !else_branch.is_empty() {
                    self.push_line("else");
                    self.print_block(else_branch);
                }
                self.push_line("end if");
            }
            Node::RepeatWhile { condition, body } => {
                self.push_line(&format!("repeat while {}", self.expr(condition)));
                self.print_block(body);
                self.push_line("end repeat");
            }
            Node::RepeatWithTo { var, start, end, down, body } => {
                self.push_line(&format!(
                    "repeat with {} = {} {} {}",
                    var, self.expr(start), if *down { "down to" } else { "to" }, self.expr(end)
                ));
                self.print_block(body);
                self.push_line("end repeat");
            }
            Node::RepeatWithIn { var, list, body } => {
                self.push_line(&format!("repeat with {} in {}", var, self.expr(list)));
                self.print_block(body);
                self.push_line("end repeat");
            }
            Node::Case { subject, labels } => {
                self.push_line(&format!("case {} of", self.expr(subject)));
                self.indent += 1;
                for label in labels {
                    self.print_node(label);
                }
                self.indent -= 1;
                self.push_line("end case");
            }
            Node::CaseLabel { value, alternates, body } => {
                let mut header = self.expr(value);
                for alt in alternates {
                    header.push_str(", ");
                    header.push_str(&self.expr(alt));
                }
                self.push_line(&format!("{}:", header));
                self.print_block(body);
            }
            Node::Otherwise { body } => {
                self.push_line("otherwise:");
                self.print_block(body);
            }
            Node::When { event, body } => {
                self.push_line(&format!("when {} then", event));
                self.print_block(body);
            }
            Node::Comment(text) => self.push_line(text),
            other => {
                let text = self.expr(other);
                self.push_line(&text);
            }
        }
    }

    fn args(&mut self, args: &[Node]) -> String {
        args.iter().map(|a| self.expr(a)).collect::<Vec<_>>().join(", ")
    }

    fn call_expr(&mut self, receiver: &Node, name: &str, args: &[Node]) -> String {
        if self.dot_syntax {
            format!("{}.{}({})", self.expr(receiver), name, self.args(args))
        } else {
            let args_str = self.args(args);
            if args_str.is_empty() {
                format!("{} {} {}", name, "of", self.expr(receiver))
            } else {
                format!("{}({}) of {}", name, args_str, self.expr(receiver))
            }
        }
    }

    /// Renders `node` as an inline expression string (never indents or
    /// emits a trailing newline).
    fn expr(&mut self, node: &Node) -> String {
        match node {
            Node::Comment(text) => text.clone(),
            Node::IntLiteral(v) => v.to_string(),
            Node::FloatLiteral(v) => {
                if v.fract() == 0.0 { format!("{:.1}", v) } else { v.to_string() }
            }
            Node::StringLiteral(s) => format!("\"{}\"", s.replace('"', "\u{201d}")),
            Node::SymbolLiteral(s) => format!("#{}", s),
            Node::List(items) => format!("[{}]", self.args(items)),
            Node::PropList(pairs) => {
                let rendered: Vec<String> = pairs.iter()
                    .map(|(k, v)| format!("{}: {}", self.expr(k), self.expr(v)))
                    .collect();
                format!("[{}]", rendered.join(", "))
            }
            Node::Var { kind, name } => match kind {
                VarKind::Global => format!("global {}", name),
                _ => name.clone(),
            },
            Node::ChunkExpr { kind, first, last, of } => {
                let kind_name = crate::lingo::opcodes::chunk_type_name(*kind);
                match last {
                    Some(last) => format!("{} {} to {} of {}", kind_name, self.expr(first), self.expr(last), self.expr(of)),
                    None => format!("{} {} of {}", kind_name, self.expr(first), self.expr(of)),
                }
            }
            Node::BinaryOp { op, precedence, lhs, rhs } => {
                let lhs_str = self.paren_if_needed(lhs, *precedence);
                let rhs_str = self.paren_if_needed(rhs, *precedence);
                format!("{} {} {}", lhs_str, op, rhs_str)
            }
            Node::UnaryMinus(inner) => format!("-{}", self.expr(inner)),
            Node::Not(inner) => format!("not {}", self.expr(inner)),
            Node::MovieProp(name) => format!("the {}", name),
            Node::WhenEvent(name) => name.clone(),
            Node::MenuProp { menu, prop } => format!("the {} of menu {}", prop, self.expr(menu)),
            Node::MenuItemProp { menu, item, prop } => {
                format!("the {} of menuItem {} of menu {}", prop, self.expr(item), self.expr(menu))
            }
            Node::SoundProp { sound, prop } => format!("the {} of sound {}", prop, self.expr(sound)),
            Node::SpriteProp { sprite, prop } => {
                if self.dot_syntax {
                    format!("sprite({}).{}", self.expr(sprite), prop)
                } else {
                    format!("the {} of sprite {}", prop, self.expr(sprite))
                }
            }
            Node::AnimationProp(name) => format!("the {}", name),
            Node::MemberProp { member, prop, chunk } => {
                let base = if self.dot_syntax {
                    format!("member({}).{}", self.expr(member), prop)
                } else {
                    format!("the {} of member {}", prop, self.expr(member))
                };
                match chunk {
                    Some(chunk) => format!("{} of {}", self.expr(chunk), base),
                    None => base,
                }
            }
            Node::ObjProp { obj, prop } => {
                if self.dot_syntax {
                    format!("{}.{}", self.expr(obj), prop)
                } else {
                    format!("the {} of {}", prop, self.expr(obj))
                }
            }
            Node::ObjBracket { obj, index } => format!("{}[{}]", self.expr(obj), self.expr(index)),
            Node::ObjPropIndex { obj, prop, index } => format!("{}.{}[{}]", self.expr(obj), prop, self.expr(index)),
            Node::LastStringChunk { kind, of } => {
                format!("the last {} of {}", crate::lingo::opcodes::chunk_type_name(*kind), self.expr(of))
            }
            Node::StringChunkCount { kind, of } => {
                format!("the number of {}s in {}", crate::lingo::opcodes::chunk_type_name(*kind), self.expr(of))
            }
            Node::Call { name, args } => format!("{}({})", name, self.args(args)),
            Node::ObjCall { receiver, name, args } => self.call_expr(receiver, name, args),
            Node::NewObj { kind, args } => format!("new({}, {})", kind, self.args(args)),
            Node::Assignment { var, value } => format!("set {} to {}", self.expr(var), self.expr(value)),
            _ => String::from("<stmt>"),
        }
    }

    fn paren_if_needed(&mut self, node: &Node, outer_precedence: u8) -> String {
        let text = self.expr(node);
        if let Node::BinaryOp { precedence, .. } = node {
            if *precedence > outer_precedence {
                return format!("({})", text);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_an_assignment_with_an_arithmetic_expression() {
        let node = Node::Handler {
            name: "foo".into(),
            args: vec![],
            is_generic_event: false,
            body: vec![Node::Assignment {
                var: Box::new(Node::Var { kind: VarKind::Local, name: "x".into() }),
                value: Box::new(Node::BinaryOp {
                    op: "+",
                    precedence: 2,
                    lhs: Box::new(Node::IntLiteral(1)),
                    rhs: Box::new(Node::BinaryOp {
                        op: "*",
                        precedence: 1,
                        lhs: Box::new(Node::IntLiteral(2)),
                        rhs: Box::new(Node::IntLiteral(3)),
                    }),
                }),
            }],
        };
        let text = AstPrinter::new(false).print_handler(&node);
        assert_eq!(text, "on foo\n  set x to 1 + 2 * 3\nend\n");
    }

    #[test]
    fn parenthesizes_a_lower_precedence_subexpression() {
        let node = Node::Handler {
            name: "foo".into(),
            args: vec![],
            is_generic_event: false,
            body: vec![Node::Assignment {
                var: Box::new(Node::Var { kind: VarKind::Local, name: "x".into() }),
                value: Box::new(Node::BinaryOp {
                    op: "*",
                    precedence: 1,
                    lhs: Box::new(Node::BinaryOp {
                        op: "+",
                        precedence: 2,
                        lhs: Box::new(Node::IntLiteral(1)),
                        rhs: Box::new(Node::IntLiteral(2)),
                    }),
                    rhs: Box::new(Node::IntLiteral(3)),
                }),
            }],
        };
        let text = AstPrinter::new(false).print_handler(&node);
        assert_eq!(text, "on foo\n  set x to (1 + 2) * 3\nend\n");
    }

    #[test]
    fn dot_syntax_prints_object_property_access_with_a_dot() {
        let mut printer = AstPrinter::new(true);
        let expr = printer.expr(&Node::ObjProp {
            obj: Box::new(Node::Var { kind: VarKind::Local, name: "spr".into() }),
            prop: "locH".into(),
        });
        assert_eq!(expr, "spr.locH");
    }
}
