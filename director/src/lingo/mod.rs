//! Lingo bytecode decompilation: decode -> tag loops -> build AST -> print.

pub mod ast;
pub mod ast_builder;
pub mod ast_printer;
pub mod bytecode;
pub mod loop_tagger;
pub mod opcodes;

use anyhow::Result as AResult;

use crate::container::chunks::script::{Handler, Script};
use ast::Node;
use ast_builder::{variable_multiplier, AstBuilder};
use ast_printer::AstPrinter;
use bytecode::Bytecode;

/// Decompiles a single handler's compiled bytecode into its AST, named and
/// scoped against `script`'s name-id tables.
pub fn decompile_handler(
    script: &Script,
    handler: &Handler,
    handler_name: &str,
    director_version: u32,
    is_capital_x_context: bool,
) -> AResult<Node> {
    let mut bytecode = Bytecode::decode(&handler.bytecode)?;
    let multiplier = variable_multiplier(is_capital_x_context, director_version);
    let builder = AstBuilder::new(script, multiplier);
    let body = builder.build(handler, &mut bytecode);

    let args = handler.arg_name_ids.iter().map(|id| format!("name_{}", id)).collect();
    Ok(Node::Handler {
        name: handler_name.to_string(),
        args,
        is_generic_event: handler.is_generic_event,
        body,
    })
}

/// Decompiles every handler in `script` and prints each to Lingo source
/// text, in declaration order.
pub fn decompile_script(script: &Script, director_version: u32, dot_syntax: bool) -> AResult<Vec<String>> {
    let mut out = Vec::with_capacity(script.handlers.len());
    for (i, handler) in script.handlers.iter().enumerate() {
        let name = format!("handler_{}_{}", i, handler.name_id);
        let node = decompile_handler(script, handler, &name, director_version, false)?;
        out.push(AstPrinter::new(dot_syntax).print_handler(&node));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::container::chunks::script::{Literal, LiteralKind};

    fn sample_script() -> Script {
        Script {
            literals: vec![Literal { kind: LiteralKind::Int, offset: 0, int_value: 7, string_value: String::new(), float_value: 0.0 }],
            ..Script::default()
        }
    }

    fn sample_handler(bytecode: Vec<u8>) -> Handler {
        Handler {
            name_id: 0, arg_count: 0, arg_offset: 0, local_count: 0, local_offset: 0,
            global_count: 0, global_offset: 0, compiled_offset: 0, compiled_len: bytecode.len() as i32,
            stack_height: 0, arg_name_ids: vec![], local_name_ids: vec![], global_name_ids: vec![],
            bytecode, is_generic_event: false,
        }
    }

    #[test]
    fn decompiles_a_trivial_return_to_an_empty_handler_body() {
        let script = sample_script();
        let handler = sample_handler(vec![0x01]); // ret
        let node = decompile_handler(&script, &handler, "mHandler", 500, false).unwrap();
        let text = AstPrinter::new(false).print_handler(&node);
        assert_eq!(text, "on mHandler\nend\n");
    }

    #[test]
    fn decompiles_a_simple_local_assignment() {
        let script = sample_script();
        // pushint8 7; setlocal 0; ret
        let handler = sample_handler(vec![0x41, 0x07, 0x52, 0x00, 0x01]);
        let node = decompile_handler(&script, &handler, "mHandler", 500, false).unwrap();
        let text = AstPrinter::new(false).print_handler(&node);
        assert!(text.contains("set "));
        assert!(text.contains("7"));
    }
}
