//! AST → CIR: a one-pass structural translation. Every AST node becomes
//! exactly one CIR node addressed at offset 0; later passes are what
//! introduce non-zero offsets and the net-motion `CPtrMov`/`CMul` forms.

use crate::ast::{AstKind, AstNode};
use crate::cir::{self, CirKind, CirNode};

/// Translates a full AST chain (as produced by [`crate::ast::parse`]) into
/// the equivalent CIR chain.
pub fn translate(ast: &AstNode) -> CirNode {
    cir::link(translate_body(ast))
}

fn translate_body(ast: &AstNode) -> Vec<CirNode> {
    ast.iter()
        .filter_map(|node| translate_one(node))
        .collect()
}

fn translate_one(node: &AstNode) -> Option<CirNode> {
    let kind = match &node.kind {
        AstKind::Nop => return None,
        AstKind::IncrPtr => CirKind::CPtrMov(1),
        AstKind::DecrPtr => CirKind::CPtrMov(-1),
        AstKind::IncrData => CirKind::CAdd(0, 1),
        AstKind::DecrData => CirKind::CAdd(0, -1),
        AstKind::GetInput => CirKind::CInput(0),
        AstKind::Output => CirKind::COutput(0),
        AstKind::Loop(body) => CirKind::CLoop(Box::new(translate(body))),
    };
    Some(CirNode::leaf(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    fn kinds(node: &CirNode) -> Vec<String> {
        node.iter().map(|n| format!("{:?}", n.kind)).collect()
    }

    #[test]
    fn straight_line_program() {
        let ast = parse(b"+-><,.").unwrap();
        let cir = translate(&ast);
        assert_eq!(
            kinds(&cir),
            vec![
                "CNode".to_string(),
                "CAdd(0, 1)".to_string(),
                "CAdd(0, -1)".to_string(),
                "CPtrMov(1)".to_string(),
                "CPtrMov(-1)".to_string(),
                "CInput(0)".to_string(),
                "COutput(0)".to_string(),
            ]
        );
    }

    #[test]
    fn nested_loop_translates_recursively() {
        let ast = parse(b"[->+<]").unwrap();
        let cir = translate(&ast);
        let mut it = cir.iter();
        assert!(matches!(it.next().unwrap().kind, CirKind::CNode));
        match &it.next().unwrap().kind {
            CirKind::CLoop(body) => {
                assert_eq!(
                    kinds(body),
                    vec![
                        "CNode".to_string(),
                        "CAdd(0, -1)".to_string(),
                        "CPtrMov(1)".to_string(),
                        "CAdd(0, 1)".to_string(),
                        "CPtrMov(-1)".to_string(),
                    ]
                );
            }
            other => panic!("expected CLoop, got {other:?}"),
        }
        assert!(it.next().is_none());
    }
}
