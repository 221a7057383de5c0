//! Simple-loop elimination: a loop of the shape `[-...]` whose body is pure
//! `CAdd`/`CPtrMov`, has zero net pointer motion, and decrements offset 0 by
//! exactly one, is a multiply-and-clear in disguise. Such loops are rewritten
//! to one `CMul` per other touched offset plus a trailing `CSet(0, 0)`.
//!
//! Runs after [`crate::passes::canonicalize`], so a simple loop's body has
//! already collapsed to at most one `CAdd` per offset plus one trailing net
//! `CPtrMov`. Recursion is bottom-up: nested loops are eliminated first, so a
//! loop whose only child was itself simplified away can still qualify, while
//! a loop with any surviving nested `CLoop` can never be simple.

use indexmap::IndexMap;

use crate::cir::{self, CirKind, CirNode};

/// Runs simple-loop elimination over a full CIR chain rooted at a `CNode`
/// sentinel.
pub fn eliminate(node: &CirNode) -> CirNode {
    assert!(matches!(node.kind, CirKind::CNode));
    cir::link(eliminate_body(node.iter().skip(1)))
}

fn eliminate_body<'a>(nodes: impl Iterator<Item = &'a CirNode>) -> Vec<CirNode> {
    let mut out = Vec::new();
    for node in nodes {
        match &node.kind {
            CirKind::CLoop(body) => {
                let reduced_body = eliminate(body);
                match try_simplify(&reduced_body) {
                    Some(replacement) => out.extend(replacement),
                    None => out.push(CirNode::leaf(CirKind::CLoop(Box::new(reduced_body)))),
                }
            }
            CirKind::CPtrMov(k) => out.push(CirNode::leaf(CirKind::CPtrMov(*k))),
            CirKind::CAdd(off, k) => out.push(CirNode::leaf(CirKind::CAdd(*off, *k))),
            CirKind::CInput(off) => out.push(CirNode::leaf(CirKind::CInput(*off))),
            CirKind::COutput(off) => out.push(CirNode::leaf(CirKind::COutput(*off))),
            CirKind::CSet(off, k) => out.push(CirNode::leaf(CirKind::CSet(*off, *k))),
            CirKind::CMul { src_off, dst_off, k } => out.push(CirNode::leaf(CirKind::CMul {
                src_off: *src_off,
                dst_off: *dst_off,
                k: *k,
            })),
            CirKind::CNode => unreachable!("sentinel only appears as chain head"),
        }
    }
    out
}

/// Tests whether an already-reduced loop body (sentinel-headed) is simple,
/// returning its `CMul`/`CSet` replacement if so.
fn try_simplify(body: &CirNode) -> Option<Vec<CirNode>> {
    let mut adds: IndexMap<i32, i32> = IndexMap::new();
    let mut ptr_mov = 0i32;

    for node in body.iter().skip(1) {
        match &node.kind {
            CirKind::CAdd(off, k) => {
                *adds.entry(*off).or_insert(0) += k;
            }
            CirKind::CPtrMov(k) => ptr_mov += k,
            // Any surviving loop, I/O, or prior-pass artifact disqualifies
            // the loop: the body is no longer pure add/move.
            _ => return None,
        }
    }

    if ptr_mov != 0 {
        return None;
    }
    // Default-zero read: an offset-0 entry that was never written, or one
    // canonicalization already dropped for netting to zero, both mean "0
    // here" — neither counts as the required -1.
    if adds.get(&0).copied().unwrap_or(0) != -1 {
        return None;
    }

    let mut replacement = Vec::new();
    for (&off, &k) in adds.iter() {
        if off == 0 {
            continue;
        }
        replacement.push(CirNode::leaf(CirKind::CMul {
            src_off: 0,
            dst_off: off,
            k,
        }));
    }
    replacement.push(CirNode::leaf(CirKind::CSet(0, 0)));
    Some(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use crate::passes::canonicalize::canonicalize;
    use crate::translate::translate;

    fn pipeline(src: &[u8]) -> CirNode {
        let ast = parse(src).unwrap();
        let cir = translate(&ast);
        let canon = canonicalize(&cir);
        eliminate(&canon)
    }

    fn kinds(node: &CirNode) -> Vec<String> {
        node.iter().map(|n| format!("{:?}", n.kind)).collect()
    }

    #[test]
    fn clear_loop_becomes_cset() {
        let reduced = pipeline(b"[-]");
        assert_eq!(kinds(&reduced), vec!["CNode".to_string(), "CSet(0, 0)".to_string()]);
    }

    #[test]
    fn move_loop_becomes_cmul_and_cset() {
        let reduced = pipeline(b"[->+<]");
        assert_eq!(
            kinds(&reduced),
            vec![
                "CNode".to_string(),
                "CMul { src_off: 0, dst_off: 1, k: 1 }".to_string(),
                "CSet(0, 0)".to_string(),
            ]
        );
    }

    #[test]
    fn infinite_loop_is_not_rewritten() {
        // Body is empty: no offset-0 decrement, so not simple.
        let reduced = pipeline(b"+[]");
        let mut it = reduced.iter();
        assert!(matches!(it.next().unwrap().kind, CirKind::CNode));
        assert!(matches!(it.next().unwrap().kind, CirKind::CAdd(0, 1)));
        assert!(matches!(it.next().unwrap().kind, CirKind::CLoop(_)));
        assert!(it.next().is_none());
    }

    #[test]
    fn net_ptr_motion_disqualifies_loop() {
        // [->] has a nonzero offset-0 decrement but also net pointer motion.
        let reduced = pipeline(b"[->]");
        assert!(reduced.iter().skip(1).any(|n| matches!(n.kind, CirKind::CLoop(_))));
    }

    #[test]
    fn non_unit_decrement_disqualifies_loop() {
        // [--] decrements by 2, not 1, so it is not a simple clear loop.
        let reduced = pipeline(b"[--]");
        assert!(reduced.iter().skip(1).any(|n| matches!(n.kind, CirKind::CLoop(_))));
    }

    #[test]
    fn nested_non_simple_loop_disqualifies_parent() {
        // The inner `[->]` can't simplify (net ptr motion), so it survives as
        // a CLoop inside the outer body, which must then disqualify the
        // outer loop even though the outer body is otherwise add/move-only.
        let reduced = pipeline(b"[-[->]]");
        let mut it = reduced.iter();
        assert!(matches!(it.next().unwrap().kind, CirKind::CNode));
        assert!(matches!(it.next().unwrap().kind, CirKind::CLoop(_)));
        assert!(it.next().is_none());
    }

    #[test]
    fn simplified_nested_loop_still_disqualifies_parent() {
        // The inner `[->+<]` reduces to CMul+CSet. Those are pass artifacts,
        // not raw add/move ops, so they disqualify the outer `[-...]` from
        // a second round of simplification just as an unreduced CLoop would.
        let reduced = pipeline(b"[-[->+<]]");
        let mut it = reduced.iter();
        assert!(matches!(it.next().unwrap().kind, CirKind::CNode));
        match &it.next().unwrap().kind {
            CirKind::CLoop(body) => {
                assert_eq!(
                    kinds(body),
                    vec![
                        "CNode".to_string(),
                        "CAdd(0, -1)".to_string(),
                        "CMul { src_off: 0, dst_off: 1, k: 1 }".to_string(),
                        "CSet(0, 0)".to_string(),
                    ]
                );
            }
            other => panic!("expected surviving CLoop, got {other:?}"),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn multi_cell_fan_out_loop() {
        let reduced = pipeline(b"[->+>++<<]");
        let kinds = kinds(&reduced);
        assert!(kinds.contains(&"CMul { src_off: 0, dst_off: 1, k: 1 }".to_string()));
        assert!(kinds.contains(&"CMul { src_off: 0, dst_off: 2, k: 2 }".to_string()));
        assert!(kinds.contains(&"CSet(0, 0)".to_string()));
    }
}
