//! Basic-block canonicalization: within each straight-line run, fold every
//! `CPtrMov`/`CAdd` into an offset-indexed amount map plus a single trailing
//! `CPtrMov` for the run's net pointer motion. A "run" ends at anything that
//! isn't a `CPtrMov`/`CAdd` (input, output, or a nested loop), and loop
//! bodies are canonicalized recursively so each nesting level gets its own
//! fresh accumulator.

use indexmap::IndexMap;

use crate::cir::{self, CirKind, CirNode};

/// Canonicalizes a full CIR chain rooted at a `CNode` sentinel.
pub fn canonicalize(node: &CirNode) -> CirNode {
    assert!(matches!(node.kind, CirKind::CNode));
    cir::link(canonicalize_body(node.iter().skip(1)))
}

fn canonicalize_body<'a>(nodes: impl Iterator<Item = &'a CirNode>) -> Vec<CirNode> {
    let mut out = Vec::new();
    let mut adds: IndexMap<i32, i32> = IndexMap::new();
    let mut ptr_mov: i32 = 0;

    for node in nodes {
        match &node.kind {
            CirKind::CPtrMov(k) => ptr_mov += k,
            CirKind::CAdd(off, k) => {
                *adds.entry(off + ptr_mov).or_insert(0) += k;
            }
            CirKind::CInput(off) => {
                let adjusted = off + ptr_mov;
                flush(&mut adds, &mut ptr_mov, &mut out);
                out.push(CirNode::leaf(CirKind::CInput(adjusted)));
            }
            CirKind::COutput(off) => {
                let adjusted = off + ptr_mov;
                flush(&mut adds, &mut ptr_mov, &mut out);
                out.push(CirNode::leaf(CirKind::COutput(adjusted)));
            }
            CirKind::CSet(off, k) => {
                let adjusted = off + ptr_mov;
                flush(&mut adds, &mut ptr_mov, &mut out);
                out.push(CirNode::leaf(CirKind::CSet(adjusted, *k)));
            }
            CirKind::CMul { src_off, dst_off, k } => {
                let adjusted_src = src_off + ptr_mov;
                let adjusted_dst = dst_off + ptr_mov;
                flush(&mut adds, &mut ptr_mov, &mut out);
                out.push(CirNode::leaf(CirKind::CMul {
                    src_off: adjusted_src,
                    dst_off: adjusted_dst,
                    k: *k,
                }));
            }
            CirKind::CLoop(body) => {
                flush(&mut adds, &mut ptr_mov, &mut out);
                out.push(CirNode::leaf(CirKind::CLoop(Box::new(canonicalize(body)))));
            }
            CirKind::CNode => unreachable!("sentinel only appears as chain head"),
        }
    }

    flush(&mut adds, &mut ptr_mov, &mut out);
    out
}

/// Emits the accumulated adds (in first-seen order, dropping net-zero
/// entries) followed by a single net `CPtrMov`, then resets both.
fn flush(adds: &mut IndexMap<i32, i32>, ptr_mov: &mut i32, out: &mut Vec<CirNode>) {
    for (off, amt) in adds.drain(..) {
        if amt != 0 {
            out.push(CirNode::leaf(CirKind::CAdd(off, amt)));
        }
    }
    if *ptr_mov != 0 {
        out.push(CirNode::leaf(CirKind::CPtrMov(*ptr_mov)));
    }
    *ptr_mov = 0;
}
