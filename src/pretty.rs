//! Diagnostic dump of a CIR chain, one node per line, indented two spaces
//! per loop nesting level. The `Nop`/`CNode` sentinel never produces a line
//! of its own — it's a list-head bookkeeping detail, not a program node.

use std::io::{self, Write};

use crate::cir::{CirKind, CirNode};

/// Writes `node`'s chain to `out` in the dump format the `-p` flag emits.
pub fn dump<W: Write>(node: &CirNode, out: &mut W) -> io::Result<()> {
    dump_at(node, out, 0)
}

fn dump_at<W: Write>(node: &CirNode, out: &mut W, depth: usize) -> io::Result<()> {
    for n in node.iter() {
        write_one(n, out, depth)?;
    }
    Ok(())
}

fn write_one<W: Write>(node: &CirNode, out: &mut W, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match &node.kind {
        CirKind::CNode => Ok(()),
        CirKind::CPtrMov(k) => writeln!(out, "{indent}CPtrMov({k})"),
        CirKind::CAdd(off, k) => writeln!(out, "{indent}CAdd({off},{k})"),
        CirKind::CMul { src_off, dst_off, k } => {
            writeln!(out, "{indent}CMul({src_off},{dst_off},{k})")
        }
        CirKind::CSet(off, k) => writeln!(out, "{indent}CSet({off},{k})"),
        CirKind::CInput(off) => writeln!(out, "{indent}CInput({off})"),
        CirKind::COutput(off) => writeln!(out, "{indent}COutput({off})"),
        CirKind::CLoop(body) => {
            writeln!(out, "{indent}CLoop:")?;
            dump_at(body, out, depth + 1)
        }
    }
}
