//! The canonical IR: offset-addressed operations over a tape, reachable by
//! translating an [`crate::ast::AstNode`] chain and then running the
//! optimization passes over it.

/// The payload-bearing tag of a [`CirNode`].
#[derive(Debug, Clone)]
pub enum CirKind {
    /// List-head sentinel. Never produced by translation or a pass.
    CNode,
    /// Move the data pointer by `k` cells (`k` may be negative).
    CPtrMov(i32),
    /// Add `k` to the cell at `off` relative to the current pointer.
    CAdd(i32, i32),
    /// Multiply the cell at `src_off` by `k` and add the product into the
    /// cell at `dst_off`, leaving the source cell untouched. Emitted only by
    /// simple-loop elimination.
    CMul { src_off: i32, dst_off: i32, k: i32 },
    /// Set the cell at `off` to the constant `k`.
    CSet(i32, i32),
    /// Read one byte into the cell at `off`.
    CInput(i32),
    /// Write the byte at `off`.
    COutput(i32),
    /// Loop while the cell at the current pointer (offset 0) is nonzero.
    CLoop(Box<CirNode>),
}

/// A node in the singly linked CIR chain, owning its successor.
#[derive(Debug, Clone)]
pub struct CirNode {
    pub kind: CirKind,
    pub next: Option<Box<CirNode>>,
}

impl CirNode {
    pub fn leaf(kind: CirKind) -> CirNode {
        CirNode { kind, next: None }
    }

    pub fn sentinel(next: Option<Box<CirNode>>) -> CirNode {
        CirNode { kind: CirKind::CNode, next }
    }

    /// Iterates this node and all of its successors in program order.
    pub fn iter(&self) -> CirIter<'_> {
        CirIter { cur: Some(self) }
    }
}

pub struct CirIter<'a> {
    cur: Option<&'a CirNode>,
}

impl<'a> Iterator for CirIter<'a> {
    type Item = &'a CirNode;

    fn next(&mut self) -> Option<&'a CirNode> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        Some(node)
    }
}

/// Links a flat, program-order list of nodes (each with `next: None`) into a
/// chain rooted at a fresh `CNode` sentinel.
pub fn link(nodes: Vec<CirNode>) -> CirNode {
    let mut next = None;
    for mut node in nodes.into_iter().rev() {
        node.next = next;
        next = Some(Box::new(node));
    }
    CirNode::sentinel(next)
}

/// Splits a chain's sentinel head off from the nodes that follow it,
/// yielding the flat `Vec` representation passes build their output from.
/// Panics if `node`'s kind isn't `CNode`; only ever called on chain roots.
pub fn unlink(node: CirNode) -> Vec<CirNode> {
    assert!(matches!(node.kind, CirKind::CNode));
    let mut out = Vec::new();
    let mut cur = node.next;
    while let Some(boxed) = cur {
        let CirNode { kind, next } = *boxed;
        out.push(CirNode { kind, next: None });
        cur = next;
    }
    out
}
