use std::collections::HashMap;

use crate::cir::{CirKind, CirNode};

/// Executes a CIR chain against a sparse tape, the CIR counterpart of
/// [`crate::interp::AstInterp`]. Offsets in `CAdd`/`CMul`/`CSet`/`CInput`/
/// `COutput` are always relative to the current pointer, exactly as the CIR
/// semantics table specifies.
#[derive(Debug, Default)]
pub struct CirInterp {
    tape: HashMap<i64, u8>,
    ptr: i64,
}

impl CirInterp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptr(&self) -> i64 {
        self.ptr
    }

    pub fn cell(&self, off: i64) -> u8 {
        self.tape.get(&(self.ptr + off)).copied().unwrap_or(0)
    }

    fn set_cell(&mut self, off: i64, val: u8) {
        self.tape.insert(self.ptr + off, val);
    }

    pub fn run(&mut self, cir: &CirNode, input: &mut dyn Iterator<Item = u8>, output: &mut Vec<u8>) {
        for node in cir.iter() {
            self.step(node, input, output);
        }
    }

    fn step(&mut self, node: &CirNode, input: &mut dyn Iterator<Item = u8>, output: &mut Vec<u8>) {
        match &node.kind {
            CirKind::CNode => {}
            CirKind::CPtrMov(k) => self.ptr += *k as i64,
            CirKind::CAdd(off, k) => {
                let v = self.cell(*off as i64).wrapping_add(*k as u8);
                self.set_cell(*off as i64, v);
            }
            CirKind::CMul { src_off, dst_off, k } => {
                let src = self.cell(*src_off as i64);
                let dst = self.cell(*dst_off as i64);
                let product = src.wrapping_mul(*k as u8);
                self.set_cell(*dst_off as i64, dst.wrapping_add(product));
            }
            CirKind::CSet(off, k) => self.set_cell(*off as i64, *k as u8),
            CirKind::CInput(off) => {
                let byte = input.next().unwrap_or(0);
                self.set_cell(*off as i64, byte);
            }
            CirKind::COutput(off) => output.push(self.cell(*off as i64)),
            CirKind::CLoop(body) => {
                while self.cell(0) != 0 {
                    for n in body.iter() {
                        self.step(n, input, output);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use crate::passes::canonicalize::canonicalize;
    use crate::passes::simple_loop::eliminate;
    use crate::translate::translate;

    #[test]
    fn optimized_pipeline_matches_direct_translation() {
        let src = b"++++++++[>++++[>++<-]>.[-]<<-]";
        let ast = parse(src).unwrap();
        let cir = translate(&ast);

        let mut baseline = CirInterp::new();
        let mut out1 = Vec::new();
        baseline.run(&cir, &mut std::iter::empty(), &mut out1);

        let canon = canonicalize(&cir);
        let reduced = eliminate(&canon);
        let mut optimized = CirInterp::new();
        let mut out2 = Vec::new();
        optimized.run(&reduced, &mut std::iter::empty(), &mut out2);

        assert_eq!(out1, out2);
        assert_eq!(out1, vec![64]);
    }
}
