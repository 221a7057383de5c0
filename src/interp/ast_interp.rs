use std::collections::HashMap;

use crate::ast::{AstKind, AstNode};

/// Executes an AST chain against a sparse tape. The tape is keyed by
/// absolute cell index rather than a fixed-size array since this
/// interpreter exists only to check pipeline properties, not to emulate the
/// compiled program's tape-size behavior.
#[derive(Debug, Default)]
pub struct AstInterp {
    tape: HashMap<i64, u8>,
    ptr: i64,
}

impl AstInterp {
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

    /// Runs the chain to completion, consuming bytes from `input` in order
    /// (exhaustion yields `0`, matching EOF-as-zero) and appending every
    /// `Output` byte to `output`.
    pub fn run(&mut self, ast: &AstNode, input: &mut dyn Iterator<Item = u8>, output: &mut Vec<u8>) {
        for node in ast.iter() {
            self.step(node, input, output);
        }
    }

    fn step(&mut self, node: &AstNode, input: &mut dyn Iterator<Item = u8>, output: &mut Vec<u8>) {
        match &node.kind {
            AstKind::Nop => {}
            AstKind::IncrPtr => self.ptr += 1,
            AstKind::DecrPtr => self.ptr -= 1,
            AstKind::IncrData => {
                let v = self.cell(0).wrapping_add(1);
                self.set_cell(0, v);
            }
            AstKind::DecrData => {
                let v = self.cell(0).wrapping_sub(1);
                self.set_cell(0, v);
            }
            AstKind::GetInput => {
                let byte = input.next().unwrap_or(0);
                self.set_cell(0, byte);
            }
            AstKind::Output => output.push(self.cell(0)),
            AstKind::Loop(body) => {
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

    #[test]
    fn hello_world_fragment() {
        let ast = parse(b"++++++++[>++++[>++<-]>.[-]<<-]").unwrap();
        let mut interp = AstInterp::new();
        let mut input = std::iter::empty();
        let mut out = Vec::new();
        interp.run(&ast, &mut input, &mut out);
        assert_eq!(out, vec![64]);
    }

    #[test]
    fn echoes_input() {
        let ast = parse(b",.").unwrap();
        let mut interp = AstInterp::new();
        let mut input = b"A".iter().copied();
        let mut out = Vec::new();
        interp.run(&ast, &mut input, &mut out);
        assert_eq!(out, vec![b'A']);
    }
}
