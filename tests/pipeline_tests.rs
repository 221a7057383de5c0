//! End-to-end pipeline tests. Since emitting and running native code is out
//! of reach here, these compare the reference interpreters
//! (`bfjit::interp`) running the unoptimized CIR against the same
//! interpreter running the canonicalized + simple-loop-eliminated CIR —
//! the two must always agree, by spec.
//!
//! This is the same differential-testing shape used elsewhere for
//! multi-engine consistency: run one input through independent
//! implementations and assert they agree, rather than asserting against a
//! single hardcoded trace.

use bfjit::ast;
use bfjit::interp::CirInterp;
use bfjit::passes::{canonicalize::canonicalize, simple_loop::eliminate};
use bfjit::translate::translate;

const HELLO_WORLD: &[u8] = b"++++++++[>++++[>++<-]>.[-]<<-]";

fn run_unoptimized(src: &[u8], input: &[u8]) -> Vec<u8> {
    let ast = ast::parse(src).unwrap();
    let cir = translate(&ast);
    let mut interp = CirInterp::new();
    let mut out = Vec::new();
    let mut input_iter = input.iter().copied();
    interp.run(&cir, &mut input_iter, &mut out);
    out
}

fn run_optimized(src: &[u8], input: &[u8]) -> Vec<u8> {
    let ast = ast::parse(src).unwrap();
    let cir = translate(&ast);
    let canon = canonicalize(&cir);
    let reduced = eliminate(&canon);
    let mut interp = CirInterp::new();
    let mut out = Vec::new();
    let mut input_iter = input.iter().copied();
    interp.run(&reduced, &mut input_iter, &mut out);
    out
}

#[test]
fn hello_world_fragment_prints_one_byte() {
    let out = run_unoptimized(HELLO_WORLD, &[]);
    assert_eq!(out, vec![64]);
}

#[test]
fn optimized_and_unoptimized_agree_on_hello_world_fragment() {
    assert_eq!(run_unoptimized(HELLO_WORLD, &[]), run_optimized(HELLO_WORLD, &[]));
}

#[test]
fn optimized_and_unoptimized_agree_on_echo() {
    let src = b",.,.,.";
    let input = b"xyz";
    assert_eq!(run_unoptimized(src, input), run_optimized(src, input));
}

#[test]
fn move_and_scale_loop_lands_expected_values() {
    // ++>+++<[->+<] moves cell 0 (2) into cell 1 (3 + 2 = 5), clearing cell 0.
    let src = b"++>+++<[->+<]";
    let ast = ast::parse(src).unwrap();
    let cir = translate(&ast);
    let canon = canonicalize(&cir);
    let reduced = eliminate(&canon);

    let mut interp = CirInterp::new();
    let mut out = Vec::new();
    let mut input = std::iter::empty();
    interp.run(&reduced, &mut input, &mut out);

    assert_eq!(interp.cell(0), 0);
    assert_eq!(interp.cell(1), 5);
}

#[test]
fn fan_out_loop_distributes_to_multiple_cells() {
    let src = b"+++[->+>++<<]";
    let ast = ast::parse(src).unwrap();
    let cir = translate(&ast);
    let canon = canonicalize(&cir);
    let reduced = eliminate(&canon);

    let mut interp = CirInterp::new();
    let mut out = Vec::new();
    let mut input = std::iter::empty();
    interp.run(&reduced, &mut input, &mut out);

    assert_eq!(interp.cell(0), 0);
    assert_eq!(interp.cell(1), 3);
    assert_eq!(interp.cell(2), 6);
}

#[test]
fn infinite_loop_body_is_never_rewritten() {
    // +[] has no offset-0 decrement at all, so the loop must survive
    // verbatim through canonicalization and elimination (we just don't run
    // it, since it never terminates).
    let src = b"+[]";
    let ast = ast::parse(src).unwrap();
    let cir = translate(&ast);
    let canon = canonicalize(&cir);
    let reduced = eliminate(&canon);

    let mut out = Vec::new();
    dump_to_string(&reduced, &mut out);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("CLoop:"));
}

fn dump_to_string(node: &bfjit::cir::CirNode, out: &mut Vec<u8>) {
    bfjit::pretty::dump(node, out).unwrap();
}

#[test]
fn malformed_source_reports_unmatched_brackets() {
    assert!(ast::parse(b"[[]").is_err());
    assert!(ast::parse(b"]").is_err());
}
