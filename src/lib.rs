//! # bfjit
//!
//! **bfjit** is a small optimizing ahead-of-time/JIT compiler for
//! Brainfuck. It lowers through two IRs — a literal AST mirroring the eight
//! source tokens, and a canonical offset-addressed IR (CIR) that exposes
//! pointer motion and arithmetic as first-class, rewritable operations —
//! before handing off to an LLVM backend via `inkwell`.
//!
//! ## Pipeline
//!
//! 1. [`token`] lexes source bytes into [`Token`](token::Token)s, silently
//!    dropping anything that isn't one of the eight recognized characters.
//! 2. [`ast::parse`] builds an [`ast::AstNode`] chain.
//! 3. [`translate::translate`] lowers the AST to a [`cir::CirNode`] chain.
//! 4. [`passes::canonicalize::canonicalize`] and
//!    [`passes::simple_loop::eliminate`] rewrite the CIR in place, run only
//!    when optimization is requested.
//! 5. [`codegen::from_ast`] or [`codegen::from_cir`] lowers to LLVM IR.
//! 6. [`jit::run`] executes the result, or the caller prints the module's
//!    textual IR / [`pretty::dump`]s the CIR instead.
//!
//! ## Crate organization
//!
//! - `token`, `ast`, `cir`, `translate`: the data model and its translation.
//! - `passes`: the two CIR-to-CIR optimizations.
//! - `codegen`, `jit`: the LLVM backend.
//! - `pretty`: the CIR diagnostic dump.
//! - `config`, `error`: ambient configuration and error types.

pub mod ast;
pub mod cir;
pub mod codegen;
pub mod config;
pub mod error;
pub mod jit;
pub mod passes;
pub mod pretty;
pub mod token;
pub mod translate;

#[doc(hidden)]
pub mod interp;
