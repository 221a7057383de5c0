//! Tree-walking reference interpreters for the AST and CIR, used only by
//! the test suite to check the properties in spec §8 that compare pipeline
//! stages against each other (translation faithfulness, pass semantics
//! preservation) without needing to actually emit and run native code.
//!
//! Not part of the compilation pipeline — the CLI driver never touches this
//! module. Grounded in the same tape-stepping shape as a thread-stepping
//! bytecode interpreter: both walk a small instruction set against mutable
//! state one op at a time.

#![doc(hidden)]

pub mod ast_interp;
pub mod cir_interp;

pub use ast_interp::AstInterp;
pub use cir_interp::CirInterp;
