//! Compiler configuration threaded from the CLI through lowering.

/// Tape size in cells the original source uses when `-s` isn't given.
pub const DEFAULT_TAPE_SIZE: u32 = 10_000;

/// Options that control how a source program is compiled.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Number of cells to allocate for the tape (`-s`).
    pub tape_size: u32,
    /// Run the canonicalization and simple-loop-elimination passes before
    /// lowering, and lower from CIR instead of directly from the AST (`-O`).
    pub optimize: bool,
    /// Run the host backend's own optimization passes over the emitted
    /// module before JIT/output (`-L`). Independent of `optimize`: this
    /// flag forwards to the backend's pass manager and has no bearing on
    /// the CIR-level passes this crate implements itself.
    pub run_host_opts: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            tape_size: DEFAULT_TAPE_SIZE,
            optimize: false,
            run_host_opts: false,
        }
    }
}
