//! Executes a compiled module in-process via inkwell's MCJIT-backed
//! execution engine, mirroring the original's `EngineBuilder`/`MCJIT`
//! selection in `main.cpp`.

use inkwell::module::Module;
use inkwell::OptimizationLevel;

use crate::error::JitError;

/// Creates a JIT execution engine for `module`, looks up `main`, and calls
/// it. `main` must already have been verified to take no arguments and
/// return nothing — true of every function [`crate::codegen`] produces.
pub fn run(module: &Module) -> Result<(), JitError> {
    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|e| JitError::EngineNotCreated(e.to_string()))?;

    let main_fn = unsafe {
        engine
            .get_function::<unsafe extern "C" fn()>("main")
            .map_err(|e| JitError::EngineNotCreated(e.to_string()))?
    };

    unsafe {
        main_fn.call();
    }

    Ok(())
}
