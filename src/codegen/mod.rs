//! Lowering to LLVM IR via `inkwell`.
//!
//! Both [`from_ast`] and [`from_cir`] share the same loop-lowering discipline
//! (body/post blocks, a two-incoming-edge phi at each) and the same tape
//! setup in [`context::CodegenContext`]; they differ only in which node kinds
//! they know how to visit, since CIR adds offset-addressed ops and `CMul`.

pub mod context;
pub mod from_ast;
pub mod from_cir;

pub use context::CodegenContext;

use inkwell::module::Module;
use inkwell::passes::PassManager;

/// Runs the host backend's own scalar-optimization suite over `module`
/// (`-L`): instruction combining, LICM, loop unrolling, GVN, SCCP, CFG
/// simplification, aggressive DCE, and dead-store elimination. This is a
/// thin forward to `inkwell`'s legacy pass manager, not a reimplementation —
/// the host optimizer is out of scope for this crate (see the CIR passes in
/// [`crate::passes`] for the optimizations this crate does own). Run
/// repeatedly until a pass over the module produces no further change,
/// matching the original's iterative pass loop.
pub fn run_host_passes(module: &Module) {
    let pm = PassManager::create(());
    pm.add_instruction_combining_pass();
    pm.add_licm_pass();
    // The legacy PassManager inkwell binds has no loop-strength-reduction
    // pass; loop unrolling is the nearest available substitute for that slot.
    pm.add_loop_unroll_pass();
    pm.add_ind_var_simplify_pass();
    pm.add_loop_deletion_pass();
    pm.add_new_gvn_pass();
    pm.add_sccp_pass();
    pm.add_cfg_simplification_pass();
    pm.add_aggressive_dce_pass();
    pm.add_dead_store_elimination_pass();

    while pm.run_on(module) {}
}
