//! Lowers a [`CirNode`] chain to LLVM IR (the `-O` path: offsets come from
//! canonicalization, and `CMul`/`CSet` come from simple-loop elimination).

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{FunctionValue, IntValue, PointerValue};

use crate::cir::{CirKind, CirNode};
use crate::codegen::context::CodegenContext;
use crate::config::CompileOptions;
use crate::error::LowerError;

/// Builds a fresh module and `main` function from a canonicalized,
/// simple-loop-eliminated CIR chain, returning both.
pub fn from_cir<'ctx>(
    context: &'ctx Context,
    module_name: &str,
    cir: &CirNode,
    opts: &CompileOptions,
) -> Result<(Module<'ctx>, FunctionValue<'ctx>), LowerError> {
    let (ctx, tape) = CodegenContext::new(context, module_name, opts.tape_size);
    lower_chain(&ctx, cir, tape)?;
    Ok(ctx.finish())
}

fn lower_chain<'ctx>(
    ctx: &CodegenContext<'ctx>,
    node: &CirNode,
    mut ptr: PointerValue<'ctx>,
) -> Result<PointerValue<'ctx>, LowerError> {
    for n in node.iter() {
        ptr = lower_one(ctx, n, ptr)?;
    }
    Ok(ptr)
}

fn lower_one<'ctx>(
    ctx: &CodegenContext<'ctx>,
    node: &CirNode,
    ptr: PointerValue<'ctx>,
) -> Result<PointerValue<'ctx>, LowerError> {
    let b = &ctx.builder;
    match &node.kind {
        CirKind::CNode => Ok(ptr),
        CirKind::CPtrMov(k) => Ok(unsafe { ctx.gep(ptr, *k) }),
        CirKind::CAdd(off, k) => {
            let cell = unsafe { ctx.gep(ptr, *off) };
            let cur = load(ctx, cell)?;
            let delta = ctx.cell_type.const_int(*k as i64 as u64, true);
            let sum = b
                .build_int_add(cur, delta, "sum")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            store(ctx, cell, sum)?;
            Ok(ptr)
        }
        CirKind::CMul { src_off, dst_off, k } => {
            let src_cell = unsafe { ctx.gep(ptr, *src_off) };
            let dst_cell = unsafe { ctx.gep(ptr, *dst_off) };
            let src_val = load(ctx, src_cell)?;
            let dst_val = load(ctx, dst_cell)?;
            let factor = ctx.cell_type.const_int(*k as i64 as u64, true);
            let product = b
                .build_int_mul(src_val, factor, "product")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            let sum = b
                .build_int_add(dst_val, product, "sum")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            store(ctx, dst_cell, sum)?;
            Ok(ptr)
        }
        CirKind::CSet(off, k) => {
            let cell = unsafe { ctx.gep(ptr, *off) };
            let value = ctx.cell_type.const_int(*k as i64 as u64, true);
            store(ctx, cell, value)?;
            Ok(ptr)
        }
        CirKind::CInput(off) => {
            let cell = unsafe { ctx.gep(ptr, *off) };
            let input = b
                .build_call(ctx.getchar_fn, &[], "getchar")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            let byte = input
                .try_as_basic_value()
                .left()
                .expect("getchar returns a value");
            store(ctx, cell, byte.into_int_value())?;
            Ok(ptr)
        }
        CirKind::COutput(off) => {
            let cell = unsafe { ctx.gep(ptr, *off) };
            let value = load(ctx, cell)?;
            b.build_call(ctx.putchar_fn, &[value.into()], "putchar")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            Ok(ptr)
        }
        CirKind::CLoop(body) => lower_loop(ctx, body, ptr),
    }
}

fn load<'ctx>(ctx: &CodegenContext<'ctx>, cell: PointerValue<'ctx>) -> Result<IntValue<'ctx>, LowerError> {
    ctx.builder
        .build_load(ctx.cell_type, cell, "cell")
        .map(|v| v.into_int_value())
        .map_err(|e| LowerError::Backend(e.to_string()))
}

fn store<'ctx>(
    ctx: &CodegenContext<'ctx>,
    cell: PointerValue<'ctx>,
    value: IntValue<'ctx>,
) -> Result<(), LowerError> {
    ctx.builder
        .build_store(cell, value)
        .map(|_| ())
        .map_err(|e| LowerError::Backend(e.to_string()))
}

/// Identical discipline to [`crate::codegen::from_ast`]'s loop lowering; CIR
/// loops always test offset 0 just like AST loops do, so the condition logic
/// doesn't change, only the body's node kinds do.
fn lower_loop<'ctx>(
    ctx: &CodegenContext<'ctx>,
    body: &CirNode,
    ptr: PointerValue<'ctx>,
) -> Result<PointerValue<'ctx>, LowerError> {
    let b = &ctx.builder;
    let f = ctx.main_fn;

    let body_block = ctx.context.append_basic_block(f, "loop.body");
    let post_block = ctx.context.append_basic_block(f, "loop.post");
    let curr_block = b.get_insert_block().expect("builder has a current block");

    let cond = build_is_nonzero(ctx, ptr)?;
    b.build_conditional_branch(cond, body_block, post_block)
        .map_err(|e| LowerError::Backend(e.to_string()))?;

    b.position_at_end(body_block);
    let body_phi = b
        .build_phi(ctx.cell_ptr_type(), "ptr.body")
        .map_err(|e| LowerError::Backend(e.to_string()))?;
    body_phi.add_incoming(&[(&ptr, curr_block)]);

    b.position_at_end(post_block);
    let post_phi = b
        .build_phi(ctx.cell_ptr_type(), "ptr.post")
        .map_err(|e| LowerError::Backend(e.to_string()))?;
    post_phi.add_incoming(&[(&ptr, curr_block)]);

    b.position_at_end(body_block);
    let body_ptr = body_phi.as_basic_value().into_pointer_value();
    let new_body_ptr = lower_chain(ctx, body, body_ptr)?;

    let new_body_block = b.get_insert_block().expect("builder has a current block");
    let back_cond = build_is_nonzero(ctx, new_body_ptr)?;
    b.build_conditional_branch(back_cond, body_block, post_block)
        .map_err(|e| LowerError::Backend(e.to_string()))?;

    body_phi.add_incoming(&[(&new_body_ptr, new_body_block)]);
    post_phi.add_incoming(&[(&new_body_ptr, new_body_block)]);

    b.position_at_end(post_block);
    Ok(post_phi.as_basic_value().into_pointer_value())
}

fn build_is_nonzero<'ctx>(
    ctx: &CodegenContext<'ctx>,
    ptr: PointerValue<'ctx>,
) -> Result<IntValue<'ctx>, LowerError> {
    let value = load(ctx, ptr)?;
    let zero = ctx.cell_type.const_int(0, false);
    ctx.builder
        .build_int_compare(inkwell::IntPredicate::NE, value, zero, "isnz")
        .map_err(|e| LowerError::Backend(e.to_string()))
}
