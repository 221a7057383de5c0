//! Lowers an [`AstNode`] chain straight to LLVM IR (the `-O`-less path: no
//! canonicalization, no simple-loop elimination, every op addresses offset 0
//! relative to whatever the pointer currently is).

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{FunctionValue, PointerValue};

use crate::ast::{AstKind, AstNode};
use crate::codegen::context::CodegenContext;
use crate::config::CompileOptions;
use crate::error::LowerError;

/// Builds a fresh module and `main` function from an AST chain, returning
/// both. This is the `-O`-less path: no canonicalization or simple-loop
/// elimination has run, so every op still addresses offset 0.
pub fn from_ast<'ctx>(
    context: &'ctx Context,
    module_name: &str,
    ast: &AstNode,
    opts: &CompileOptions,
) -> Result<(Module<'ctx>, FunctionValue<'ctx>), LowerError> {
    let (ctx, tape) = CodegenContext::new(context, module_name, opts.tape_size);
    lower_chain(&ctx, ast, tape)?;
    Ok(ctx.finish())
}

fn lower_chain<'ctx>(
    ctx: &CodegenContext<'ctx>,
    node: &AstNode,
    mut ptr: PointerValue<'ctx>,
) -> Result<PointerValue<'ctx>, LowerError> {
    for n in node.iter() {
        ptr = lower_one(ctx, n, ptr)?;
    }
    Ok(ptr)
}

fn lower_one<'ctx>(
    ctx: &CodegenContext<'ctx>,
    node: &AstNode,
    ptr: PointerValue<'ctx>,
) -> Result<PointerValue<'ctx>, LowerError> {
    let b = &ctx.builder;
    match &node.kind {
        AstKind::Nop => Ok(ptr),
        AstKind::IncrPtr => Ok(unsafe { ctx.gep(ptr, 1) }),
        AstKind::DecrPtr => Ok(unsafe { ctx.gep(ptr, -1) }),
        AstKind::IncrData => {
            add_const(ctx, ptr, 1)?;
            Ok(ptr)
        }
        AstKind::DecrData => {
            add_const(ctx, ptr, -1)?;
            Ok(ptr)
        }
        AstKind::GetInput => {
            let input = b
                .build_call(ctx.getchar_fn, &[], "getchar")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            let byte = input
                .try_as_basic_value()
                .left()
                .expect("getchar returns a value");
            b.build_store(ptr, byte).map_err(|e| LowerError::Backend(e.to_string()))?;
            Ok(ptr)
        }
        AstKind::Output => {
            let value = b
                .build_load(ctx.cell_type, ptr, "cell")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            b.build_call(ctx.putchar_fn, &[value.into()], "putchar")
                .map_err(|e| LowerError::Backend(e.to_string()))?;
            Ok(ptr)
        }
        AstKind::Loop(body) => lower_loop(ctx, body, ptr),
    }
}

fn add_const<'ctx>(
    ctx: &CodegenContext<'ctx>,
    ptr: PointerValue<'ctx>,
    amt: i8,
) -> Result<(), LowerError> {
    let b = &ctx.builder;
    let cur = b
        .build_load(ctx.cell_type, ptr, "cell")
        .map_err(|e| LowerError::Backend(e.to_string()))?
        .into_int_value();
    let delta = ctx.cell_type.const_int(amt as u64, true);
    let sum = b
        .build_int_add(cur, delta, "sum")
        .map_err(|e| LowerError::Backend(e.to_string()))?;
    b.build_store(ptr, sum).map_err(|e| LowerError::Backend(e.to_string()))?;
    Ok(())
}

/// Shared loop-lowering discipline: a conditional branch into `body`/`post`
/// blocks, a two-incoming-edge phi for the pointer at each, and a back-edge
/// that re-tests the condition after the body runs.
fn lower_loop<'ctx>(
    ctx: &CodegenContext<'ctx>,
    body: &AstNode,
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
) -> Result<inkwell::values::IntValue<'ctx>, LowerError> {
    let b = &ctx.builder;
    let value = b
        .build_load(ctx.cell_type, ptr, "cell")
        .map_err(|e| LowerError::Backend(e.to_string()))?
        .into_int_value();
    let zero = ctx.cell_type.const_int(0, false);
    b.build_int_compare(inkwell::IntPredicate::NE, value, zero, "isnz")
        .map_err(|e| LowerError::Backend(e.to_string()))
}
