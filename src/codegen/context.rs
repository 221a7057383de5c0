//! Function-level scaffolding shared by both lowering paths: the zeroed
//! tape, the `getchar`/`putchar` declarations, and the exported `main`.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::IntType;
use inkwell::values::{FunctionValue, PointerValue};
use inkwell::AddressSpace;

/// Owns the LLVM module being built and the cursor (`Builder`) that walks it.
///
/// A single `Builder` is reused for the whole program; nesting is handled by
/// recursion over the AST/CIR chain rather than the originating C++'s stack
/// of `IRBuilder` copies, since repositioning one builder and threading the
/// "current tape pointer" value through return values is equivalent and
/// needs no extra bookkeeping in Rust.
pub struct CodegenContext<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub cell_type: IntType<'ctx>,
    pub index_type: IntType<'ctx>,
    pub getchar_fn: FunctionValue<'ctx>,
    pub putchar_fn: FunctionValue<'ctx>,
    pub main_fn: FunctionValue<'ctx>,
}

impl<'ctx> CodegenContext<'ctx> {
    /// Creates `module_name`, declares `getchar`/`putchar`/`main` on it,
    /// allocates a zeroed `tape_size` byte tape on `main`'s entry block, and
    /// positions the builder to emit the program body right after the
    /// zeroing memset.
    ///
    /// The module is created (not borrowed from the caller) so that
    /// [`finish`](Self::finish) can hand it back alongside the completed
    /// function: `inkwell`'s `Module` owns and disposes the underlying LLVM
    /// module on drop and isn't `Clone`, so round-tripping ownership through
    /// this type is simpler than threading a caller-owned module through by
    /// reference the way the original's raw `Module*` parameter does.
    pub fn new(context: &'ctx Context, module_name: &str, tape_size: u32) -> (Self, PointerValue<'ctx>) {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        let cell_type = context.i8_type();
        let index_type = context.i32_type();
        let void_type = context.void_type();

        let getchar_ty = cell_type.fn_type(&[], false);
        let getchar_fn = module.add_function("getchar", getchar_ty, Some(Linkage::External));

        let putchar_ty = void_type.fn_type(&[cell_type.into()], false);
        let putchar_fn = module.add_function("putchar", putchar_ty, Some(Linkage::External));

        let main_ty = void_type.fn_type(&[], false);
        let main_fn = module.add_function("main", main_ty, Some(Linkage::External));

        let entry = context.append_basic_block(main_fn, "code");
        builder.position_at_end(entry);

        let tape_len = index_type.const_int(tape_size as u64, false);
        let tape = builder
            .build_array_alloca(cell_type, tape_len, "tape")
            .expect("entry-block alloca never fails");

        let zero_byte = cell_type.const_int(0, false);
        builder
            .build_memset(tape, 1, zero_byte, tape_len)
            .expect("memset of a freshly allocated tape never fails");

        let ctx = CodegenContext {
            context,
            module,
            builder,
            cell_type,
            index_type,
            getchar_fn,
            putchar_fn,
            main_fn,
        };
        (ctx, tape)
    }

    /// Pointer type for tape cells, used for every loop phi.
    pub fn cell_ptr_type(&self) -> inkwell::types::PointerType<'ctx> {
        self.cell_type.ptr_type(AddressSpace::default())
    }

    /// `ptr` offset by a (possibly negative) number of cells.
    ///
    /// Emits a plain (not `inbounds`) GEP, matching the original's own
    /// non-inbounds `CreateGEP` usage: tape-bounds checking is explicitly
    /// out of scope (spec §1 Non-goals — "moving the pointer off the tape
    /// is undefined, not checked"), so the IR itself makes no in-bounds
    /// claim LLVM could use to miscompile an out-of-range program.
    ///
    /// # Safety
    /// Every load/store this crate builds from the result dereferences it,
    /// so `ptr` must point within the tape allocation and the resulting
    /// address must not leave it; both hold for every offset a well-formed
    /// AST/CIR chain produces relative to its own entry pointer.
    pub unsafe fn gep(&self, ptr: PointerValue<'ctx>, offset: i32) -> PointerValue<'ctx> {
        let idx = self.index_type.const_int(offset as i64 as u64, true);
        self.builder
            .build_gep(self.cell_type, ptr, &[idx], "cellptr")
            .expect("GEP construction never fails")
    }

    /// Finishes the function with a `ret void` in whatever block the builder
    /// is currently positioned at, returning the module and the completed
    /// `main` function.
    pub fn finish(self) -> (Module<'ctx>, FunctionValue<'ctx>) {
        self.builder.build_return(None).expect("ret void never fails");
        (self.module, self.main_fn)
    }
}
