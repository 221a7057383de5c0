use std::io::Write;

use bfjit::config::CompileOptions;
use bfjit::{ast, codegen, jit, passes, pretty, translate};
use inkwell::context::Context;

struct Flags {
    interpret: bool,
    output: Option<String>,
    optimize: bool,
    host_opts: bool,
    print: bool,
    tape_size: u32,
    help: bool,
    source: Option<String>,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            interpret: false,
            output: None,
            optimize: false,
            host_opts: false,
            print: false,
            tape_size: bfjit::config::DEFAULT_TAPE_SIZE,
            help: false,
            source: None,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Flags, String> {
    let mut flags = Flags::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-i" => flags.interpret = true,
            "-O" => flags.optimize = true,
            "-L" => flags.host_opts = true,
            "-p" => flags.print = true,
            "-h" => flags.help = true,
            "-o" => {
                i += 1;
                let path = args.get(i).ok_or("missing argument to -o")?;
                flags.output = Some(path.clone());
            }
            "-s" => {
                i += 1;
                let value = args.get(i).ok_or("missing argument to -s")?;
                flags.tape_size = value
                    .parse()
                    .map_err(|_| format!("invalid -s value: {value}"))?;
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(format!("unknown flag: {other}"));
            }
            other => flags.source = Some(other.to_string()),
        }
        i += 1;
    }
    Ok(flags)
}

fn print_usage() {
    eprintln!("usage: bfjit [-i] [-o FILE] [-O] [-L] [-p] [-s N] [-h] SOURCE");
    eprintln!("  -i        JIT-compile and run");
    eprintln!("  -o FILE   emit textual IR to FILE");
    eprintln!("  -O        run the CIR optimization pipeline before lowering");
    eprintln!("  -L        run the host backend's own optimizer passes");
    eprintln!("  -p        dump the CIR to stderr");
    eprintln!("  -s N      tape size in cells (default 10000)");
    eprintln!("  -h        this help");
}

fn run(args: &[String]) -> Result<i32, String> {
    let flags = parse_args(args)?;
    if flags.help {
        print_usage();
        return Ok(0);
    }
    let Some(source_path) = flags.source else {
        print_usage();
        return Ok(1);
    };

    let source = std::fs::read(&source_path)
        .map_err(|e| format!("failed to read {source_path}: {e}"))?;
    let program = ast::parse(&source).map_err(|e| e.to_string())?;

    let opts = CompileOptions {
        tape_size: flags.tape_size,
        optimize: flags.optimize,
        run_host_opts: flags.host_opts,
    };

    let context = Context::create();

    let module = if opts.optimize {
        let cir = translate::translate(&program);
        let canon = passes::canonicalize::canonicalize(&cir);
        let reduced = passes::simple_loop::eliminate(&canon);
        if flags.print {
            pretty::dump(&reduced, &mut std::io::stderr()).map_err(|e| e.to_string())?;
        }
        let (module, _main_fn) = codegen::from_cir::from_cir(&context, "bf", &reduced, &opts)
            .map_err(|e| e.to_string())?;
        module
    } else {
        if flags.print {
            let cir = translate::translate(&program);
            pretty::dump(&cir, &mut std::io::stderr()).map_err(|e| e.to_string())?;
        }
        let (module, _main_fn) = codegen::from_ast::from_ast(&context, "bf", &program, &opts)
            .map_err(|e| e.to_string())?;
        module
    };

    if opts.run_host_opts {
        codegen::run_host_passes(&module);
    }

    if let Some(out_path) = flags.output {
        let ir = module.print_to_string().to_string();
        std::fs::write(&out_path, ir).map_err(|e| format!("failed to write {out_path}: {e}"))?;
    }

    if flags.interpret {
        jit::run(&module).map_err(|e| e.to_string())?;
    }

    Ok(0)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(msg) => {
            let _ = writeln!(std::io::stderr(), "bfjit: {msg}");
            std::process::exit(1);
        }
    }
}
