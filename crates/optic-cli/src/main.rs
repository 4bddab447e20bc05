use std::path::PathBuf;
use std::process;

use optic_compiler::{compile, defaults};
use optic_core::LensSystem;

struct Args {
    input: Option<PathBuf>,
    shader: Option<PathBuf>,
    block: Option<PathBuf>,
    layout: Option<PathBuf>,
    debug_taps: bool,
}

fn print_usage() {
    eprintln!("Usage: lensc [OPTIONS]");
    eprintln!("  --input <path>    Prescription JSON (default: built-in double-Gauss)");
    eprintln!("  --shader <path>   Write generated shader source (default: stdout)");
    eprintln!("  --block <path>    Write parameters as raw f32 in native byte order");
    eprintln!("  --layout <path>   Write offset table and cb_size as JSON");
    eprintln!("  --debug-taps      Emit per-surface ray observation buffers");
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        input: None,
        shader: None,
        block: None,
        layout: None,
        debug_taps: false,
    };

    let path_value = |i: &mut usize| -> PathBuf {
        *i += 1;
        match args.get(*i) {
            Some(value) => PathBuf::from(value),
            None => {
                eprintln!("Missing value for {}", args[*i - 1]);
                process::exit(1);
            }
        }
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => parsed.input = Some(path_value(&mut i)),
            "--shader" => parsed.shader = Some(path_value(&mut i)),
            "--block" => parsed.block = Some(path_value(&mut i)),
            "--layout" => parsed.layout = Some(path_value(&mut i)),
            "--debug-taps" => parsed.debug_taps = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let system = match &args.input {
        Some(path) => LensSystem::deserialize_file(path)?,
        None => {
            log::info!("No --input given, using the built-in double-Gauss prescription");
            defaults::default_lens_system()?
        }
    };

    let (source, block) = compile(&system, args.debug_taps);

    match &args.shader {
        Some(path) => {
            std::fs::write(path, &source)?;
            log::info!("Wrote shader source to {}", path.display());
        }
        None => print!("{source}"),
    }

    if let Some(path) = &args.block {
        let params = block.to_f32_vec();
        std::fs::write(path, bytemuck::cast_slice::<f32, u8>(&params))?;
        log::info!("Wrote {} parameters to {}", block.cb_size, path.display());
    }

    if let Some(path) = &args.layout {
        let json = serde_json::to_string_pretty(&block.layout())?;
        std::fs::write(path, json)?;
        log::info!("Wrote block layout to {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        process::exit(1);
    }
}
