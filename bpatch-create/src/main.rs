use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use bpatch::DEFAULT_BLOCK_SIZE;

#[derive(Parser)]
#[command(
    name = "bpatch-create",
    about = "Generate a block-based binary patch that rewrites a reference file into a target file"
)]
struct Args {
    /// Block size in bytes (multiple of 8, at most 248)
    #[arg(short = 'b', long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output patch path; defaults to <reference stem>_patch.bin
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Display version and quit
    #[arg(long)]
    version: bool,

    /// Reference (old) file
    reference: Option<PathBuf>,
    /// Target (new) file the patch reconstructs
    target: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Derive a default output path: <reference stem>_patch.bin alongside the reference.
fn default_output_path(reference: &Path) -> PathBuf {
    let stem = reference.file_stem().unwrap_or_default().to_string_lossy();
    reference.with_file_name(format!("{stem}_patch.bin"))
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.version {
        bpatch::version::print_cli_version_banner("Blockpatch Create", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let reference_path = args
        .reference
        .as_ref()
        .ok_or("REFERENCE is required unless --version is specified")?;
    let target_path = args
        .target
        .as_ref()
        .ok_or("TARGET is required unless --version is specified")?;

    for p in [reference_path, target_path] {
        if !p.is_file() {
            return Err(format!("'{}' not found", p.display()).into());
        }
    }

    let reference = fs::read(reference_path)?;
    let target = fs::read(target_path)?;

    log::info!(
        "Reference: {} ({} bytes)",
        reference_path.display(),
        reference.len()
    );
    log::info!(
        "Target:    {} ({} bytes)",
        target_path.display(),
        target.len()
    );
    log::info!("Building patch (block size {} bytes)...", args.block_size);

    let container = bpatch::create_patch(&reference, &target, args.block_size)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(reference_path));
    fs::write(&output, &container)?;

    if target.is_empty() {
        log::info!("Wrote {} ({} bytes)", output.display(), container.len());
    } else {
        let saved = (1.0 - container.len() as f64 / target.len() as f64) * 100.0;
        log::info!(
            "Wrote {} ({} bytes, {:.1}% smaller than the target)",
            output.display(),
            container.len(),
            saved
        );
    }

    Ok(())
}
