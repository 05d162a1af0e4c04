use std::fs;
use std::path::PathBuf;

use clap::Parser;

use bpatch::container::crc32;

#[derive(Parser)]
#[command(
    name = "bpatch-apply",
    about = "Rebuild a target file from a reference file and a binary patch"
)]
struct Args {
    /// Display version and quit
    #[arg(long)]
    version: bool,

    /// Reference (old) file the patch was generated against
    reference: Option<PathBuf>,
    /// Patch container produced by bpatch-create
    patch: Option<PathBuf>,
    /// Output path for the rebuilt target; defaults to rebuilt.bin
    output: Option<PathBuf>,
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

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.version {
        bpatch::version::print_cli_version_banner("Blockpatch Apply", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let reference_path = args
        .reference
        .as_ref()
        .ok_or("REFERENCE is required unless --version is specified")?;
    let patch_path = args
        .patch
        .as_ref()
        .ok_or("PATCH is required unless --version is specified")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("rebuilt.bin"));

    for p in [reference_path, patch_path] {
        if !p.is_file() {
            return Err(format!("'{}' not found", p.display()).into());
        }
    }

    let is_bin = patch_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("bin"))
        .unwrap_or(false);
    if !is_bin {
        return Err(format!(
            "unrecognised patch extension for '{}' (expected .bin)",
            patch_path.display()
        )
        .into());
    }

    let reference = fs::read(reference_path)?;
    let container = fs::read(patch_path)?;

    log::info!(
        "Reference: {} ({} bytes)",
        reference_path.display(),
        reference.len()
    );
    log::info!(
        "Patch:     {} ({} bytes)",
        patch_path.display(),
        container.len()
    );
    if let Some(&block_size) = container.first() {
        log::info!("Block size: {} bytes", block_size);
    }

    let rebuilt = bpatch::rebuild(&container, &reference)?;
    log::info!(
        "CRC-32 OK (0x{:08X}), reconstructed {} bytes",
        crc32(&rebuilt),
        rebuilt.len()
    );

    fs::write(&output, &rebuilt)?;
    log::info!("Wrote {}", output.display());

    Ok(())
}
