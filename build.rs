use std::{env, error::Error, fs, path::Path};

// Shared with the library so cfg.toml is checked before anything is flashed
#[allow(dead_code)]
#[path = "src/constants.rs"]
mod constants;
#[allow(dead_code)]
#[path = "src/validate.rs"]
mod validate;

#[path = "build/config_file.rs"]
mod config_file;

use config_file::{Source, CONFIG_ENV, CONFIG_EXAMPLE_FILE, CONFIG_FILE};

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if the config or its checks change
    println!("cargo:rerun-if-env-changed={}", CONFIG_ENV);
    println!("cargo:rerun-if-changed=build/config_file.rs");
    println!("cargo:rerun-if-changed=src/constants.rs");
    println!("cargo:rerun-if-changed=src/validate.rs");

    let crate_dir = env::var("CARGO_MANIFEST_DIR")?;
    let source = config_file::resolve(env::var(CONFIG_ENV).ok(), Path::new(&crate_dir));
    if let Source::Example(_) = source {
        println!(
            "cargo:warning={} not found, building with {} (touch {} after creating it)",
            CONFIG_FILE, CONFIG_EXAMPLE_FILE, CONFIG_EXAMPLE_FILE
        );
    }

    // Only watch the file actually read, a missing one would always look stale
    let path = source.path();
    println!("cargo:rerun-if-changed={}", path.display());

    // Read and parse
    let toml_str = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let raw = config_file::parse(&toml_str)
        .map_err(|e| format!("invalid {}: {}", path.display(), e))?;

    // Generate Rust code
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, raw.to_rust())?;
    Ok(())
}
