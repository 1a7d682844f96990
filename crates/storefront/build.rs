//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so they
//! can be served with immutable cache headers.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_asset("css", "main", "css", "CSS_HASH");
    hash_asset("js", "app", "js", "JS_HASH");
}

/// Hash `static/{dir}/{stem}.{ext}` and copy it to `static/{dir}/derived`
/// with the hash in the filename.
///
/// Sets `env_var` for use with `env!(...)`. The variable is empty when the
/// asset is missing, in which case templates fall back to the unhashed file.
fn hash_asset(dir: &str, stem: &str, ext: &str, env_var: &str) {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let asset_path = Path::new(&manifest_dir)
        .join("static")
        .join(dir)
        .join(format!("{stem}.{ext}"));

    println!("cargo:rerun-if-changed={}", asset_path.display());

    let content = match fs::read(&asset_path) {
        Ok(content) => content,
        Err(e) => {
            println!(
                "cargo:warning=Could not read {}: {e}",
                asset_path.display()
            );
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    // First 8 hex chars of SHA-256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];

    println!("cargo:rustc-env={env_var}={short_hash}");

    let derived_dir = Path::new(&manifest_dir)
        .join("static")
        .join(dir)
        .join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");

    let derived_path = derived_dir.join(format!("{stem}.{short_hash}.{ext}"));
    fs::copy(&asset_path, &derived_path).expect("Failed to copy asset to derived directory");
}
