//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so templates can link an immutable,
//! content-addressed copy (`static/css/derived/main.<hash>.css`).

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| String::from(".")),
    );
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    match fingerprint_css(&manifest_dir, &css_path) {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Copy main.css to `derived/main.<hash>.css` and return the 8-char hash.
fn fingerprint_css(manifest_dir: &Path, css_path: &Path) -> io::Result<String> {
    let content = fs::read(css_path)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash: String = digest.chars().take(8).collect();

    let derived_dir = manifest_dir.join("static/css/derived");
    fs::create_dir_all(&derived_dir)?;
    fs::copy(css_path, derived_dir.join(format!("main.{short_hash}.css")))?;

    Ok(short_hash)
}
