//! Build script for storefront crate.
//!
//! Fingerprints the stylesheet so `/static/css/derived/main.<hash>.css` can be
//! served with a long cache lifetime.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    fingerprint_css();
}

/// Hash `static/css/main.css` and write a fingerprinted copy next to it.
///
/// Sets `CSS_HASH` for use with `env!("CSS_HASH")`. An empty hash makes the
/// `stylesheet` template filter link the unfingerprinted file.
fn fingerprint_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_dir = Path::new(&manifest_dir).join("static/css");
    let css_path = css_dir.join("main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest.get(..8).unwrap_or(&digest);

    let derived_dir = css_dir.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::copy(&css_path, derived_dir.join(format!("main.{short_hash}.css")))
        .expect("Failed to copy CSS to derived directory");

    println!("cargo:rustc-env=CSS_HASH={short_hash}");
}
