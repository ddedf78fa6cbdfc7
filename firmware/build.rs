//! Linker scripts for cortex-m-rt and defmt. Passed from here rather than
//! `.cargo/config.toml` so they apply when building from the workspace root.

fn main() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
