use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Only the firmware binary needs the memory layout; host builds skip it
    if env::var_os("CARGO_FEATURE_RT").is_none() {
        return;
    }

    // Copy memory.x into OUT_DIR so cortex-m-rt's link.x can find it
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("memory.x", out_dir.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
}
