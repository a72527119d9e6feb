//! Compiles the generated RCL parser when it is present.
//!
//! `tree-sitter generate` writes `src/parser.c` (and the `src/tree_sitter/`
//! headers). Without it the crate still builds, but the linked binding reports
//! the grammar as missing at runtime.

use std::path::Path;

fn main() {
    let src_dir = Path::new("src");

    println!("cargo:rustc-check-cfg=cfg(rcl_grammar)");
    println!("cargo:rustc-check-cfg=cfg(rcl_node_types)");
    // Without `src/` no directive is printed, so cargo falls back to rerunning
    // when any package file changes, which catches a newly generated parser.
    if src_dir.exists() {
        println!("cargo:rerun-if-changed=src");
    }

    let parser_path = src_dir.join("parser.c");
    if !parser_path.exists() {
        println!("cargo:warning=src/parser.c not found; run `tree-sitter generate` to link the RCL grammar");
        return;
    }

    let mut c_config = cc::Build::new();
    c_config.std("c11").include(src_dir);
    c_config.flag_if_supported("-Wno-unused-parameter");
    c_config.flag_if_supported("-Wno-unused-but-set-variable");
    c_config.flag_if_supported("-Wno-trigraphs");
    #[cfg(target_env = "msvc")]
    c_config.flag("-utf-8");

    c_config.file(&parser_path);
    println!("cargo:rerun-if-changed={}", parser_path.display());

    let scanner_path = src_dir.join("scanner.c");
    if scanner_path.exists() {
        c_config.file(&scanner_path);
        println!("cargo:rerun-if-changed={}", scanner_path.display());
    }

    c_config.compile("tree-sitter-rcl");
    println!("cargo:rustc-cfg=rcl_grammar");

    if src_dir.join("node-types.json").exists() {
        println!("cargo:rustc-cfg=rcl_node_types");
    }
}
