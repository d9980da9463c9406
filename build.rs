fn main() {
    // UniFFI scaffolding is generated via proc-macros in uniffi_bindings.rs
    // using uniffi::setup_scaffolding!() macro - no UDL file needed

    // Prompt templates are pulled in with include_str!
    println!("cargo:rerun-if-changed=src/providers/prompts");
    println!("cargo:rerun-if-changed=src/render/style.css");
    println!("cargo:rerun-if-changed=src/uniffi_bindings.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
