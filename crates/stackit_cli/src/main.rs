//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stackit_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("stackit_core status={}", stackit_core::ping());
    println!("stackit_core version={}", stackit_core::core_version());
}
