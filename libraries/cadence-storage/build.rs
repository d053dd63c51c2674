//! Build script for cadence-storage.
//!
//! The schema files are embedded with `include_str!`, so rebuild when they change.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
