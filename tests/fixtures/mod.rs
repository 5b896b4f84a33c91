//! Shared helper for loading the `.class` files `build.rs` compiles from
//! `test_data/*.java`.

const JAVA_CLASSES_DIR: &str = concat!(env!("OUT_DIR"), "/java_classes");

#[allow(dead_code)]
pub fn class_bytes(name: &str) -> Vec<u8> {
    let path = format!("{JAVA_CLASSES_DIR}/{name}.class");
    std::fs::read(&path).unwrap_or_else(|err| panic!("missing compiled test fixture {path}: {err}"))
}
