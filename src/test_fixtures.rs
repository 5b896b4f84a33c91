//! Loads the `.class` files `build.rs` compiles from `test_data/*.java`,
//! for use by this crate's own unit tests.

const JAVA_CLASSES_DIR: &str = concat!(env!("OUT_DIR"), "/java_classes");

/// Reads the compiled bytes of `test_data/{name}.java`'s top-level class.
///
/// # Panics
/// Panics if `javac` was unavailable when this crate was built, or if no
/// source file named `{name}.java` exists under `test_data/`.
pub(crate) fn class_bytes(name: &str) -> Vec<u8> {
    let path = format!("{JAVA_CLASSES_DIR}/{name}.class");
    std::fs::read(&path).unwrap_or_else(|err| {
        panic!("missing compiled test fixture {path} (is javac installed?): {err}")
    })
}
