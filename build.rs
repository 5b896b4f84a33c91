use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    compile_java_test_data();
}

fn compile_java_test_data() {
    if Command::new("javac").arg("-version").output().is_ok() {
        compile_java_files();
    } else {
        println!("cargo:warning=Can not find javac, skipping compilation of test fixtures");
    }
}

fn compile_java_files() {
    let build_path = PathBuf::from(env::var("OUT_DIR").unwrap()).join("java_classes");
    let test_data_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data");
    let Ok(dir) = fs::read_dir(&test_data_path) else {
        println!("cargo:warning=No test_data directory, skipping compilation of test fixtures");
        return;
    };
    let java_source_files: Vec<_> = dir
        .filter_map(|it| it.ok())
        .filter(|it| it.file_name().to_string_lossy().ends_with(".java"))
        .collect();
    fs::create_dir_all(&build_path).expect("Failed to create output dir for test fixtures");
    for java_file in java_source_files {
        println!("cargo:rerun-if-changed={}", java_file.path().display());
        let status = Command::new("javac")
            .arg("-g")
            .arg("-d")
            .arg(&build_path)
            .arg(java_file.path())
            .status()
            .expect("Failed to invoke javac");
        assert!(status.success(), "javac failed to compile test fixture");
    }
}
