//! End-to-end scenarios over real, `javac`-compiled class files.

use jclass_reader::{ClassFile, Error};

mod fixtures;

#[test]
fn minimal_class_has_expected_shape() {
    let bytes = fixtures::class_bytes("A");
    let class = ClassFile::parse(&bytes).unwrap();

    assert_eq!(class.version.major, class.version.major.max(45));
    assert_eq!(class.this_class, "A");
    assert_eq!(class.super_class.as_deref(), Some("java/lang/Object"));
    assert!(class.interfaces.is_empty());
    assert!(class.fields.is_empty());
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "<init>");
    assert_eq!(class.methods[0].descriptor, "()V");
    assert!(class.attribute("SourceFile").is_some());
}

#[test]
fn sample_class_has_field_interface_and_methods() {
    let bytes = fixtures::class_bytes("Sample");
    let class = ClassFile::parse(&bytes).unwrap();

    assert_eq!(class.this_class, "Sample");
    assert_eq!(class.interfaces, vec!["java/lang/Runnable".to_string()]);
    let answer = class.fields.iter().find(|f| f.name == "ANSWER").unwrap();
    assert_eq!(answer.descriptor, "I");
    assert!(class.find_method("run").is_some());
    assert!(class.find_method("count").is_some());
}

#[test]
fn bad_magic_is_rejected_at_offset_zero() {
    let bytes = [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0];
    let err = ClassFile::parse(&bytes).unwrap_err();
    assert!(matches!(err, Error::ClassFormat("invalid magic number")));
}

#[test]
fn truncated_input_reports_end_of_buffer() {
    let full = fixtures::class_bytes("A");
    let truncated = &full[..10];
    let err = ClassFile::parse(truncated).unwrap_err();
    assert!(matches!(err, Error::EndOfBuffer { .. }));
}

#[test]
fn parsing_twice_yields_equal_results() {
    let bytes = fixtures::class_bytes("Sample");
    let first = ClassFile::parse(&bytes).unwrap();
    let second = ClassFile::parse(&bytes).unwrap();
    assert_eq!(first.this_class, second.this_class);
    assert_eq!(first.fields.len(), second.fields.len());
    assert_eq!(first.methods.len(), second.methods.len());
}

#[test]
fn trailing_bytes_after_the_class_are_tolerated() {
    let mut bytes = fixtures::class_bytes("A");
    bytes.extend_from_slice(b"trailing garbage");
    ClassFile::parse(&bytes).unwrap();
}
