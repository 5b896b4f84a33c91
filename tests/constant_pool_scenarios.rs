//! Hand-built constant pool byte sequences exercising the ghost-slot rule
//! and malformed-tag recovery, independent of any real class file.

use jclass_reader::{ByteCursor, ConstantPool, ConstantTag, Endianness, Error, StrictMode};

fn utf8_entry(s: &str) -> Vec<u8> {
    let mut bytes = vec![1u8];
    let encoded = cesu8::to_java_cesu8(s);
    bytes.extend_from_slice(&u16::try_from(encoded.len()).unwrap().to_be_bytes());
    bytes.extend_from_slice(&encoded);
    bytes
}

#[test]
fn s2_pool_slot_rule_around_a_long_entry() {
    // pool_count = 5: index 1 a Utf8, index 2 a Long (occupying 2 and the
    // ghost at 3), index 4 another Utf8.
    let mut bytes = utf8_entry("before");
    bytes.push(5); // Long tag
    bytes.extend_from_slice(&123_456_789_i64.to_be_bytes());
    bytes.extend(utf8_entry("after"));
    let mut cursor = ByteCursor::new(&bytes, Endianness::Big);
    let pool = ConstantPool::parse(&mut cursor, 5, StrictMode(true)).unwrap();

    assert_eq!(pool.resolve::<i64>(2).unwrap(), 123_456_789);
    let err = pool.get(3).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidIndex {
            index: 3,
            pool_size: 5
        }
    ));
    assert_eq!(pool.resolve::<String>(4).unwrap(), "after");
}

#[test]
fn s3_malformed_tag_recovers_in_non_strict_mode() {
    let mut bytes = utf8_entry("first");
    bytes.push(0x02); // reserved tag, never valid
    bytes.extend(utf8_entry("after-rewind"));
    let mut cursor = ByteCursor::new(&bytes, Endianness::Big);
    let pool = ConstantPool::parse(&mut cursor, 4, StrictMode(false)).unwrap();

    assert_eq!(pool.resolve::<String>(1).unwrap(), "first");
    assert_eq!(pool.get(2).unwrap().tag(), ConstantTag::Malformed);
}

#[test]
fn s3_malformed_tag_is_fatal_in_strict_mode() {
    let mut bytes = utf8_entry("first");
    bytes.push(0x02);
    let mut cursor = ByteCursor::new(&bytes, Endianness::Big);
    let err = ConstantPool::parse(&mut cursor, 3, StrictMode(true)).unwrap_err();
    assert!(matches!(err, Error::ClassFormat("invalid constant tag")));
}

#[test]
fn resolve_string_through_class_entry_matches_direct_utf8_lookup() {
    let mut bytes = utf8_entry("java/lang/Object");
    bytes.push(7); // Class tag
    bytes.extend_from_slice(&1u16.to_be_bytes());
    let mut cursor = ByteCursor::new(&bytes, Endianness::Big);
    let pool = ConstantPool::parse(&mut cursor, 3, StrictMode(true)).unwrap();

    assert_eq!(
        pool.resolve::<String>(2).unwrap(),
        pool.resolve::<String>(1).unwrap()
    );
}
