use entity_metadata::{
    BlockCoordinates, EntryTag, Item, MetadataDictionary, MetadataEntry, MetadataValue,
};
use std::io::Cursor;

fn every_variant() -> MetadataDictionary {
    let mut metadata = MetadataDictionary::new();
    metadata.set(0, MetadataEntry::byte(0x10));
    metadata.set(1, MetadataEntry::short(300));
    metadata.set(7, MetadataEntry::int(-20));
    metadata.set(8, MetadataEntry::float(0.6));
    metadata.set(2, MetadataEntry::string("Steve"));
    metadata.set(10, MetadataEntry::slot(Item::new(276, 1, 3)));
    metadata.set(17, MetadataEntry::int_coordinates(BlockCoordinates::new(-5, 64, 12)));
    metadata.set(20, MetadataEntry::long(-1));
    metadata
}

#[test]
fn test_concrete_byte_and_slot_stream() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(0, MetadataEntry::byte(3));
    metadata.set(1, MetadataEntry::slot(Item::new(5, 1, 0)));

    let bytes = metadata.to_bytes().unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x03, 0xA1, 0x00, 0x05, 0x01, 0x00, 0x00, 0x7F]
    );

    let decoded = MetadataDictionary::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get(0).unwrap().value, MetadataValue::Byte(3));
    assert_eq!(
        decoded.get(1).unwrap().value,
        MetadataValue::Slot(Item::new(5, 1, 0))
    );
    assert_eq!(decoded, metadata);
}

#[test]
fn test_every_variant_roundtrip() {
    let metadata = every_variant();

    let mut buffer = Vec::new();
    metadata.write(&mut buffer).unwrap();
    assert_eq!(buffer.len(), metadata.encoded_len());
    assert_eq!(*buffer.last().unwrap(), 0x7F);

    let mut cursor = Cursor::new(buffer.clone());
    let loaded = MetadataDictionary::read(&mut cursor).unwrap();
    assert_eq!(cursor.position() as usize, buffer.len());

    assert_eq!(loaded, metadata);
    for (key, entry) in loaded.iter() {
        assert_eq!(entry.index, key, "decoded index mismatch at key {}", key);
        assert_eq!(
            entry.tag(),
            metadata.get(key).unwrap().tag(),
            "tag mismatch at key {}",
            key
        );
    }

    let buffer2 = loaded.to_bytes().unwrap();
    assert_eq!(buffer, buffer2);
}

#[test]
fn test_float_bits_preserved() {
    for value in [0.0f32, -0.0, 1.5e-42, f32::INFINITY, f32::NAN, -123.456] {
        let mut metadata = MetadataDictionary::new();
        metadata.set(4, MetadataEntry::float(value));

        let decoded = MetadataDictionary::from_bytes(&metadata.to_bytes().unwrap()).unwrap();
        match decoded.get(4).unwrap().value {
            MetadataValue::Float(f) => assert_eq!(f.to_bits(), value.to_bits()),
            ref other => panic!("Expected float, got {:?}", other),
        }
    }
}

#[test]
fn test_string_payload_layout() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(2, MetadataEntry::string("Hé"));

    let bytes = metadata.to_bytes().unwrap();
    assert_eq!(bytes, vec![0x82, 0x00, 0x03, b'H', 0xC3, 0xA9, 0x7F]);

    let decoded = MetadataDictionary::from_bytes(&bytes).unwrap();
    assert_eq!(
        decoded.get(2).unwrap().value,
        MetadataValue::String("Hé".to_owned())
    );
}

#[test]
fn test_empty_dictionary() {
    let metadata = MetadataDictionary::new();
    assert!(metadata.is_empty());
    assert_eq!(metadata.to_bytes().unwrap(), vec![0x7F]);
    assert_eq!(metadata.to_string(), "");

    let decoded = MetadataDictionary::from_bytes(&[0x7F]).unwrap();
    assert_eq!(decoded.len(), 0);
}

#[test]
fn test_decode_stops_at_sentinel() {
    let bytes = [0x00, 0x01, 0x7F, 0x00, 0x02, 0x7F];
    let mut cursor = Cursor::new(&bytes[..]);

    let first = MetadataDictionary::read(&mut cursor).unwrap();
    assert_eq!(first.get(0).unwrap().value, MetadataValue::Byte(1));
    assert_eq!(cursor.position(), 3);

    let second = MetadataDictionary::read(&mut cursor).unwrap();
    assert_eq!(second.get(0).unwrap().value, MetadataValue::Byte(2));
}

#[test]
fn test_decode_order_independent() {
    let forward = [0x00, 0x09, 0x21, 0x01, 0x00, 0x7F];
    let backward = [0x21, 0x01, 0x00, 0x00, 0x09, 0x7F];

    let a = MetadataDictionary::from_bytes(&forward).unwrap();
    let b = MetadataDictionary::from_bytes(&backward).unwrap();
    assert_eq!(a, b);
    assert_eq!(b.get(1).unwrap().value, MetadataValue::Short(256));
}

#[test]
fn test_duplicate_index_last_wins() {
    let bytes = [0x05, 0x01, 0x45, 0x00, 0x00, 0x00, 0x02, 0x7F];
    let decoded = MetadataDictionary::from_bytes(&bytes).unwrap();

    assert_eq!(decoded.len(), 1);
    let entry = decoded.get(5).unwrap();
    assert_eq!(entry.tag(), EntryTag::Int);
    assert_eq!(entry.value, MetadataValue::Int(2));
}

#[test]
fn test_key_masking() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(35, MetadataEntry::byte(9));

    let bytes = metadata.to_bytes().unwrap();
    assert_eq!(bytes[0] & 0x1F, 3);
    assert_eq!(bytes[0] >> 5, EntryTag::Byte as u8);

    let decoded = MetadataDictionary::from_bytes(&bytes).unwrap();
    assert!(decoded.contains(3));
    assert!(!decoded.contains(35));
    assert_eq!(decoded.get(3).unwrap().index, 3);
}

#[test]
fn test_overwrite_keeps_count() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(5, MetadataEntry::byte(1));
    metadata.set(6, MetadataEntry::byte(2));
    metadata.set(5, MetadataEntry::string("B"));

    assert_eq!(metadata.len(), 2);
    assert_eq!(
        metadata.get(5).unwrap().value,
        MetadataValue::String("B".to_owned())
    );
    assert_eq!(metadata.to_string(), "[5] (string) B, [6] (byte) 2");
}

#[test]
fn test_set_does_not_touch_entry_index() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(12, MetadataEntry::with_index(4, 7i32));
    assert_eq!(metadata.get(12).unwrap().index, 4);

    let bytes = metadata.to_bytes().unwrap();
    assert_eq!(bytes[0], (2 << 5) | 12);
}

#[test]
fn test_values_snapshot() {
    let mut metadata = every_variant();
    let snapshot = metadata.values();
    metadata.get_mut(0).unwrap().value = MetadataValue::Byte(0);

    assert_eq!(snapshot.len(), 8);
    assert_eq!(snapshot[0].value, MetadataValue::Byte(0x10));
    let tags: Vec<EntryTag> = snapshot.iter().map(|e| e.tag()).collect();
    for tag in EntryTag::ALL {
        assert!(tags.contains(&tag), "missing {:?}", tag);
    }
}

#[test]
fn test_render() {
    let mut metadata = MetadataDictionary::new();
    metadata.set(0, MetadataEntry::byte(3));
    metadata.set(1, MetadataEntry::slot(Item::new(5, 1, 0)));
    metadata.set(7, MetadataEntry::long(42));

    assert_eq!(
        metadata.to_string(),
        "[0] (byte) 3, [1] (slot) id: 5, count: 1, metadata: 0, [7] (long) 42"
    );
}
