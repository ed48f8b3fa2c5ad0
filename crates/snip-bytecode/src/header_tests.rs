use crate::{HEADER_SIZE, Header, MAGIC, VERSION};

#[test]
fn default_header_is_valid() {
    let header = Header::default();

    assert!(header.validate_magic());
    assert!(header.validate_version());
}

#[test]
fn bytes_roundtrip() {
    let header = Header {
        magic: MAGIC,
        version: VERSION,
        checksum: 0xDEAD_BEEF,
        total_size: 1234,
    };

    let bytes = header.to_bytes();

    assert_eq!(&bytes[0..4], b"SNPB");
    assert_eq!(Header::from_bytes(&bytes), header);
}

#[test]
fn payload_header_counts_itself() {
    let header = Header::for_payload(b"abc");

    assert_eq!(header.total_size as usize, HEADER_SIZE + 3);
    assert_eq!(header.checksum, crc32fast::hash(b"abc"));
}
