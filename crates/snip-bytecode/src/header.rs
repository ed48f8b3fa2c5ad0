//! Module image header (16 bytes).
//!
//! Layout, all little-endian:
//! - 0-3: magic `SNPB`
//! - 4-7: format version
//! - 8-11: CRC32 of the payload
//! - 12-15: total image size including the header

use super::{HEADER_SIZE, MAGIC, VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub checksum: u32,
    pub total_size: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
        }
    }
}

impl Header {
    /// Builds the header for a payload.
    pub fn for_payload(payload: &[u8]) -> Self {
        Self {
            checksum: crc32fast::hash(payload),
            total_size: (HEADER_SIZE + payload.len()) as u32,
            ..Default::default()
        }
    }

    /// Decode header from the first 16 bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let word = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: word(4),
            checksum: word(8),
            total_size: word(12),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic);
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        out[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        out
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}
