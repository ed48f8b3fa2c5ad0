//! Compiled module image.
//!
//! An image is a [`Header`] followed by a postcard-encoded payload holding
//! the constant pool, the member name table and the function table.
//! Function 0 is always the entry point.

use serde::{Deserialize, Serialize};

use super::header::Header;
use super::instructions::Instruction;
use super::{ENTRY_POINT, HEADER_SIZE, VERSION};

/// Constant pool entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Char(char),
    Str(String),
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Function table entry.
///
/// Parameters are slots in the shared frame; the VM saves and restores them
/// around each invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<u16>,
    pub code: Vec<Instruction>,
}

/// Module load error.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("invalid magic: expected SNPB")]
    InvalidMagic,
    #[error("unsupported version: {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("image too small: {0} bytes (minimum {HEADER_SIZE})")]
    FileTooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {header:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { header: u32, computed: u32 },
    #[error("malformed payload")]
    Payload(#[from] postcard::Error),
    #[error("entry point `{0}` not found")]
    MissingEntryPoint(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unit name, e.g. `Snippet_3_9f0c..`.
    pub name: String,
    pub constants: Vec<Constant>,
    /// Member and method names referenced by `GetMember`/`CallMethod`.
    pub names: Vec<String>,
    pub functions: Vec<Function>,
    /// Number of slots in the shared frame.
    pub locals: u16,
}

impl Module {
    /// Decodes an image, verifying magic, version, size and checksum.
    pub fn load(bytes: &[u8]) -> Result<Self, ModuleError> {
        let Some((head, payload)) = bytes.split_first_chunk::<HEADER_SIZE>() else {
            return Err(ModuleError::FileTooSmall(bytes.len()));
        };
        let header = Header::from_bytes(head);

        if !header.validate_magic() {
            return Err(ModuleError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(ModuleError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != bytes.len() {
            return Err(ModuleError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            });
        }
        let computed = crc32fast::hash(payload);
        if computed != header.checksum {
            return Err(ModuleError::ChecksumMismatch {
                header: header.checksum,
                computed,
            });
        }

        Ok(postcard::from_bytes(payload)?)
    }

    /// Encodes the module into a checksummed image.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModuleError> {
        let payload = postcard::to_allocvec(self)?;
        let header = Header::for_payload(&payload);
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Finds a zero-parameter function by name.
    pub fn entry_point(&self, name: &str) -> Result<u16, ModuleError> {
        self.functions
            .iter()
            .position(|f| f.name == name && f.params.is_empty())
            .map(|i| i as u16)
            .ok_or_else(|| ModuleError::MissingEntryPoint(name.to_owned()))
    }

    /// The conventional `Execute` entry point.
    pub fn default_entry_point(&self) -> Result<u16, ModuleError> {
        self.entry_point(ENTRY_POINT)
    }

    pub fn name_at(&self, index: u16) -> &str {
        self.names.get(index as usize).map_or("?", String::as_str)
    }
}
