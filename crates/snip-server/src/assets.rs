//! Static resources served by the `files` route.
//!
//! [`AssetTable`] is a read-only lookup table built once at startup. The
//! embedded variant carries the web UI compiled into the binary.

use std::collections::HashMap;
use std::path::Path;

use axum::body::Bytes;
use thiserror::Error;

pub const INDEX: &str = "index.html";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const EMBEDDED: &[(&str, &[u8])] = &[
    ("index.html", include_bytes!("../assets/index.html")),
    ("app.js", include_bytes!("../assets/app.js")),
    ("app.css", include_bytes!("../assets/app.css")),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("invalid resource path: {0}")]
    InvalidPath(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Maps a request path to a resource.
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Result<Resource, ResolveError>;
}

#[derive(Clone, Debug, Default)]
pub struct AssetTable {
    entries: HashMap<String, Resource>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The web UI embedded at build time.
    pub fn embedded() -> Self {
        EMBEDDED
            .iter()
            .fold(Self::new(), |table, &(name, bytes)| {
                table.with(name, Bytes::from_static(bytes))
            })
    }

    /// Adds an entry; the content type comes from the name's extension.
    pub fn with(mut self, name: &str, bytes: impl Into<Bytes>) -> Self {
        let key = name.trim_matches('/').to_lowercase();
        let resource = Resource {
            content_type: content_type_for(&key),
            bytes: bytes.into(),
        };
        self.entries.insert(key, resource);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceResolver for AssetTable {
    fn resolve(&self, path: &str) -> Result<Resource, ResolveError> {
        let key = normalize(path)?;
        self.entries
            .get(&key)
            .cloned()
            .ok_or(ResolveError::NotFound(key))
    }
}

/// Lookup key for a request path.
///
/// Leading and trailing slashes go, a leading `files/` segment is dropped,
/// the empty path means [`INDEX`], and the result is lower-cased.
pub fn normalize(path: &str) -> Result<String, ResolveError> {
    let trimmed = path.trim_matches('/');
    let relative = match trimmed.split_once('/') {
        Some((first, rest)) if first.eq_ignore_ascii_case("files") => rest,
        None if trimmed.eq_ignore_ascii_case("files") => "",
        _ => trimmed,
    };

    if relative.contains('\\') || relative.split('/').any(|s| s == "..") {
        return Err(ResolveError::InvalidPath(path.to_owned()));
    }

    if relative.is_empty() {
        return Ok(INDEX.to_owned());
    }
    Ok(relative.to_lowercase())
}

pub fn content_type_for(name: &str) -> &'static str {
    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "js" | "mjs" => "text/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
