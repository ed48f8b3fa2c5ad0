/// Output of a successful compilation: an in-memory module image.
///
/// Lives for a single invocation; the executor drops it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledUnit {
    /// `Snippet_<counter>_<uuid>`, unique per compilation.
    pub name: String,
    pub image: Vec<u8>,
    /// Name of the zero-argument method to invoke.
    pub entry: String,
}

impl CompiledUnit {
    pub fn new(name: impl Into<String>, image: Vec<u8>, entry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image,
            entry: entry.into(),
        }
    }
}
