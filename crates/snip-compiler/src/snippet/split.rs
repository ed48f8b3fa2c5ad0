/// A non-blank physical line of the submitted snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnippetLine<'s> {
    /// 1-based line number in the snippet.
    pub number: u32,
    pub text: &'s str,
}

/// Import lines and body lines, each in their original order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitSnippet<'s> {
    pub imports: Vec<SnippetLine<'s>>,
    pub body: Vec<SnippetLine<'s>>,
}

/// Splits into physical lines and drops blank ones.
///
/// A line is an import when its trimmed text starts with `using ` and ends
/// with `;`. Anything else, including `using` lines without the semicolon,
/// belongs to the body.
pub fn split(snippet: &str) -> SplitSnippet<'_> {
    let mut out = SplitSnippet::default();

    for (index, text) in lines(snippet).enumerate() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line = SnippetLine {
            number: index as u32 + 1,
            text,
        };
        if is_import(trimmed) {
            out.imports.push(line);
        } else {
            out.body.push(line);
        }
    }

    out
}

fn is_import(trimmed: &str) -> bool {
    trimmed.starts_with("using ") && trimmed.ends_with(';')
}

/// `\r\n`, `\n` and a lone `\r` each end one line.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(at) => {
                let skip = if current[at..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[at + skip..]);
                Some(&current[..at])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
