use rowan::TextSize;

use super::imports::ImportSet;
use super::split::SnippetLine;
use snip_bytecode::ENTRY_POINT;

/// A full compilation unit built around a snippet body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesized {
    pub text: String,
    pub line_map: LineMap,
}

impl Synthesized {
    /// Position in the snippet for an offset in the synthesized text.
    pub fn locate(&self, offset: TextSize) -> Option<Location> {
        self.line_map.locate(&self.text, offset)
    }
}

/// 1-based line and column in the submitted snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// Maps synthesized lines to the snippet lines they were copied from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineMap {
    lines: Vec<MappedLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MappedLine {
    /// Byte offset of the line start in the synthesized text.
    start: u32,
    /// Snippet line and the chars trimmed off its start; `None` for scaffolding.
    origin: Option<(u32, u32)>,
}

impl LineMap {
    /// Scaffolding lines have no snippet position.
    pub fn locate(&self, text: &str, offset: TextSize) -> Option<Location> {
        let offset = u32::from(offset);
        let index = self.lines.partition_point(|l| l.start <= offset).checked_sub(1)?;
        let line = self.lines[index];
        let (number, indent) = line.origin?;
        let prefix = text.get(line.start as usize..offset as usize)?;
        Some(Location {
            line: number,
            column: prefix.chars().count() as u32 + indent + 1,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct Writer {
    text: String,
    map: LineMap,
}

impl Writer {
    fn line(&mut self, content: &str, origin: Option<(u32, u32)>) {
        self.map.lines.push(MappedLine {
            start: self.text.len() as u32,
            origin,
        });
        self.text.push_str(content);
        self.text.push('\n');
    }
}

/// Imports one per line, then the class/method scaffolding around the body.
pub fn synthesize(imports: &ImportSet, body: &[SnippetLine<'_>], unit_name: &str) -> Synthesized {
    let mut w = Writer {
        text: String::new(),
        map: LineMap::default(),
    };

    for (text, origin) in imports.iter() {
        w.line(text, origin.map(|o| (o.line, o.indent)));
    }
    w.line(&format!("public class {unit_name}"), None);
    w.line("{", None);
    w.line(&format!("public object {ENTRY_POINT}()"), None);
    w.line("{", None);
    for line in body {
        w.line(line.text, Some((line.number, 0)));
    }
    w.line("}", None);
    w.line("}", None);

    Synthesized {
        text: w.text,
        line_map: w.map,
    }
}
