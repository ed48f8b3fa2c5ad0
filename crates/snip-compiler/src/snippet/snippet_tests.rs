use indoc::indoc;
use rowan::TextSize;

use super::*;

fn texts<'s>(lines: &[SnippetLine<'s>]) -> Vec<(u32, &'s str)> {
    lines.iter().map(|l| (l.number, l.text)).collect()
}

#[test]
fn split_separates_imports_and_drops_blank_lines() {
    let snippet = indoc! {"
        using System.Text;

          var sb = new StringBuilder();
        using (x)
        return sb;
    "};
    let split = split(snippet);

    assert_eq!(texts(&split.imports), [(1, "using System.Text;")]);
    assert_eq!(
        texts(&split.body),
        [(3, "  var sb = new StringBuilder();"), (4, "using (x)"), (5, "return sb;")]
    );
}

#[test]
fn split_recognizes_every_line_ending() {
    let split = split("a;\r\nb;\rc;\nd;");

    assert_eq!(
        texts(&split.body),
        [(1, "a;"), (2, "b;"), (3, "c;"), (4, "d;")]
    );
}

#[test]
fn indented_import_is_still_an_import() {
    let split = split("   using System.IO;  \nreturn 1;");

    assert_eq!(texts(&split.imports), [(1, "   using System.IO;  ")]);
}

#[test]
fn import_set_starts_with_baseline() {
    let imports = ImportSet::new();
    let texts: Vec<&str> = imports.iter().map(|(text, _)| text).collect();

    assert_eq!(texts, BASELINE_IMPORTS);
    assert!(imports.iter().all(|(_, origin)| origin.is_none()));
}

#[test]
fn import_set_deduplicates_on_trimmed_text() {
    let mut imports = ImportSet::new();

    assert!(!imports.insert("  using System;", 4));
    assert!(imports.insert("  using System.Text;", 2));
    assert!(!imports.insert("using System.Text;", 5));

    assert_eq!(imports.len(), 4);
    let (text, origin) = imports.iter().last().unwrap();
    assert_eq!(text, "using System.Text;");
    assert_eq!(origin, Some(Import { line: 2, indent: 2 }));
}

#[test]
fn unit_counter_is_monotonic() {
    let counter = UnitCounter::new();
    assert_eq!(counter.current(), 0);
    assert_eq!(counter.next(), 1);
    assert_eq!(counter.next(), 2);
    assert_eq!(counter.current(), 2);
}

#[test]
fn unit_names_carry_counter_and_uuid() {
    let counter = UnitCounter::new();
    let first = unit_name(&counter);
    let second = unit_name(&counter);

    assert!(first.starts_with("Snippet_1_"));
    assert!(second.starts_with("Snippet_2_"));
    let suffix = first.trim_start_matches("Snippet_1_");
    assert_eq!(suffix.len(), 32);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first.trim_start_matches("Snippet_1_"), second.trim_start_matches("Snippet_2_"));
}

#[test]
fn synthesized_unit_layout() {
    let snippet = "using System.Text;\nreturn 1;";
    let split = split(snippet);
    let mut imports = ImportSet::new();
    for line in &split.imports {
        imports.insert(line.text, line.number);
    }

    let unit = synthesize(&imports, &split.body, "Snippet_T");

    insta::assert_snapshot!(unit.text, @r"
    using System;
    using System.Collections.Generic;
    using System.Linq;
    using System.Text;
    public class Snippet_T
    {
    public object Execute()
    {
    return 1;
    }
    }
    ");
    assert_eq!(unit.line_map.len(), 11);
}

#[test]
fn locate_maps_body_offsets_back_to_snippet_lines() {
    let body = [SnippetLine {
        number: 3,
        text: "  return x;",
    }];
    let unit = synthesize(&ImportSet::new(), &body, "Snippet_T");

    let offset = unit.text.find("x;").unwrap() as u32;
    let location = unit.locate(TextSize::from(offset)).unwrap();

    assert_eq!(location, Location { line: 3, column: 10 });
    assert_eq!(location.to_string(), "(3,10)");
}

#[test]
fn locate_accounts_for_trimmed_import_indent() {
    let mut imports = ImportSet::new();
    imports.insert("    using Nope;", 1);
    let unit = synthesize(&imports, &[], "Snippet_T");

    let offset = unit.text.find("Nope").unwrap() as u32;
    let location = unit.locate(TextSize::from(offset)).unwrap();

    assert_eq!(location, Location { line: 1, column: 11 });
}

#[test]
fn scaffolding_has_no_snippet_position() {
    let unit = synthesize(&ImportSet::new(), &[], "Snippet_T");

    let offset = unit.text.find("class").unwrap() as u32;
    assert_eq!(unit.locate(TextSize::from(offset)), None);
    assert_eq!(unit.locate(TextSize::from(0)), None);
}
