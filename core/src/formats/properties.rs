//! Java `.properties` handler
//!
//! Line-oriented and best effort: one `key=value` per line, `#`/`!`
//! comments and blank lines skipped, the first `=` separates key from
//! value. Lines without a usable key are dropped, never fatal. Unicode
//! escapes and `\` continuation lines are kept verbatim.

use log::debug;

use super::{FileFormat, FormatHandler, ParsedFile, PropertyMap};

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesHandler;

impl PropertiesHandler {
    pub fn new() -> Self {
        Self
    }
}

/// Outcome of reading a single line
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Malformed,
    Entry(&'a str, &'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
        return Line::Skip;
    }

    match trimmed.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() {
                Line::Malformed
            } else {
                Line::Entry(key, value.trim())
            }
        }
        None => Line::Malformed,
    }
}

impl FormatHandler for PropertiesHandler {
    fn parse(&self, content: &str, language: &str) -> ParsedFile {
        let mut properties = PropertyMap::new();
        let mut malformed = 0usize;

        for line in content.lines() {
            match classify(line) {
                Line::Skip => {}
                Line::Malformed => malformed += 1,
                Line::Entry(key, value) => {
                    // last occurrence wins
                    properties.insert(key.to_string(), value.to_string());
                }
            }
        }

        if malformed > 0 {
            debug!(
                "dropped {} malformed line(s) while parsing '{}'",
                malformed, language
            );
        }

        ParsedFile::new(language, properties)
    }

    fn serialize(&self, entries: &[(&str, &str)]) -> String {
        let mut out = String::new();
        for (key, value) in entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    fn format(&self) -> FileFormat {
        FileFormat::Properties
    }
}

/// Parse one file's text with the properties handler.
pub fn parse(content: &str, language: &str) -> ParsedFile {
    PropertiesHandler::new().parse(content, language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn last_duplicate_wins() {
        let parsed = parse("k=1\nk=2", "en");
        assert_eq!(parsed.properties, props(&[("k", "2")]));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let parsed = parse("# comment\n\nk=v", "en");
        assert_eq!(parsed.properties, props(&[("k", "v")]));

        let parsed = parse("! bang comment\n   \n  # indented\nk=v", "en");
        assert_eq!(parsed.properties, props(&[("k", "v")]));
    }

    #[test]
    fn skips_lines_without_separator() {
        let parsed = parse("novalueline\nk=v", "en");
        assert_eq!(parsed.properties, props(&[("k", "v")]));
    }

    #[test]
    fn skips_lines_with_empty_key() {
        let parsed = parse("=orphan\n  = also orphan\nk=v", "en");
        assert_eq!(parsed.properties, props(&[("k", "v")]));
    }

    #[test]
    fn splits_on_first_equals_and_trims() {
        let parsed = parse("  url =  http://x.test/?a=b&c=d  \nempty=", "en");
        assert_eq!(
            parsed.properties,
            props(&[("url", "http://x.test/?a=b&c=d"), ("empty", "")])
        );
        assert_eq!(parsed.language, "en");
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let parsed = parse("a=1\r\nb=2\r\n", "en");
        assert_eq!(parsed.properties, props(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn escapes_and_continuations_stay_verbatim() {
        let parsed = parse("greet=caf\\u00e9\nlong=first \\\nsecond", "fr");
        assert_eq!(parsed.properties["greet"], "caf\\u00e9");
        assert_eq!(parsed.properties["long"], "first \\");
        assert!(!parsed.properties.contains_key("second"));
    }

    #[test]
    fn serialize_writes_one_line_per_entry() {
        let handler = PropertiesHandler::new();
        let text = handler.serialize(&[("b", "2"), ("a", ""), ("c", "x=y")]);
        assert_eq!(text, "b=2\na=\nc=x=y\n");
        assert_eq!(handler.serialize(&[]), "");
    }

    #[test]
    fn serialize_then_parse_restores_mapping() {
        let handler = PropertiesHandler::new();
        let original = props(&[
            ("app.title", "Properties Editor"),
            ("button.save", "Save"),
            ("query", "a=b"),
            ("blank", ""),
        ]);
        let entries: Vec<(&str, &str)> = original
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let reparsed = handler.parse(&handler.serialize(&entries), "en");
        assert_eq!(reparsed.properties, original);
    }
}
