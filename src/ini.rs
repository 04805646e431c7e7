//! Minimal INI document parser.
//!
//! Understands the subset of the classic `configparser` dialect that the
//! config file uses:
//!
//! ```ini
//! # comment
//! [Commands]
//! shutdown = systemctl poweroff
//! logout: openbox --exit
//!
//! [Options]
//! force fake = yes
//! ```
//!
//! * Section names are case-sensitive.
//! * Keys are trimmed and lower-cased; they may contain spaces.
//! * `=` and `:` both separate a key from its value (first one wins).
//! * Full-line comments start with `#` or `;`.
//! * A line indented deeper than the option above it continues that
//!   option's value; the pieces are joined with `\n`.
//! * Text after the closing `]` of a section header is ignored.
//! * Lines before the first section header and lines without a delimiter
//!   are ignored.  Parsing never fails.
//!
//! Both sections and keys keep their file order.  A repeated section is
//! merged into the first occurrence; a repeated key overwrites the value
//! in place.

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: Vec<Section>,
}

/// One `[Name]` block and its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Look up a key.  `key` is matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extend a value with a continuation line.
    fn append(&mut self, key: &str, line: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            if !entry.1.is_empty() {
                entry.1.push('\n');
            }
            entry.1.push_str(line);
        }
    }

    fn set(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Document {
    /// Parse `text` into a document.
    pub fn parse(text: &str) -> Self {
        let mut doc = Document::default();
        let mut current: Option<usize> = None;
        // Section, key and indent of the last option, for continuation lines.
        let mut last: Option<(usize, String, usize)> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            if let Some((idx, key, key_indent)) = &last {
                if indent > *key_indent {
                    doc.sections[*idx].append(key, line);
                    continue;
                }
            }
            last = None;

            if let Some(header) = line.strip_prefix('[') {
                // The name runs up to the last `]`; anything after it is
                // ignored.  A malformed header like `[Commands` closes the
                // current section so its lines don't leak into the previous one.
                current = header
                    .rfind(']')
                    .map(|end| header[..end].trim())
                    .filter(|name| !name.is_empty())
                    .map(|name| doc.section_index_or_insert(name));
                continue;
            }

            let Some(idx) = current else {
                continue;
            };

            let Some(pos) = line.find(['=', ':']) else {
                continue;
            };
            let key = line[..pos].trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let value = line[pos + 1..].trim().to_string();
            doc.sections[idx].set(key.clone(), value);
            last = Some((idx, key, indent));
        }

        doc
    }

    /// Return the section called `name`, if present (case-sensitive).
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Convenience lookup of `key` inside section `name`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_in_order() {
        let doc = Document::parse(
            "[Commands]\nshutdown = systemctl poweroff\nlogout=openbox --exit\n\n[Options]\nopacity = 0.5\n",
        );
        let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Commands", "Options"]);

        let commands: Vec<(&str, &str)> = doc.section("Commands").unwrap().entries().collect();
        assert_eq!(
            commands,
            vec![("shutdown", "systemctl poweroff"), ("logout", "openbox --exit")]
        );
        assert_eq!(doc.get("Options", "opacity"), Some("0.5"));
    }

    #[test]
    fn keys_are_lowercased_and_may_contain_spaces() {
        let doc = Document::parse("[Options]\nForce Fake = yes\n");
        assert_eq!(doc.get("Options", "force fake"), Some("yes"));
        assert_eq!(doc.get("Options", "FORCE FAKE"), Some("yes"));
    }

    #[test]
    fn section_names_are_case_sensitive() {
        let doc = Document::parse("[commands]\nfoo = bar\n");
        assert!(doc.section("Commands").is_none());
        assert!(doc.section("commands").is_some());
    }

    #[test]
    fn colon_delimiter_and_first_delimiter_wins() {
        let doc = Document::parse("[Commands]\nlock: sh -c a=b\n");
        assert_eq!(doc.get("Commands", "lock"), Some("sh -c a=b"));
    }

    #[test]
    fn comments_and_garbage_are_ignored() {
        let doc = Document::parse(
            "stray = before section\n# comment\n; other\n[Commands]\nnot a pair\n = empty key\nok = yes\n",
        );
        let s = doc.section("Commands").unwrap();
        assert_eq!(s.entries().count(), 1);
        assert_eq!(s.get("ok"), Some("yes"));
    }

    #[test]
    fn duplicate_keys_overwrite_in_place() {
        let doc = Document::parse("[S]\na = 1\nb = 2\na = 3\n");
        let entries: Vec<(&str, &str)> = doc.section("S").unwrap().entries().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn repeated_section_is_merged() {
        let doc = Document::parse("[S]\na = 1\n[T]\n[S]\nb = 2\n");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.get("S", "b"), Some("2"));
    }

    #[test]
    fn empty_section_is_present() {
        let doc = Document::parse("[Shortcuts]\n");
        let s = doc.section("Shortcuts").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn malformed_header_closes_previous_section() {
        let doc = Document::parse("[S]\na = 1\n[broken\nb = 2\n");
        assert_eq!(doc.get("S", "b"), None);
    }

    #[test]
    fn empty_value_is_kept() {
        let doc = Document::parse("[Commands]\ncancel =\n");
        assert_eq!(doc.get("Commands", "cancel"), Some(""));
    }

    #[test]
    fn header_with_trailing_comment_is_accepted() {
        let doc = Document::parse("[Commands] # mine\nlock = slock\n");
        assert_eq!(doc.get("Commands", "lock"), Some("slock"));
    }

    #[test]
    fn header_name_runs_to_last_bracket() {
        let doc = Document::parse("[a]b] trailing\nk = v\n");
        assert_eq!(doc.get("a]b", "k"), Some("v"));
    }

    #[test]
    fn empty_header_closes_section() {
        let doc = Document::parse("[S]\na = 1\n[]\nb = 2\n");
        assert_eq!(doc.get("S", "b"), None);
    }

    #[test]
    fn indented_line_continues_value() {
        let doc = Document::parse("[Commands]\nshutdown = systemctl\n    poweroff\nreboot = x\n");
        assert_eq!(doc.get("Commands", "shutdown"), Some("systemctl\npoweroff"));
        assert_eq!(doc.get("Commands", "reboot"), Some("x"));
    }

    #[test]
    fn continuation_survives_blank_and_comment_lines() {
        let doc = Document::parse("[S]\nk = a\n\n  # note\n  b\n");
        assert_eq!(doc.get("S", "k"), Some("a\nb"));
    }

    #[test]
    fn continuation_of_empty_value_has_no_leading_newline() {
        let doc = Document::parse("[S]\nk =\n  v\n");
        assert_eq!(doc.get("S", "k"), Some("v"));
    }

    #[test]
    fn same_indent_is_a_new_key() {
        let doc = Document::parse("[S]\n  a = 1\n  b = 2\n");
        assert_eq!(doc.get("S", "a"), Some("1"));
        assert_eq!(doc.get("S", "b"), Some("2"));
    }

    #[test]
    fn indented_header_after_option_is_continuation() {
        let doc = Document::parse("[S]\nk = a\n  [T]\n");
        assert_eq!(doc.get("S", "k"), Some("a\n[T]"));
        assert!(doc.section("T").is_none());
    }
}
