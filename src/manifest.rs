//! `META-INF/MANIFEST.MF`: a sectioned key/value text format with line
//! continuations.

use std::collections::HashMap;

use crate::error::Error;

/// The section name used for attributes that appear before the first
/// blank line (the manifest's "main" attributes).
pub const MAIN_SECTION: &str = "";

/// A parsed manifest: a main section plus zero or more named sections,
/// each a flat key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Manifest {
    /// Parses a manifest from its raw text.
    ///
    /// Lines are grouped into sections, separated by blank lines. Within
    /// a section, a line starting with a single space is a continuation
    /// of the previous line's value. A `Name:` attribute renames the
    /// section currently being accumulated rather than starting a new
    /// one; a later blank line still flushes it under that name.
    ///
    /// # Errors
    /// [`Error::ManifestParse`] if a non-blank, non-continuation line
    /// contains no `:` separator.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_name = MAIN_SECTION.to_string();
        let mut current: HashMap<String, String> = HashMap::new();
        let mut last_key: Option<String> = None;

        for (zero_based, raw_line) in text.lines().enumerate() {
            let line_no = zero_based + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            if line.is_empty() {
                if !current.is_empty() || current_name != MAIN_SECTION {
                    sections.insert(
                        std::mem::take(&mut current_name),
                        std::mem::take(&mut current),
                    );
                    current_name = MAIN_SECTION.to_string();
                }
                last_key = None;
                continue;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                let key = last_key.as_ref().ok_or(Error::ManifestParse { line_no })?;
                if key.eq_ignore_ascii_case("Name") {
                    current_name.push_str(continuation);
                } else {
                    current
                        .get_mut(key)
                        .ok_or(Error::ManifestParse { line_no })?
                        .push_str(continuation);
                }
                continue;
            }

            let (key, value) = line
                .split_once(':')
                .ok_or(Error::ManifestParse { line_no })?;
            let value = value.strip_prefix(' ').unwrap_or(value);
            if key.eq_ignore_ascii_case("Name") {
                current_name = value.to_string();
            } else {
                current.insert(key.to_string(), value.to_string());
            }
            last_key = Some(key.to_string());
        }
        if !current.is_empty() || current_name != MAIN_SECTION {
            sections.insert(current_name, current);
        }

        Ok(Self { sections })
    }

    /// The main section's attributes (before the first blank line).
    #[must_use]
    pub fn main_attributes(&self) -> Option<&HashMap<String, String>> {
        self.sections.get(MAIN_SECTION)
    }

    /// A named section's attributes.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(name)
    }

    /// All section names, including [`MAIN_SECTION`] if present.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_section_only() {
        let manifest = Manifest::parse("Manifest-Version: 1.0\nCreated-By: 21 (Oracle)\n").unwrap();
        let main = manifest.main_attributes().unwrap();
        assert_eq!(
            main.get("Manifest-Version").map(String::as_str),
            Some("1.0")
        );
        assert_eq!(
            main.get("Created-By").map(String::as_str),
            Some("21 (Oracle)")
        );
    }

    #[test]
    fn continuation_line_appends_to_previous_value() {
        let manifest = Manifest::parse("Class-Path: a.jar\n b.jar\n").unwrap();
        let main = manifest.main_attributes().unwrap();
        assert_eq!(
            main.get("Class-Path").map(String::as_str),
            Some("a.jarb.jar")
        );
    }

    #[test]
    fn name_attribute_renames_current_section() {
        let text = "Manifest-Version: 1.0\n\nName: com/example/Foo.class\nSHA-256-Digest: abc\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(
            manifest
                .main_attributes()
                .unwrap()
                .get("Manifest-Version")
                .map(String::as_str),
            Some("1.0")
        );
        let section = manifest.section("com/example/Foo.class").unwrap();
        assert_eq!(
            section.get("SHA-256-Digest").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn wrapped_name_attribute_reassembles_before_renaming() {
        let text = "Name: com/example/Ap\n plication.class\nSHA-256-Digest: abc\n";
        let manifest = Manifest::parse(text).unwrap();
        let section = manifest.section("com/example/Application.class").unwrap();
        assert_eq!(
            section.get("SHA-256-Digest").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn blank_line_flushes_section() {
        let text = "Name: first\nA: 1\n\nName: second\nB: 2\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(
            manifest
                .section("first")
                .unwrap()
                .get("A")
                .map(String::as_str),
            Some("1")
        );
        assert_eq!(
            manifest
                .section("second")
                .unwrap()
                .get("B")
                .map(String::as_str),
            Some("2")
        );
    }

    #[test]
    fn line_without_colon_is_rejected() {
        let err = Manifest::parse("not-a-valid-line\n").unwrap_err();
        assert!(matches!(err, Error::ManifestParse { line_no: 1 }));
    }
}
