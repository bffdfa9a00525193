//! Reading address entries from a file or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use site_core::{AddressInput, AddressRecord, CoreError};

/// Layout of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A JSON array of address objects.
    Json,
    /// One single-line address per line; blank lines and `#` comments skipped.
    Lines,
}

/// One entry read from the input, before a record is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    Fields(AddressInput),
    Line { number: usize, text: String },
    /// A JSON array element that is not a well-typed address object.
    Malformed { index: usize, error: String },
}

impl RawEntry {
    pub fn into_record(self) -> Result<AddressRecord, CoreError> {
        match self {
            Self::Fields(input) => AddressRecord::try_from(input),
            Self::Line { text, .. } => AddressRecord::parse_line(&text),
            Self::Malformed { error, .. } => Err(CoreError::InvalidArgument {
                field: "entry",
                reason: error,
            }),
        }
    }

    /// Short description of where the entry came from, for reports.
    pub fn source(&self) -> String {
        match self {
            Self::Fields(_) => "json".to_string(),
            Self::Line { number, .. } => format!("line {number}"),
            Self::Malformed { index, .. } => format!("json element {index}"),
        }
    }
}

/// Read the whole input. `None` or `-` means stdin.
pub fn read_source(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

pub fn parse_entries(text: &str, format: InputFormat) -> anyhow::Result<Vec<RawEntry>> {
    match format {
        InputFormat::Json => {
            // Elements are decoded one by one so a single bad element is
            // rejected on its own instead of failing the whole batch.
            let values: Vec<serde_json::Value> =
                serde_json::from_str(text).context("input must be a JSON array")?;
            Ok(values
                .into_iter()
                .enumerate()
                .map(|(i, value)| match serde_json::from_value::<AddressInput>(value) {
                    Ok(input) => RawEntry::Fields(input),
                    Err(e) => RawEntry::Malformed {
                        index: i + 1,
                        error: e.to_string(),
                    },
                })
                .collect())
        }
        InputFormat::Lines => Ok(text
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(i, line)| RawEntry::Line {
                number: i + 1,
                text: line.trim().to_string(),
            })
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn json_entries_keep_their_fields() {
        let text = r#"[{"city": "Springfield", "zip": "62704"}, {"street": "1 Main St"}]"#;
        let entries = parse_entries(text, InputFormat::Json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_matches!(&entries[0], RawEntry::Fields(input) if input.zip.as_deref() == Some("62704"));
        assert_eq!(entries[0].source(), "json");
    }

    #[test]
    fn badly_typed_json_element_becomes_a_rejection() {
        let text = r#"[{"city": "Springfield"}, {"city": 62704}, "Shelbyville"]"#;
        let entries = parse_entries(text, InputFormat::Json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_matches!(&entries[0], RawEntry::Fields(_));
        assert_matches!(&entries[1], RawEntry::Malformed { index: 2, error } if error.contains("invalid type"));
        assert_matches!(&entries[2], RawEntry::Malformed { index: 3, .. });
        assert_eq!(entries[1].source(), "json element 2");

        assert_matches!(
            entries[1].clone().into_record(),
            Err(CoreError::InvalidArgument { field: "entry", .. })
        );
    }

    #[test]
    fn json_that_is_not_an_array_fails() {
        assert!(parse_entries(r#"{"city": "Springfield"}"#, InputFormat::Json).is_err());
    }

    #[test]
    fn lines_skip_blanks_and_comments_but_keep_numbers() {
        let text = "# sites\nSpringfield, IL\n\n  Shelbyville, 12345  \n";
        let entries = parse_entries(text, InputFormat::Lines).unwrap();
        assert_eq!(
            entries,
            vec![
                RawEntry::Line {
                    number: 2,
                    text: "Springfield, IL".into()
                },
                RawEntry::Line {
                    number: 4,
                    text: "Shelbyville, 12345".into()
                },
            ]
        );
        assert_eq!(entries[1].source(), "line 4");
    }

    #[test]
    fn into_record_surfaces_invalid_argument() {
        let entry = RawEntry::Fields(AddressInput::default());
        assert_matches!(
            entry.into_record(),
            Err(CoreError::InvalidArgument { field: "city", .. })
        );

        let entry = RawEntry::Line {
            number: 1,
            text: "Springfield, IL 62704".into(),
        };
        let record = entry.into_record().unwrap();
        assert_eq!(record.zip(), "62704");
    }

    #[test]
    fn read_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.txt");
        std::fs::write(&path, "Springfield\n").unwrap();
        assert_eq!(read_source(Some(path.as_path())).unwrap(), "Springfield\n");

        let missing = dir.path().join("missing.txt");
        assert!(read_source(Some(missing.as_path())).is_err());
    }
}
