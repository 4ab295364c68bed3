//! Line-delimited JSON records: input excerpts and output related lists.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// One input excerpt, as read from the JSONL corpus. Record fields other
/// than `readable_index` and `auxiliaries` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excerpt {
    pub readable_index: String,
    #[serde(default)]
    pub auxiliaries: HashMap<String, Auxiliary>,
}

/// A named side-channel of text attached to an excerpt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auxiliary {
    #[serde(default)]
    pub text: Vec<String>,
}

impl Excerpt {
    /// The embeddable string for one auxiliary field: fragments joined with
    /// single spaces. None when the field is absent or joins to nothing.
    pub fn auxiliary_text(&self, field: &str) -> Option<String> {
        let joined = self.auxiliaries.get(field)?.text.join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// One output record: a source excerpt and its ranked related excerpts,
/// best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedRecord {
    pub readable_index: String,
    pub related: Vec<RelatedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub readable_index: String,
    pub score: f32,
}

/// Read the JSONL corpus. `readable_index` must be unique across the file;
/// blank lines are skipped.
pub fn read_excerpts(path: &Path) -> anyhow::Result<Vec<Excerpt>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;

    let mut excerpts = Vec::new();
    let mut seen = HashSet::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let excerpt: Excerpt = serde_json::from_str(&line)
            .with_context(|| format!("malformed excerpt on line {}", number + 1))?;

        if !seen.insert(excerpt.readable_index.clone()) {
            bail!(
                "duplicate readable_index '{}' on line {}",
                excerpt.readable_index,
                number + 1
            );
        }

        excerpts.push(excerpt);
    }

    Ok(excerpts)
}

/// Write one compact JSON object per line.
pub fn write_related(path: &Path, records: &[RelatedRecord]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}

/// Default output path: the input with its extension replaced by `emb.jsonl`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("emb.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_record() {
        let excerpt: Excerpt = serde_json::from_str(r#"{"readable_index": "RV 1.1.1"}"#).unwrap();
        assert_eq!(excerpt.readable_index, "RV 1.1.1");
        assert!(excerpt.auxiliaries.is_empty());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let raw = r#"{"readable_index": "x", "body": "ignored", "auxiliaries": {"comm": {"text": ["a"], "author": "s"}}}"#;
        let excerpt: Excerpt = serde_json::from_str(raw).unwrap();
        assert_eq!(excerpt.auxiliary_text("comm").as_deref(), Some("a"));
    }

    #[test]
    fn test_auxiliary_text_joins_with_spaces() {
        let raw = r#"{"readable_index": "x", "auxiliaries": {"comm": {"text": ["one", "two", "three"]}}}"#;
        let excerpt: Excerpt = serde_json::from_str(raw).unwrap();
        assert_eq!(excerpt.auxiliary_text("comm").as_deref(), Some("one two three"));
    }

    #[test]
    fn test_auxiliary_text_absent_or_empty_is_none() {
        let raw = r#"{"readable_index": "x", "auxiliaries": {"empty": {"text": []}}}"#;
        let excerpt: Excerpt = serde_json::from_str(raw).unwrap();
        assert!(excerpt.auxiliary_text("empty").is_none());
        assert!(excerpt.auxiliary_text("missing").is_none());
    }

    #[test]
    fn test_read_excerpts_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excerpts.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"readable_index": "a", "auxiliaries": {"comm": {"text": ["hello"]}}}"#,
                "\n",
                "\n",
                r#"{"readable_index": "b"}"#,
                "\n",
            ),
        )
        .unwrap();

        let excerpts = read_excerpts(&path).unwrap();
        assert_eq!(excerpts.len(), 2);
        assert_eq!(excerpts[0].readable_index, "a");
        assert_eq!(excerpts[1].readable_index, "b");
    }

    #[test]
    fn test_read_excerpts_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excerpts.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"readable_index": "a"}"#,
                "\n",
                r#"{"readable_index": "a"}"#,
                "\n",
            ),
        )
        .unwrap();

        let error = read_excerpts(&path).unwrap_err();
        assert!(error.to_string().contains("duplicate readable_index"));
        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_read_excerpts_reports_line_of_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excerpts.jsonl");
        std::fs::write(&path, "{\"readable_index\": \"a\"}\nnot json\n").unwrap();

        let error = read_excerpts(&path).unwrap_err();
        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_write_related_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let records = vec![
            RelatedRecord {
                readable_index: "a".to_string(),
                related: vec![RelatedEntry {
                    readable_index: "b".to_string(),
                    score: 0.5,
                }],
            },
            RelatedRecord {
                readable_index: "b".to_string(),
                related: vec![],
            },
        ];
        write_related(&path, &records).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"readable_index":"a","related":[{"readable_index":"b","score":0.5}]}"#
        );
        assert_eq!(lines[1], r#"{"readable_index":"b","related":[]}"#);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/excerpts.jsonl")),
            PathBuf::from("data/excerpts.emb.jsonl")
        );
        assert_eq!(
            default_output_path(Path::new("excerpts")),
            PathBuf::from("excerpts.emb.jsonl")
        );
    }
}
