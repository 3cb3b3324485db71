//! TSV triple files: `subject<TAB>relation<TAB>object`, one per line.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use taxonomy_merge::Fact;

/// Read a triple file, keeping subject and object. Plain two-column pairs
/// are accepted as well. Empty lines and `#` comments are skipped.
pub fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut pairs = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let (subject, object) = match fields[..] {
            [subject, _, object] => (subject, object),
            [subject, object] => (subject, object),
            _ => bail!(
                "{}:{}: expected 2 or 3 tab-separated fields, got {}",
                path.display(),
                number + 1,
                fields.len()
            ),
        };
        pairs.push((subject.to_string(), object.to_string()));
    }
    log::debug!("Read {} pairs from {}", pairs.len(), path.display());
    Ok(pairs)
}

/// Write the merged facts as triples under one relation name.
pub fn write_facts(path: &Path, facts: &[Fact], relation: &str) -> Result<()> {
    let mut out = String::new();
    for fact in facts {
        out.push_str(&fact.subject);
        out.push('\t');
        out.push_str(relation);
        out.push('\t');
        out.push_str(&fact.object);
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy_merge::EdgeKind;

    #[test]
    fn triples_and_pairs_are_both_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.tsv");
        fs::write(
            &path,
            "# comment\nA\tsubCategoryOf\tB\n\nC\tD\n",
        )
        .unwrap();

        let pairs = read_pairs(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string()),
                ("C".to_string(), "D".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_lines_are_reported_with_their_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.tsv");
        fs::write(&path, "A\tB\njust one field\n").unwrap();

        let err = read_pairs(&path).unwrap_err();
        assert!(err.to_string().contains(":2:"), "{err}");
    }

    #[test]
    fn facts_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let facts = vec![Fact {
            subject: "Companies".into(),
            object: "wordnet_organization".into(),
            kind: EdgeKind::CategoryToClass,
        }];

        write_facts(&path, &facts, "subsumedBy").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Companies\tsubsumedBy\twordnet_organization\n"
        );
    }
}
