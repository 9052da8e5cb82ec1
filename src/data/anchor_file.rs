// ============================================================
// Layer 4 - Anchor File Loader
// ============================================================
// Reads anchor priors from a plain text file.
//
// Format: one anchor per line, width then height, separated by
// whitespace or a comma. Blank lines and lines starting with '#'
// are skipped, so files produced by k-means scripts (which often
// carry a header comment) load unchanged:
//
//   # voc, k=5
//   1.3221   1.73145
//   3.19275, 4.00944
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (Reading a File)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::anchor::Anchor;
use crate::domain::traits::AnchorSource;

/// Loads anchors from a text file on disk.
pub struct AnchorFile {
    path: PathBuf,
}

impl AnchorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AnchorSource for AnchorFile {
    fn load_anchors(&self) -> Result<Vec<Anchor>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read anchors from '{}'", self.path.display()))?;

        let anchors = parse_anchors(&text)
            .with_context(|| format!("Malformed anchor file '{}'", self.path.display()))?;

        tracing::debug!("Loaded {} anchors from '{}'", anchors.len(), self.path.display());
        Ok(anchors)
    }
}

/// Parse the anchor text format described above.
pub fn parse_anchors(text: &str) -> Result<Vec<Anchor>> {
    let mut anchors = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let [w, h] = fields.as_slice() else {
            bail!("line {}: expected 'width height', got '{}'", index + 1, line);
        };

        let width: f32 = w
            .parse()
            .with_context(|| format!("line {}: bad width '{}'", index + 1, w))?;
        let height: f32 = h
            .parse()
            .with_context(|| format!("line {}: bad height '{}'", index + 1, h))?;

        let anchor = Anchor::new(width, height);
        if !anchor.is_valid() {
            bail!("line {}: anchor {}x{} must be positive", index + 1, width, height);
        }
        anchors.push(anchor);
    }

    if anchors.is_empty() {
        bail!("no anchors found");
    }
    Ok(anchors)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_whitespace_and_comma_separated() {
        let text = "# header\n1.5 2.0\n\n3.0,4.5\n  5\t6  \n";
        let anchors = parse_anchors(text).unwrap();
        assert_eq!(
            anchors,
            vec![Anchor::new(1.5, 2.0), Anchor::new(3.0, 4.5), Anchor::new(5.0, 6.0)]
        );
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        let err = parse_anchors("1.0 2.0 3.0").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(parse_anchors("1.0 abc").is_err());
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(parse_anchors("0 1").is_err());
    }

    #[test]
    fn test_empty_file_is_an_error() {
        assert!(parse_anchors("# nothing here\n\n").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let loader = AnchorFile::new("/nonexistent/anchors.txt");
        let err = loader.load_anchors().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/anchors.txt"));
    }

    #[test]
    fn test_loads_from_disk() {
        let path = std::env::temp_dir().join(format!("yolo2_anchors_{}.txt", std::process::id()));
        fs::write(&path, "1 2\n3 4\n").unwrap();
        let anchors = AnchorFile::new(&path).load_anchors().unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(anchors.len(), 2);
    }
}
