// ============================================================
// Layer 6 - Model Spec Store
// ============================================================
// Saves and loads a ModelSpec as pretty-printed JSON so a
// network definition can be written once and rebuilt later:
//
//   {
//     "architecture": "darknet",
//     "num_classes": 20,
//     "anchors": [ { "width": 1.3221, "height": 1.73145 }, ... ],
//     "stride": 2,
//     "input_size": 416
//   }
//
// Only the definition is stored. Weights are not this crate's
// business.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::model_spec::ModelSpec;

/// Reads and writes one model spec file.
pub struct ConfigStore {
    /// Location of the JSON file
    path: PathBuf,
}

impl ConfigStore {
    /// Point the store at `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the model spec, creating parent directories as needed
    pub fn save(&self, spec: &ModelSpec) -> Result<()> {
        // A bare file name has an empty parent; skip it
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(spec)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write model spec to '{}'", self.path.display()))?;

        tracing::debug!("Saved model spec to '{}'", self.path.display());
        Ok(())
    }

    /// Read and validate a spec.
    /// Missing `stride` / `input_size` fields take their defaults.
    pub fn load(&self) -> Result<ModelSpec> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read model spec from '{}'", self.path.display()))?;

        let spec: ModelSpec = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a valid model spec", self.path.display()))?;

        // Well-formed JSON can still describe a network that cannot be built
        spec.validate()
            .with_context(|| format!("Model spec '{}' is inconsistent", self.path.display()))?;

        tracing::debug!("Loaded {} spec from '{}'", spec.architecture, self.path.display());
        Ok(spec)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anchor::Anchor;
    use crate::domain::model_spec::Architecture;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("yolo2_store_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_then_load() {
        let spec = ModelSpec {
            architecture: Architecture::Tiny,
            num_classes:  3,
            anchors:      vec![Anchor::new(1.0, 2.0), Anchor::new(2.5, 1.5)],
            stride:       2,
            input_size:   320,
        };
        let store = ConfigStore::new(scratch("nested/spec.json"));
        store.save(&spec).unwrap();
        let loaded = store.load().unwrap();
        fs::remove_file(store.path()).ok();
        assert_eq!(loaded, spec);
    }

    #[test]
    fn test_load_rejects_invalid_spec() {
        let store = ConfigStore::new(scratch("bad.json"));
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"architecture":"darknet","num_classes":0,"anchors":[]}"#).unwrap();
        let err = store.load().unwrap_err();
        fs::remove_file(store.path()).ok();
        assert!(format!("{err:#}").contains("inconsistent"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let store = ConfigStore::new(scratch("missing.json"));
        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
