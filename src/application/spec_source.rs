// ============================================================
// Layer 2 - Resolving a ModelSpec
// ============================================================
// A spec either comes from a JSON file written earlier, or is
// assembled from individual settings plus an anchor source:
//
//   File(path)          → ConfigStore::load (already validated)
//   Settings { .. }     → anchors from a text file or the VOC set,
//                         then validated here
//
// Either way the caller gets a spec that is safe to build.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::anchor_file::AnchorFile;
use crate::domain::model_spec::{Architecture, ModelSpec};
use crate::domain::traits::{AnchorSource, BuiltinAnchors};
use crate::infra::config_store::ConfigStore;

/// Where a ModelSpec comes from.
#[derive(Debug, Clone)]
pub enum SpecSource {
    /// A JSON file written by `init-config`
    File(PathBuf),
    /// Loose settings, usually straight from CLI flags
    Settings {
        architecture: Architecture,
        num_classes:  usize,
        /// Anchor text file; `None` means the built-in VOC anchors
        anchors_file: Option<PathBuf>,
        stride:       usize,
        input_size:   usize,
    },
}

impl SpecSource {
    /// Produce a validated spec or explain why there is none.
    pub fn resolve(self) -> Result<ModelSpec> {
        match self {
            // The store validates on load
            SpecSource::File(path) => ConfigStore::new(path).load(),
            SpecSource::Settings { architecture, num_classes, anchors_file, stride, input_size } => {
                // Step 1: anchors from the file if one was given
                let anchors = match &anchors_file {
                    Some(path) => AnchorFile::new(path).load_anchors()?,
                    None       => BuiltinAnchors.load_anchors()?,
                };

                // Step 2: assemble and check the spec as a whole
                let spec = ModelSpec { architecture, num_classes, anchors, stride, input_size };
                spec.validate().context("Invalid model settings")?;

                tracing::info!(
                    "Model: {} | {} classes | {} anchors | input {}",
                    spec.architecture, spec.num_classes, spec.anchors.len(), spec.input_size
                );
                Ok(spec)
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn settings(input_size: usize) -> SpecSource {
        SpecSource::Settings {
            architecture: Architecture::Darknet,
            num_classes:  80,
            anchors_file: None,
            stride:       2,
            input_size,
        }
    }

    #[test]
    fn test_settings_use_builtin_anchors() {
        let spec = settings(608).resolve().unwrap();
        assert_eq!(spec.anchors.len(), 5);
        assert_eq!(spec.layout().channels(), 425);
        assert_eq!(spec.grid_size(), 19);
    }

    #[test]
    fn test_settings_are_validated() {
        assert!(settings(500).resolve().is_err());
    }

    #[test]
    fn test_missing_anchor_file_fails() {
        let source = SpecSource::Settings {
            architecture: Architecture::Tiny,
            num_classes:  1,
            anchors_file: Some(PathBuf::from("/nonexistent/anchors.txt")),
            stride:       2,
            input_size:   416,
        };
        assert!(source.resolve().is_err());
    }
}
