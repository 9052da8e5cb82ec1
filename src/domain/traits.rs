// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer asks for anchors without caring where
// they come from:
//   - AnchorFile   (data layer)  → parses a text file
//   - BuiltinAnchors             → the VOC defaults
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::anchor::Anchor;

// ─── AnchorSource ─────────────────────────────────────────────────────────────
/// Any component that can provide a set of anchor boxes.
pub trait AnchorSource {
    fn load_anchors(&self) -> Result<Vec<Anchor>>;
}

/// The VOC anchors shipped with YOLOv2
pub struct BuiltinAnchors;

impl AnchorSource for BuiltinAnchors {
    fn load_anchors(&self) -> Result<Vec<Anchor>> {
        Ok(Anchor::voc())
    }
}
