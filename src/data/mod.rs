// ============================================================
// Layer 4 - Data
// ============================================================
// Loading the inputs a network definition depends on. Images
// and labels are NOT handled here; the only external data a
// network needs at construction time is its anchor set.

/// Reads anchor priors from a text file
pub mod anchor_file;
