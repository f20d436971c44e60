//! Decoder configuration.

/// Where the clone-range source path is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneLayout {
    /// Read the source path from the start of the frame body, then continue
    /// from there. Matches the upstream decoder this tool's output is
    /// compared against; any real clone record fails with an attribute
    /// mismatch because the body starts with the destination path.
    #[default]
    Observed,

    /// Read every clone attribute in wire order.
    Sequential,
}

/// Decoder configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Add a synthetic "renamed from" reference under each rename
    /// destination in the path index (default: off).
    ///
    /// Never changes the flat command list.
    pub synthesize_lineage: bool,

    /// Clone-range attribute layout (default: [`CloneLayout::Observed`]).
    pub clone_layout: CloneLayout,
}

impl DecodeOptions {
    /// Create decoder options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable rename lineage markers (builder pattern).
    pub fn with_lineage(mut self, enabled: bool) -> Self {
        self.synthesize_lineage = enabled;
        self
    }

    /// Set the clone-range layout (builder pattern).
    pub fn with_clone_layout(mut self, layout: CloneLayout) -> Self {
        self.clone_layout = layout;
        self
    }
}
