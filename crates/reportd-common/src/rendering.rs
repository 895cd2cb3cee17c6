use serde::{Deserialize, Serialize};

/// How the computed report should be formatted and delivered.
/// Opaque to the queue; the rendering collaborator interprets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderingMode {
    /// Identifier of the renderer (e.g. "web", "csv", "xls").
    pub renderer: String,

    /// Renderer-specific argument, such as a template or sheet name.
    #[serde(default)]
    pub argument: Option<String>,

    /// Relative weight when offering a user multiple modes.
    #[serde(default)]
    pub sort_weight: Option<i32>,
}
