use rigscene_audio::AudioError;
use rigscene_kernel::HierarchyError;

/// Errors from building or configuring the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
