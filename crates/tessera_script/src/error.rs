use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the host when running scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script engine error: {0}")]
    Engine(#[from] rquickjs::Error),

    #[error("uncaught exception: {message}")]
    Exception {
        message: String,
        stack: Option<String>,
    },

    #[error("failed to read script {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Asset(#[from] tessera_asset::AssetError),

    #[error("scene is not initialized")]
    NotInitialized,
}
