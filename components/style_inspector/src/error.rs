//! Error types for the style inspector panels

use thiserror::Error;

/// Errors raised while updating a style panel
#[derive(Error, Debug)]
pub enum StyleInspectorError {
    /// The widget failed to render the selected node
    #[error("{panel} failed to render the selected node: {message}")]
    Render { panel: &'static str, message: String },

    /// Location lookup or toolbox failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for style inspector operations
pub type Result<T> = std::result::Result<T, StyleInspectorError>;
