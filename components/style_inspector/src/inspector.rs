//! Seams to the DOM inspector and the toolbox
//!
//! The inspector owns the selection and the event wiring; panels only read
//! from it and report back.

use async_trait::async_trait;
use devtools_types::{Listener, ListenerId};
use std::sync::Arc;

use crate::types::{
    CssRule, DocumentRef, InspectorEvent, InspectorNotice, NodeFront, PageStyle, SourceLocation,
};

/// Completion callback returned by `Inspector::updating`
pub type UpdateDone = Box<dyn FnOnce() + Send>;

/// Currently selected node
pub trait Selection: Send + Sync {
    /// Whether the selected node is still attached to its document
    fn is_connected(&self) -> bool;

    fn is_element_node(&self) -> bool;

    fn node_front(&self) -> Option<NodeFront>;

    fn document(&self) -> Option<DocumentRef>;
}

/// DOM inspector surface used by the style panels
#[async_trait]
pub trait Inspector: Send + Sync {
    fn selection(&self) -> Arc<dyn Selection>;

    fn page_style(&self) -> PageStyle;

    /// Report a panel as busy; the returned callback ends the update
    fn updating(&self, panel: &str) -> UpdateDone;

    /// Flag the document as modified by the user
    fn mark_dirty(&self);

    fn notify(&self, notice: InspectorNotice);

    fn on(&self, listener: Listener<InspectorEvent>) -> ListenerId;

    fn off(&self, id: ListenerId) -> bool;

    fn view_source_utils(&self) -> Arc<dyn ViewSourceUtils>;

    fn toolbox(&self) -> Arc<dyn Toolbox>;

    /// Source-mapped location of a rule
    async fn original_location(&self, rule: &CssRule) -> anyhow::Result<SourceLocation>;
}

/// View-source window
pub trait ViewSourceUtils: Send + Sync {
    fn view_source(&self, href: &str, document: Option<&DocumentRef>, line: u32);
}

/// Toolbox hosting the style editor
#[async_trait]
pub trait Toolbox: Send + Sync {
    /// Whether the style editor can inspect the current target
    fn is_style_editor_supported(&self) -> bool;

    /// Show the style editor on `sheet` at the given position
    async fn select_style_sheet(&self, sheet: &str, line: u32, column: u32) -> anyhow::Result<()>;
}
