//! Rule view and computed view panels
//!
//! This crate wires the style widgets of the inspector sidebar to the DOM
//! inspector: it follows the node selection, refreshes on layout changes and
//! reports edits and stylesheet link clicks back to the inspector and toolbox.
//!
//! # Features
//!
//! - **RuleViewTool**: matched rules for the selection, dirty tracking and
//!   stylesheet link navigation
//! - **ComputedViewTool**: computed styles for the selection
//! - **Inspector / StyleView traits**: the seams both panels are driven through
//!
//! ## Usage
//!
//! ```rust
//! use devtools_types::{ActorId, MemoryPreferences};
//! use style_inspector::{MockInspector, MockStyleView, NodeFront, RuleViewTool};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let inspector = Arc::new(MockInspector::new());
//!     inspector.mock_selection().select_element(NodeFront {
//!         actor: ActorId::new("conn0.node5"),
//!         node_name: "DIV".to_string(),
//!     });
//!
//!     let view = Arc::new(MockStyleView::new());
//!     let tool = RuleViewTool::new(
//!         inspector.clone(),
//!         view.clone(),
//!         Arc::new(MemoryPreferences::new()),
//!     )
//!     .await;
//!
//!     assert_eq!(inspector.updates(), vec!["rule-view:begin", "rule-view:end"]);
//!     tool.destroy();
//! }
//! ```

mod computed_view_tool;
mod error;
mod inspector;
mod mock_inspector;
mod panel;
mod rule_view_tool;
mod types;
mod views;

pub use computed_view_tool::{ComputedViewTool, COMPUTED_VIEW_PANEL};
pub use error::{Result, StyleInspectorError};
pub use inspector::{Inspector, Selection, Toolbox, UpdateDone, ViewSourceUtils};
pub use mock_inspector::{
    MockInspector, MockSelection, MockStyleView, MockToolbox, MockViewSource, ViewCall,
};
pub use rule_view_tool::{RuleViewTool, ORIGINAL_SOURCES_PREF, RULE_VIEW_PANEL};
pub use types::{
    CssRule, DocumentRef, InspectorEvent, InspectorNotice, LinkNavigation, NodeFront, PageStyle,
    RuleViewEvent, SelectionChange, SourceLocation, StyleSheetInfo,
};
pub use views::{RuleView, StyleView};
