//! Shared types for the style inspector panels

use devtools_types::ActorId;
use serde::{Deserialize, Serialize};

/// Remote handle to a DOM node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeFront {
    /// Node actor
    pub actor: ActorId,
    /// Node name (e.g. "DIV")
    pub node_name: String,
}

/// Page style actor the views query styles through
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageStyle {
    pub actor: ActorId,
}

/// Content document owning the selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub url: String,
}

/// Stylesheet a rule belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheetInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Chrome stylesheets are not listed in the style editor
    #[serde(default)]
    pub is_system: bool,
}

/// Position of a rule in a stylesheet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    /// Original source, when the location went through a source map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// CSS rule as shown by the rule view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CssRule {
    /// Style rule actor
    pub actor: ActorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Document href for inline style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Absent for dynamically generated rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_style_sheet: Option<StyleSheetInfo>,
    /// Generated location of the rule
    pub location: SourceLocation,
}

/// Signals the inspector sends to its panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectorEvent {
    /// The selected node was removed from the document
    Detached,
    /// A new node was selected
    NewNodeFront,
    /// Layout of the page changed
    LayoutChange,
    /// A pseudo-class lock was toggled on the selection
    PseudoClass,
    /// The target navigated to a new page
    Navigate,
}

/// Selection change that triggered an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    NewNodeFront,
    Detached,
}

/// Notices panels send back to the inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorNotice {
    RuleViewRefreshed,
}

/// Events raised by the rule view widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViewEvent {
    /// A property was edited
    Changed,
    /// The view finished refreshing
    Refreshed,
    /// A stylesheet link was clicked
    LinkClicked(CssRule),
}

/// Where a stylesheet link click led
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkNavigation {
    /// Opened in the view-source window
    ViewSource { href: String, line: u32 },
    /// Opened in the style editor
    StyleEditor { sheet: String, line: u32, column: u32 },
    /// The style editor does not support this target
    Unsupported,
    /// The panel was already destroyed
    Ignored,
}
