//! Mock inspector and style widgets for testing the panels
//!
//! Every mock records the calls it receives so tests can assert on the
//! exact sequence a panel produced.

use async_trait::async_trait;
use devtools_types::{ActorId, EventEmitter, Listener, ListenerId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::inspector::{Inspector, Selection, Toolbox, UpdateDone, ViewSourceUtils};
use crate::types::{
    CssRule, DocumentRef, InspectorEvent, InspectorNotice, NodeFront, PageStyle, RuleViewEvent,
    SourceLocation,
};
use crate::views::{RuleView, StyleView};

/// Mock node selection
pub struct MockSelection {
    connected: AtomicBool,
    element: AtomicBool,
    node: Mutex<Option<NodeFront>>,
    document: Mutex<Option<DocumentRef>>,
}

impl MockSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            element: AtomicBool::new(false),
            node: Mutex::new(None),
            document: Mutex::new(None),
        }
    }

    /// Select a connected element
    pub fn select_element(&self, node: NodeFront) {
        *self.node.lock() = Some(node);
        self.connected.store(true, Ordering::SeqCst);
        self.element.store(true, Ordering::SeqCst);
    }

    /// Select a connected node that is not an element (text, comment)
    pub fn select_non_element(&self, node: NodeFront) {
        *self.node.lock() = Some(node);
        self.connected.store(true, Ordering::SeqCst);
        self.element.store(false, Ordering::SeqCst);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn set_document(&self, document: DocumentRef) {
        *self.document.lock() = Some(document);
    }
}

impl Default for MockSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection for MockSelection {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn is_element_node(&self) -> bool {
        self.element.load(Ordering::SeqCst)
    }

    fn node_front(&self) -> Option<NodeFront> {
        self.node.lock().clone()
    }

    fn document(&self) -> Option<DocumentRef> {
        self.document.lock().clone()
    }
}

/// Records view-source requests
#[derive(Default)]
pub struct MockViewSource {
    opened: Mutex<Vec<(String, Option<DocumentRef>, u32)>>,
}

impl MockViewSource {
    pub fn opened(&self) -> Vec<(String, Option<DocumentRef>, u32)> {
        self.opened.lock().clone()
    }
}

impl ViewSourceUtils for MockViewSource {
    fn view_source(&self, href: &str, document: Option<&DocumentRef>, line: u32) {
        self.opened
            .lock()
            .push((href.to_string(), document.cloned(), line));
    }
}

/// Mock toolbox with a style editor
pub struct MockToolbox {
    supported: AtomicBool,
    selected: Mutex<Vec<(String, u32, u32)>>,
}

impl MockToolbox {
    pub fn new() -> Self {
        Self {
            supported: AtomicBool::new(true),
            selected: Mutex::new(Vec::new()),
        }
    }

    pub fn set_style_editor_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::SeqCst);
    }

    /// Sheets shown in the style editor, with line and column
    pub fn selected_sheets(&self) -> Vec<(String, u32, u32)> {
        self.selected.lock().clone()
    }
}

impl Default for MockToolbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Toolbox for MockToolbox {
    fn is_style_editor_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    async fn select_style_sheet(&self, sheet: &str, line: u32, column: u32) -> anyhow::Result<()> {
        self.selected.lock().push((sheet.to_string(), line, column));
        Ok(())
    }
}

/// Mock DOM inspector
pub struct MockInspector {
    selection: Arc<MockSelection>,
    page_style: PageStyle,
    events: EventEmitter<InspectorEvent>,
    updates: Arc<Mutex<Vec<String>>>,
    dirty: AtomicUsize,
    notices: Mutex<Vec<InspectorNotice>>,
    toolbox: Arc<MockToolbox>,
    view_source: Arc<MockViewSource>,
    original_location: Mutex<Option<SourceLocation>>,
}

impl MockInspector {
    pub fn new() -> Self {
        Self {
            selection: Arc::new(MockSelection::new()),
            page_style: PageStyle {
                actor: ActorId::new("conn0.pagestyle3"),
            },
            events: EventEmitter::new(),
            updates: Arc::new(Mutex::new(Vec::new())),
            dirty: AtomicUsize::new(0),
            notices: Mutex::new(Vec::new()),
            toolbox: Arc::new(MockToolbox::new()),
            view_source: Arc::new(MockViewSource::default()),
            original_location: Mutex::new(None),
        }
    }

    pub fn mock_selection(&self) -> Arc<MockSelection> {
        self.selection.clone()
    }

    pub fn mock_toolbox(&self) -> Arc<MockToolbox> {
        self.toolbox.clone()
    }

    pub fn mock_view_source(&self) -> Arc<MockViewSource> {
        self.view_source.clone()
    }

    /// Fire an inspector event at the subscribed panels
    pub fn emit(&self, event: InspectorEvent) {
        self.events.emit(&event);
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    /// Update log, as "<panel>:begin" and "<panel>:end" entries
    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().clone()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn notices(&self) -> Vec<InspectorNotice> {
        self.notices.lock().clone()
    }

    /// Location returned for source-mapped lookups
    pub fn set_original_location(&self, location: SourceLocation) {
        *self.original_location.lock() = Some(location);
    }
}

impl Default for MockInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Inspector for MockInspector {
    fn selection(&self) -> Arc<dyn Selection> {
        self.selection.clone()
    }

    fn page_style(&self) -> PageStyle {
        self.page_style.clone()
    }

    fn updating(&self, panel: &str) -> UpdateDone {
        self.updates.lock().push(format!("{}:begin", panel));
        let updates = self.updates.clone();
        let panel = panel.to_string();
        Box::new(move || updates.lock().push(format!("{}:end", panel)))
    }

    fn mark_dirty(&self) {
        self.dirty.fetch_add(1, Ordering::SeqCst);
    }

    fn notify(&self, notice: InspectorNotice) {
        self.notices.lock().push(notice);
    }

    fn on(&self, listener: Listener<InspectorEvent>) -> ListenerId {
        self.events.add(listener)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn view_source_utils(&self) -> Arc<dyn ViewSourceUtils> {
        self.view_source.clone()
    }

    fn toolbox(&self) -> Arc<dyn Toolbox> {
        self.toolbox.clone()
    }

    async fn original_location(&self, rule: &CssRule) -> anyhow::Result<SourceLocation> {
        self.original_location
            .lock()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No source map for rule {}", rule.actor))
    }
}

/// Call received by a mock style widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Mount,
    Unmount,
    SetPageStyle(PageStyle),
    SelectNothing,
    SelectElement(NodeFront),
    RefreshPanel,
    ClearUserProperties,
    Destroy,
}

/// Mock widget usable as both a rule view and a computed view
pub struct MockStyleView {
    calls: Mutex<Vec<ViewCall>>,
    fail_render: AtomicBool,
    events: EventEmitter<RuleViewEvent>,
}

impl MockStyleView {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_render: AtomicBool::new(false),
            events: EventEmitter::new(),
        }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make `select_element` fail
    pub fn fail_render(&self, fail: bool) {
        self.fail_render.store(fail, Ordering::SeqCst);
    }

    /// Fire a widget event at the subscribed panel
    pub fn emit(&self, event: RuleViewEvent) {
        self.events.emit(&event);
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockStyleView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StyleView for MockStyleView {
    fn mount(&self) {
        self.record(ViewCall::Mount);
    }

    fn unmount(&self) {
        self.record(ViewCall::Unmount);
    }

    fn set_page_style(&self, page_style: PageStyle) {
        self.record(ViewCall::SetPageStyle(page_style));
    }

    fn select_nothing(&self) {
        self.record(ViewCall::SelectNothing);
    }

    async fn select_element(&self, node: NodeFront) -> anyhow::Result<()> {
        self.record(ViewCall::SelectElement(node.clone()));
        tokio::task::yield_now().await;
        if self.fail_render.load(Ordering::SeqCst) {
            anyhow::bail!("Could not fetch styles for {}", node.node_name);
        }
        Ok(())
    }

    fn refresh_panel(&self) {
        self.record(ViewCall::RefreshPanel);
    }

    fn destroy(&self) {
        self.record(ViewCall::Destroy);
    }
}

impl RuleView for MockStyleView {
    fn clear_user_properties(&self) {
        self.record(ViewCall::ClearUserProperties);
    }

    fn on(&self, listener: Listener<RuleViewEvent>) -> ListenerId {
        self.events.add(listener)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }
}
