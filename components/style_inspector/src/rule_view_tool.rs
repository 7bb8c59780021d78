//! Rule view panel controller
//!
//! Keeps the matched-rules widget in sync with the inspector selection,
//! reports edits back to the inspector and routes stylesheet links to the
//! style editor or the view-source window.

use devtools_types::{ListenerId, Preferences};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::inspector::Inspector;
use crate::panel::update_for_selection;
use crate::types::{
    CssRule, InspectorEvent, InspectorNotice, LinkNavigation, RuleViewEvent, SelectionChange,
};
use crate::views::RuleView;

/// Name the rule view reports updates under
pub const RULE_VIEW_PANEL: &str = "rule-view";

/// Preference enabling source-mapped locations in the style editor
pub const ORIGINAL_SOURCES_PREF: &str = "devtools.styleeditor.source-maps-enabled";

/// Controller for the rule view panel
pub struct RuleViewTool {
    inspector: RwLock<Option<Arc<dyn Inspector>>>,
    view: RwLock<Option<Arc<dyn RuleView>>>,
    prefs: Arc<dyn Preferences>,
    inspector_listener: Mutex<Option<ListenerId>>,
    view_listener: Mutex<Option<ListenerId>>,
}

impl RuleViewTool {
    /// Mount `view`, subscribe to the inspector and render the current selection
    ///
    /// Inspector and widget events are handled on spawned tasks, so they must
    /// be emitted from within a Tokio runtime. The panel stops reacting to
    /// events once the returned `Arc` is dropped.
    #[must_use]
    pub async fn new(
        inspector: Arc<dyn Inspector>,
        view: Arc<dyn RuleView>,
        prefs: Arc<dyn Preferences>,
    ) -> Arc<Self> {
        view.mount();

        let tool = Arc::new(Self {
            inspector: RwLock::new(Some(inspector.clone())),
            view: RwLock::new(Some(view.clone())),
            prefs,
            inspector_listener: Mutex::new(None),
            view_listener: Mutex::new(None),
        });

        let weak = Arc::downgrade(&tool);
        let id = inspector.on(Arc::new(move |event: &InspectorEvent| {
            if let Some(tool) = weak.upgrade() {
                tool.handle_inspector_event(*event);
            }
        }));
        *tool.inspector_listener.lock() = Some(id);

        let weak = Arc::downgrade(&tool);
        let id = view.on(Arc::new(move |event: &RuleViewEvent| {
            if let Some(tool) = weak.upgrade() {
                tool.handle_view_event(event);
            }
        }));
        *tool.view_listener.lock() = Some(id);

        if let Err(e) = tool.on_selected(None).await {
            warn!("Initial rule view update failed: {}", e);
        }

        tool
    }

    /// Re-render for the current selection
    pub async fn on_selected(&self, change: Option<SelectionChange>) -> Result<()> {
        let (Some(inspector), Some(view)) = (self.inspector(), self.view()) else {
            debug!("Rule view destroyed, ignoring selection change");
            return Ok(());
        };
        update_for_selection(inspector.as_ref(), view.as_ref(), RULE_VIEW_PANEL, change).await
    }

    /// Re-render the current node
    pub fn refresh(&self) {
        if let Some(view) = self.view() {
            view.refresh_panel();
        }
    }

    /// Drop property edits made before a navigation
    pub fn clear_user_properties(&self) {
        if let Some(view) = self.view() {
            view.clear_user_properties();
        }
    }

    /// Open the stylesheet behind a clicked rule link
    ///
    /// System sheets and rules without a sheet go to the view-source window,
    /// everything else to the style editor.
    pub async fn on_link_clicked(&self, rule: &CssRule) -> Result<LinkNavigation> {
        let Some(inspector) = self.inspector() else {
            return Ok(LinkNavigation::Ignored);
        };

        let is_system = rule
            .parent_style_sheet
            .as_ref()
            .map_or(true, |sheet| sheet.is_system);
        if is_system {
            let href = rule
                .node_href
                .clone()
                .or_else(|| rule.href.clone())
                .unwrap_or_default();
            let line = rule.line.unwrap_or(0);
            let document = inspector.selection().document();
            inspector
                .view_source_utils()
                .view_source(&href, document.as_ref(), line);
            return Ok(LinkNavigation::ViewSource { href, line });
        }

        let location = if self.prefs.get_bool(ORIGINAL_SOURCES_PREF).unwrap_or(false) {
            inspector.original_location(rule).await?
        } else {
            rule.location.clone()
        };

        let toolbox = inspector.toolbox();
        if !toolbox.is_style_editor_supported() {
            debug!("Style editor unsupported for this target");
            return Ok(LinkNavigation::Unsupported);
        }

        let sheet = location.source.or(location.href).unwrap_or_default();
        toolbox
            .select_style_sheet(&sheet, location.line, location.column)
            .await?;

        Ok(LinkNavigation::StyleEditor {
            sheet,
            line: location.line,
            column: location.column,
        })
    }

    pub fn is_destroyed(&self) -> bool {
        self.view.read().is_none()
    }

    /// Unsubscribe, unmount and destroy the widget
    pub fn destroy(&self) {
        let inspector = self.inspector.write().take();
        let view = self.view.write().take();
        let (Some(inspector), Some(view)) = (inspector, view) else {
            debug!("Rule view already destroyed");
            return;
        };

        if let Some(id) = self.inspector_listener.lock().take() {
            inspector.off(id);
        }
        if let Some(id) = self.view_listener.lock().take() {
            view.off(id);
        }

        view.unmount();
        view.destroy();
        info!("Rule view destroyed");
    }

    fn inspector(&self) -> Option<Arc<dyn Inspector>> {
        self.inspector.read().clone()
    }

    fn view(&self) -> Option<Arc<dyn RuleView>> {
        self.view.read().clone()
    }

    fn handle_inspector_event(self: &Arc<Self>, event: InspectorEvent) {
        match event {
            InspectorEvent::NewNodeFront | InspectorEvent::Detached => {
                let change = if event == InspectorEvent::NewNodeFront {
                    SelectionChange::NewNodeFront
                } else {
                    SelectionChange::Detached
                };
                let tool = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = tool.on_selected(Some(change)).await {
                        warn!("Rule view update failed: {}", e);
                    }
                });
            }
            InspectorEvent::LayoutChange | InspectorEvent::PseudoClass => self.refresh(),
            InspectorEvent::Navigate => self.clear_user_properties(),
        }
    }

    fn handle_view_event(self: &Arc<Self>, event: &RuleViewEvent) {
        match event {
            RuleViewEvent::Changed => {
                if let Some(inspector) = self.inspector() {
                    inspector.mark_dirty();
                }
            }
            RuleViewEvent::Refreshed => {
                if let Some(inspector) = self.inspector() {
                    inspector.notify(InspectorNotice::RuleViewRefreshed);
                }
            }
            RuleViewEvent::LinkClicked(rule) => {
                let tool = self.clone();
                let rule = rule.clone();
                tokio::spawn(async move {
                    if let Err(e) = tool.on_link_clicked(&rule).await {
                        warn!("Failed to open stylesheet link: {}", e);
                    }
                });
            }
        }
    }
}

impl std::fmt::Debug for RuleViewTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleViewTool")
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
