//! Computed view panel controller

use devtools_types::ListenerId;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::inspector::Inspector;
use crate::panel::update_for_selection;
use crate::types::{InspectorEvent, SelectionChange};
use crate::views::StyleView;

/// Name the computed view reports updates under
pub const COMPUTED_VIEW_PANEL: &str = "computed-view";

/// Controller for the computed view panel
pub struct ComputedViewTool {
    inspector: RwLock<Option<Arc<dyn Inspector>>>,
    view: RwLock<Option<Arc<dyn StyleView>>>,
    inspector_listener: Mutex<Option<ListenerId>>,
}

impl ComputedViewTool {
    /// Mount `view` empty, subscribe to the inspector and render the selection
    ///
    /// The panel stops reacting to events once the returned `Arc` is dropped.
    #[must_use]
    pub async fn new(inspector: Arc<dyn Inspector>, view: Arc<dyn StyleView>) -> Arc<Self> {
        view.mount();
        view.select_nothing();

        let tool = Arc::new(Self {
            inspector: RwLock::new(Some(inspector.clone())),
            view: RwLock::new(Some(view)),
            inspector_listener: Mutex::new(None),
        });

        let weak = Arc::downgrade(&tool);
        let id = inspector.on(Arc::new(move |event: &InspectorEvent| {
            let Some(tool) = weak.upgrade() else {
                return;
            };
            match event {
                InspectorEvent::NewNodeFront | InspectorEvent::Detached => {
                    let change = if *event == InspectorEvent::NewNodeFront {
                        SelectionChange::NewNodeFront
                    } else {
                        SelectionChange::Detached
                    };
                    tokio::spawn(async move {
                        if let Err(e) = tool.on_selected(Some(change)).await {
                            warn!("Computed view update failed: {}", e);
                        }
                    });
                }
                InspectorEvent::LayoutChange | InspectorEvent::PseudoClass => tool.refresh(),
                InspectorEvent::Navigate => {}
            }
        }));
        *tool.inspector_listener.lock() = Some(id);

        if let Err(e) = tool.on_selected(None).await {
            warn!("Initial computed view update failed: {}", e);
        }

        tool
    }

    /// Re-render for the current selection
    pub async fn on_selected(&self, change: Option<SelectionChange>) -> Result<()> {
        let inspector = self.inspector.read().clone();
        let view = self.view.read().clone();
        let (Some(inspector), Some(view)) = (inspector, view) else {
            debug!("Computed view destroyed, ignoring selection change");
            return Ok(());
        };
        update_for_selection(inspector.as_ref(), view.as_ref(), COMPUTED_VIEW_PANEL, change)
            .await
    }

    pub fn refresh(&self) {
        if let Some(view) = self.view.read().clone() {
            view.refresh_panel();
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.view.read().is_none()
    }

    /// Unsubscribe, unmount and destroy the widget
    pub fn destroy(&self) {
        let inspector = self.inspector.write().take();
        let view = self.view.write().take();
        let (Some(inspector), Some(view)) = (inspector, view) else {
            debug!("Computed view already destroyed");
            return;
        };

        if let Some(id) = self.inspector_listener.lock().take() {
            inspector.off(id);
        }

        view.unmount();
        view.destroy();
        info!("Computed view destroyed");
    }
}

impl std::fmt::Debug for ComputedViewTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedViewTool")
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
