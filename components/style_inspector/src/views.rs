//! Style rendering widgets driven by the panels

use async_trait::async_trait;
use devtools_types::{Listener, ListenerId};

use crate::types::{NodeFront, PageStyle, RuleViewEvent};

/// Widget rendering styles for one node
#[async_trait]
pub trait StyleView: Send + Sync {
    /// Attach the widget to the panel document
    fn mount(&self);

    /// Detach the widget from the panel document
    fn unmount(&self);

    fn set_page_style(&self, page_style: PageStyle);

    /// Render the empty state
    fn select_nothing(&self);

    /// Render styles for `node`
    async fn select_element(&self, node: NodeFront) -> anyhow::Result<()>;

    /// Re-render the current node
    fn refresh_panel(&self);

    fn destroy(&self);
}

/// Matched-rules widget
pub trait RuleView: StyleView {
    /// Forget property edits made during this session
    fn clear_user_properties(&self);

    fn on(&self, listener: Listener<RuleViewEvent>) -> ListenerId;

    fn off(&self, id: ListenerId) -> bool;
}
