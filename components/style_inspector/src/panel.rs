//! Selection handling shared by the style panels

use tracing::debug;

use crate::error::{Result, StyleInspectorError};
use crate::inspector::Inspector;
use crate::types::SelectionChange;
use crate::views::StyleView;

/// Bring `view` in line with the inspector's current selection
///
/// Non-element or disconnected selections render the empty state. An element
/// is rendered on the initial update and on a new node front; a detached
/// notification for a still-connected element leaves the view as is.
pub(crate) async fn update_for_selection<V>(
    inspector: &dyn Inspector,
    view: &V,
    panel: &'static str,
    change: Option<SelectionChange>,
) -> Result<()>
where
    V: StyleView + ?Sized,
{
    view.set_page_style(inspector.page_style());

    let selection = inspector.selection();
    if !selection.is_connected() || !selection.is_element_node() {
        debug!("{}: selection is not an element, clearing", panel);
        view.select_nothing();
        return Ok(());
    }

    if !matches!(change, None | Some(SelectionChange::NewNodeFront)) {
        return Ok(());
    }

    let Some(node) = selection.node_front() else {
        view.select_nothing();
        return Ok(());
    };

    debug!("{}: rendering {}", panel, node.node_name);
    let done = inspector.updating(panel);
    let rendered = view.select_element(node).await;
    done();

    rendered.map_err(|e| StyleInspectorError::Render {
        panel,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_inspector::{MockInspector, MockStyleView, ViewCall};
    use crate::types::NodeFront;
    use devtools_types::ActorId;

    fn span() -> NodeFront {
        NodeFront {
            actor: ActorId::new("conn0.node8"),
            node_name: "SPAN".to_string(),
        }
    }

    #[test]
    fn test_update_renders_element() {
        let inspector = MockInspector::new();
        inspector.mock_selection().select_element(span());
        let view = MockStyleView::new();

        tokio_test::block_on(update_for_selection(&inspector, &view, "test-panel", None)).unwrap();

        assert_eq!(view.calls().last(), Some(&ViewCall::SelectElement(span())));
        assert_eq!(inspector.updates(), vec!["test-panel:begin", "test-panel:end"]);
    }

    #[test]
    fn test_update_ignores_detached_for_connected_element() {
        let inspector = MockInspector::new();
        inspector.mock_selection().select_element(span());
        let view = MockStyleView::new();

        tokio_test::block_on(update_for_selection(
            &inspector,
            &view,
            "test-panel",
            Some(SelectionChange::Detached),
        ))
        .unwrap();

        assert_eq!(view.calls().len(), 1);
        assert!(inspector.updates().is_empty());
    }

    #[test]
    fn test_update_reports_render_failure() {
        let inspector = MockInspector::new();
        inspector.mock_selection().select_element(span());
        let view = MockStyleView::new();
        view.fail_render(true);

        let result = tokio_test::block_on(update_for_selection(&inspector, &view, "test-panel", None));

        match result {
            Err(StyleInspectorError::Render { panel, message }) => {
                assert_eq!(panel, "test-panel");
                assert!(message.contains("SPAN"));
            }
            other => panic!("Expected render error, got {:?}", other),
        }
        assert_eq!(inspector.updates().len(), 2);
    }
}
