//! Tests for the rule view and computed view panels

use devtools_types::{ActorId, MemoryPreferences, Preferences};
use std::sync::Arc;
use style_inspector::{
    ComputedViewTool, CssRule, DocumentRef, InspectorEvent, InspectorNotice, LinkNavigation,
    MockInspector, MockStyleView, NodeFront, PageStyle, RuleViewEvent, RuleViewTool,
    SelectionChange, SourceLocation, StyleInspectorError, StyleSheetInfo, ViewCall,
    ORIGINAL_SOURCES_PREF,
};

fn div() -> NodeFront {
    NodeFront {
        actor: ActorId::new("conn0.node5"),
        node_name: "DIV".to_string(),
    }
}

fn page_style() -> PageStyle {
    PageStyle {
        actor: ActorId::new("conn0.pagestyle3"),
    }
}

fn sheet_rule(is_system: bool) -> CssRule {
    CssRule {
        actor: ActorId::new("conn0.domstylerule9"),
        href: Some("https://example.com/site.css".to_string()),
        node_href: None,
        line: Some(14),
        column: Some(3),
        parent_style_sheet: Some(StyleSheetInfo {
            href: Some("https://example.com/site.css".to_string()),
            is_system,
        }),
        location: SourceLocation {
            source: None,
            href: Some("https://example.com/site.css".to_string()),
            line: 14,
            column: 3,
        },
    }
}

async fn rule_view(
    inspector: &Arc<MockInspector>,
    view: &Arc<MockStyleView>,
    prefs: Arc<dyn Preferences>,
) -> Arc<RuleViewTool> {
    RuleViewTool::new(inspector.clone(), view.clone(), prefs).await
}

/// Let spawned handlers run on the current-thread runtime
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Rule View Selection Tests
// ============================================================================

#[tokio::test]
async fn test_rule_view_clears_without_element() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());

    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    assert_eq!(
        view.calls(),
        vec![
            ViewCall::Mount,
            ViewCall::SetPageStyle(page_style()),
            ViewCall::SelectNothing,
        ]
    );
    assert!(inspector.updates().is_empty());
    assert!(!tool.is_destroyed());
}

#[tokio::test]
async fn test_rule_view_clears_for_text_node() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_selection().select_non_element(NodeFront {
        actor: ActorId::new("conn0.node6"),
        node_name: "#text".to_string(),
    });
    let view = Arc::new(MockStyleView::new());

    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    assert!(view.calls().contains(&ViewCall::SelectNothing));
    assert!(!view
        .calls()
        .iter()
        .any(|call| matches!(call, ViewCall::SelectElement(_))));
    assert!(inspector.updates().is_empty());
}

#[tokio::test]
async fn test_rule_view_renders_selected_element() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_selection().select_element(div());
    let view = Arc::new(MockStyleView::new());

    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    assert_eq!(
        view.calls(),
        vec![
            ViewCall::Mount,
            ViewCall::SetPageStyle(page_style()),
            ViewCall::SelectElement(div()),
        ]
    );
    assert_eq!(inspector.updates(), vec!["rule-view:begin", "rule-view:end"]);
}

#[tokio::test]
async fn test_rule_view_follows_new_node_front() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    view.clear_calls();

    inspector.mock_selection().select_element(div());
    inspector.emit(InspectorEvent::NewNodeFront);
    settle().await;

    assert_eq!(
        view.calls(),
        vec![ViewCall::SetPageStyle(page_style()), ViewCall::SelectElement(div())]
    );
    assert_eq!(inspector.updates(), vec!["rule-view:begin", "rule-view:end"]);
}

#[tokio::test]
async fn test_detached_connected_element_keeps_view() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_selection().select_element(div());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    view.clear_calls();

    tool.on_selected(Some(SelectionChange::Detached)).await.unwrap();

    assert_eq!(view.calls(), vec![ViewCall::SetPageStyle(page_style())]);
    assert_eq!(inspector.updates().len(), 2);
}

#[tokio::test]
async fn test_detached_disconnected_node_clears_view() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_selection().select_element(div());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    view.clear_calls();

    inspector.mock_selection().set_connected(false);
    inspector.emit(InspectorEvent::Detached);
    settle().await;

    assert_eq!(
        view.calls(),
        vec![ViewCall::SetPageStyle(page_style()), ViewCall::SelectNothing]
    );
}

#[tokio::test]
async fn test_render_failure_still_ends_update() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    inspector.mock_selection().select_element(div());
    view.fail_render(true);
    let result = tool.on_selected(Some(SelectionChange::NewNodeFront)).await;

    assert!(matches!(
        result,
        Err(StyleInspectorError::Render { panel: "rule-view", .. })
    ));
    assert_eq!(inspector.updates(), vec!["rule-view:begin", "rule-view:end"]);
}

// ============================================================================
// Rule View Event Tests
// ============================================================================

#[tokio::test]
async fn test_layout_and_pseudo_class_refresh() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    view.clear_calls();

    inspector.emit(InspectorEvent::LayoutChange);
    inspector.emit(InspectorEvent::PseudoClass);

    assert_eq!(
        view.calls(),
        vec![ViewCall::RefreshPanel, ViewCall::RefreshPanel]
    );
}

#[tokio::test]
async fn test_navigation_clears_user_properties() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    view.clear_calls();

    inspector.emit(InspectorEvent::Navigate);

    assert_eq!(view.calls(), vec![ViewCall::ClearUserProperties]);
}

#[tokio::test]
async fn test_property_change_marks_inspector_dirty() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    view.emit(RuleViewEvent::Changed);
    view.emit(RuleViewEvent::Changed);

    assert_eq!(inspector.dirty_count(), 2);
}

#[tokio::test]
async fn test_refresh_is_reported_to_inspector() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    view.emit(RuleViewEvent::Refreshed);

    assert_eq!(inspector.notices(), vec![InspectorNotice::RuleViewRefreshed]);
}

// ============================================================================
// Link Navigation Tests
// ============================================================================

#[tokio::test]
async fn test_system_sheet_link_opens_view_source() {
    let inspector = Arc::new(MockInspector::new());
    let document = DocumentRef {
        url: "https://example.com/".to_string(),
    };
    inspector.mock_selection().set_document(document.clone());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    let mut rule = sheet_rule(true);
    rule.node_href = Some("https://example.com/index.html".to_string());
    let navigation = tool.on_link_clicked(&rule).await.unwrap();

    assert_eq!(
        navigation,
        LinkNavigation::ViewSource {
            href: "https://example.com/index.html".to_string(),
            line: 14,
        }
    );
    assert_eq!(
        inspector.mock_view_source().opened(),
        vec![(
            "https://example.com/index.html".to_string(),
            Some(document),
            14
        )]
    );
    assert!(inspector.mock_toolbox().selected_sheets().is_empty());
}

#[tokio::test]
async fn test_rule_without_sheet_opens_view_source() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    let mut rule = sheet_rule(false);
    rule.parent_style_sheet = None;
    let navigation = tool.on_link_clicked(&rule).await.unwrap();

    assert!(matches!(navigation, LinkNavigation::ViewSource { .. }));
}

#[tokio::test]
async fn test_sheet_link_opens_style_editor() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    let navigation = tool.on_link_clicked(&sheet_rule(false)).await.unwrap();

    assert_eq!(
        navigation,
        LinkNavigation::StyleEditor {
            sheet: "https://example.com/site.css".to_string(),
            line: 14,
            column: 3,
        }
    );
    assert_eq!(
        inspector.mock_toolbox().selected_sheets(),
        vec![("https://example.com/site.css".to_string(), 14, 3)]
    );
}

#[tokio::test]
async fn test_original_sources_pref_uses_mapped_location() {
    let inspector = Arc::new(MockInspector::new());
    inspector.set_original_location(SourceLocation {
        source: Some("https://example.com/site.scss".to_string()),
        href: None,
        line: 7,
        column: 1,
    });
    let prefs = Arc::new(MemoryPreferences::new().with_bool(ORIGINAL_SOURCES_PREF, true));
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, prefs).await;

    tool.on_link_clicked(&sheet_rule(false)).await.unwrap();

    assert_eq!(
        inspector.mock_toolbox().selected_sheets(),
        vec![("https://example.com/site.scss".to_string(), 7, 1)]
    );
}

#[tokio::test]
async fn test_missing_source_map_is_an_error() {
    let inspector = Arc::new(MockInspector::new());
    let prefs = Arc::new(MemoryPreferences::new().with_bool(ORIGINAL_SOURCES_PREF, true));
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, prefs).await;

    let result = tool.on_link_clicked(&sheet_rule(false)).await;

    assert!(matches!(result, Err(StyleInspectorError::Other(_))));
    assert!(inspector.mock_toolbox().selected_sheets().is_empty());
}

#[tokio::test]
async fn test_unsupported_style_editor() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_toolbox().set_style_editor_supported(false);
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    let navigation = tool.on_link_clicked(&sheet_rule(false)).await.unwrap();

    assert_eq!(navigation, LinkNavigation::Unsupported);
    assert!(inspector.mock_toolbox().selected_sheets().is_empty());
}

#[tokio::test]
async fn test_link_click_event_is_dispatched() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    view.emit(RuleViewEvent::LinkClicked(sheet_rule(false)));
    settle().await;

    assert_eq!(inspector.mock_toolbox().selected_sheets().len(), 1);
}

// ============================================================================
// Rule View Teardown Tests
// ============================================================================

#[tokio::test]
async fn test_rule_view_destroy_releases_everything() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    assert_eq!(inspector.listener_count(), 1);
    assert_eq!(view.listener_count(), 1);
    view.clear_calls();

    tool.destroy();

    assert!(tool.is_destroyed());
    assert_eq!(inspector.listener_count(), 0);
    assert_eq!(view.listener_count(), 0);
    assert_eq!(view.calls(), vec![ViewCall::Unmount, ViewCall::Destroy]);

    inspector.emit(InspectorEvent::LayoutChange);
    tool.refresh();
    tool.on_selected(None).await.unwrap();
    assert_eq!(
        tool.on_link_clicked(&sheet_rule(false)).await.unwrap(),
        LinkNavigation::Ignored
    );
    assert_eq!(view.calls(), vec![ViewCall::Unmount, ViewCall::Destroy]);
}

#[tokio::test]
async fn test_rule_view_destroy_twice() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;

    tool.destroy();
    tool.destroy();

    let destroys = view
        .calls()
        .into_iter()
        .filter(|call| *call == ViewCall::Destroy)
        .count();
    assert_eq!(destroys, 1);
}

#[tokio::test]
async fn test_dropped_tool_stops_listening() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = rule_view(&inspector, &view, Arc::new(MemoryPreferences::new())).await;
    drop(tool);
    view.clear_calls();

    inspector.emit(InspectorEvent::LayoutChange);

    assert!(view.calls().is_empty());
}

// ============================================================================
// Computed View Tests
// ============================================================================

#[tokio::test]
async fn test_computed_view_starts_empty() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());

    let _tool = ComputedViewTool::new(inspector.clone(), view.clone()).await;

    assert_eq!(
        view.calls(),
        vec![
            ViewCall::Mount,
            ViewCall::SelectNothing,
            ViewCall::SetPageStyle(page_style()),
            ViewCall::SelectNothing,
        ]
    );
}

#[tokio::test]
async fn test_computed_view_renders_selection() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = ComputedViewTool::new(inspector.clone(), view.clone()).await;
    view.clear_calls();

    inspector.mock_selection().select_element(div());
    inspector.emit(InspectorEvent::NewNodeFront);
    settle().await;

    assert_eq!(
        view.calls(),
        vec![ViewCall::SetPageStyle(page_style()), ViewCall::SelectElement(div())]
    );
    assert_eq!(
        inspector.updates(),
        vec!["computed-view:begin", "computed-view:end"]
    );
}

#[tokio::test]
async fn test_computed_view_failure_ends_update() {
    let inspector = Arc::new(MockInspector::new());
    inspector.mock_selection().select_element(div());
    let view = Arc::new(MockStyleView::new());
    view.fail_render(true);

    let tool = ComputedViewTool::new(inspector.clone(), view.clone()).await;

    assert_eq!(
        inspector.updates(),
        vec!["computed-view:begin", "computed-view:end"]
    );
    assert!(!tool.is_destroyed());
}

#[tokio::test]
async fn test_computed_view_refresh_and_navigation() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let _tool = ComputedViewTool::new(inspector.clone(), view.clone()).await;
    view.clear_calls();

    inspector.emit(InspectorEvent::LayoutChange);
    inspector.emit(InspectorEvent::PseudoClass);
    inspector.emit(InspectorEvent::Navigate);

    assert_eq!(
        view.calls(),
        vec![ViewCall::RefreshPanel, ViewCall::RefreshPanel]
    );
}

#[tokio::test]
async fn test_computed_view_destroy_unsubscribes() {
    let inspector = Arc::new(MockInspector::new());
    let view = Arc::new(MockStyleView::new());
    let tool = ComputedViewTool::new(inspector.clone(), view.clone()).await;
    assert_eq!(inspector.listener_count(), 1);
    view.clear_calls();

    tool.destroy();
    inspector.mock_selection().select_element(div());
    inspector.emit(InspectorEvent::NewNodeFront);
    settle().await;

    assert_eq!(inspector.listener_count(), 0);
    assert_eq!(view.calls(), vec![ViewCall::Unmount, ViewCall::Destroy]);
    assert!(inspector.updates().is_empty());
}
