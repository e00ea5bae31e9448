//! Page evaluation tests

use crate::evaluator::{preview_ready, EvalInput, PageEvaluator};
use crate::registry::BlockRegistry;
use sitekit_model::{
    default_variable_bundle, BlockInstance, BlockNode, EditorState, Mutation, Project,
};
use serde_json::json;

fn seeded_state() -> EditorState {
    let mut state = EditorState::new(Project::new("proj_1", "Portfolio", "portfolio"));
    let (sets, variables) = default_variable_bundle();
    state.variable_sets = sets;
    state.variables = variables;
    state
        .apply(Mutation::AddPage {
            name: "Home".to_string(),
        })
        .unwrap();
    state
}

fn add_block(state: &mut EditorState, category: &str, variant: &str) -> String {
    let page_id = state.selected_page_id.clone().unwrap();
    state
        .apply(Mutation::AddBlock {
            page_id,
            category: category.to_string(),
            variant: variant.to_string(),
        })
        .unwrap();
    state.selected_block_id.clone().unwrap()
}

#[test]
fn test_evaluates_blocks_in_index_order() {
    let mut state = seeded_state();
    let hero = add_block(&mut state, "hero", "centered");
    let footer = add_block(&mut state, "footer", "simple");
    let cta = add_block(&mut state, "cta", "banner");

    // Move the footer to the end regardless of insertion order
    state
        .apply(Mutation::MoveBlock {
            block_id: footer.clone(),
            index: 10,
        })
        .unwrap();

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    assert_eq!(rendered.nodes.len(), 3);

    let classes: Vec<String> = rendered
        .nodes
        .iter()
        .map(|n| match n {
            BlockNode::Element { attributes, .. } => {
                attributes.get("class").cloned().unwrap_or_default()
            }
            _ => String::new(),
        })
        .collect();

    assert!(classes[0].contains("sk-hero"));
    assert!(classes[1].contains("sk-cta"));
    assert!(classes[2].contains("sk-footer"));
    let _ = (hero, cta);
}

#[test]
fn test_linked_block_renders_root_content() {
    let mut state = seeded_state();
    let source = add_block(&mut state, "hero", "centered");
    let clone = add_block(&mut state, "hero", "centered");

    state
        .apply(Mutation::SetBlockField {
            block_id: source.clone(),
            field: "heading".to_string(),
            value: json!("Source heading"),
        })
        .unwrap();
    state
        .apply(Mutation::SetBlockField {
            block_id: clone.clone(),
            field: "heading".to_string(),
            value: json!("Clone heading, never rendered"),
        })
        .unwrap();
    state
        .apply(Mutation::LinkBlock {
            block_id: clone,
            source_id: source,
        })
        .unwrap();

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    let json = serde_json::to_string(&rendered).unwrap();
    assert_eq!(json.matches("Source heading").count(), 2);
    assert!(!json.contains("never rendered"));
}

#[test]
fn test_cycle_degrades_to_inline_error() {
    let mut state = seeded_state();
    let a = add_block(&mut state, "hero", "centered");
    let b = add_block(&mut state, "cta", "banner");

    state
        .apply(Mutation::LinkBlock {
            block_id: a.clone(),
            source_id: b.clone(),
        })
        .unwrap();
    state
        .apply(Mutation::LinkBlock {
            block_id: b,
            source_id: a,
        })
        .unwrap();

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    assert_eq!(rendered.nodes.len(), 2);
    assert!(rendered.nodes.iter().all(|n| n.is_error()));
}

#[test]
fn test_unknown_template_renders_diagnostic_panel() {
    let mut state = seeded_state();
    add_block(&mut state, "carousel", "missing-variant");

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    let json = serde_json::to_string(&rendered).unwrap();
    assert!(json.contains("carousel/missing-variant"));
}

#[test]
fn test_orphaned_block_renders_on_selected_page() {
    let mut state = seeded_state();
    let block_id = add_block(&mut state, "hero", "centered");
    state.block_mut(&block_id).unwrap().page_id = "page_gone".to_string();

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    assert_eq!(rendered.nodes.len(), 1);
}

#[test]
fn test_custom_properties_rule_present() {
    let state = seeded_state();
    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);
    let page_id = state.selected_page_id.clone().unwrap();
    let rendered = evaluator.evaluate(&EvalInput::from(&state), &page_id);

    let root = rendered
        .styles
        .iter()
        .find(|r| r.selector == ":root")
        .unwrap();
    assert!(root
        .declarations
        .contains(&("--primary".to_string(), "#6D3DF2".to_string())));
}

#[test]
fn test_preview_gate_requires_active_palette() {
    let state = seeded_state();
    assert!(preview_ready(&EvalInput::from(&state)));

    let empty = EditorState::new(Project::new("proj_2", "Empty", "empty"));
    assert!(!preview_ready(&EvalInput::from(&empty)));
}
