//! Theming pipeline tests

use crate::theme::*;
use pretty_assertions::assert_eq;
use sitekit_model::{ProjectSettings, Variable, VariableKind, VariableSet};

fn color(id: &str, key: &str, value: &str, set: &str) -> Variable {
    Variable::new(id, key.trim_start_matches('-'), key, VariableKind::Color, value).in_set(set)
}

#[test]
fn test_custom_properties_for_active_set() {
    let sets = vec![
        VariableSet::new("set_colors", "Colors", "set_colors"),
        VariableSet::new("set_radius", "Radius", "set_radius"),
    ];
    let variables = vec![
        color("var_1", "--primary", "#6D3DF2", "set_colors"),
        Variable::new("var_2", "Radius", "--radius", VariableKind::Size, "12px")
            .in_set("set_radius"),
    ];

    let declarations = css_custom_properties(&sets, &variables);
    assert_eq!(
        declarations,
        vec![("--primary".to_string(), "#6D3DF2".to_string())]
    );
}

#[test]
fn test_variables_outside_active_set_excluded() {
    let sets = vec![
        VariableSet::new("set_colors", "Colors", "set_colors"),
        VariableSet::new("set_alt", "Alternates", "set_alt"),
    ];
    let variables = vec![
        color("var_1", "--primary", "#6D3DF2", "set_colors"),
        color("var_2", "--alt", "#000000", "set_alt"),
    ];

    let declarations = css_custom_properties(&sets, &variables);
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].0, "--primary");
}

#[test]
fn test_all_color_variables_active_without_palette_set() {
    let sets = vec![VariableSet::new("set_radius", "Radius", "set_radius")];
    let variables = vec![
        color("var_1", "--primary", "#6D3DF2", "set_anything"),
        color("var_2", "--secondary", "#F55B00", "set_other"),
    ];

    let declarations = css_custom_properties(&sets, &variables);
    assert_eq!(declarations.len(), 2);
}

#[test]
fn test_key_normalization_adds_custom_property_prefix() {
    let variables = vec![color("var_1", "primary", "#6D3DF2", "set_colors")];
    let sets = vec![VariableSet::new("set_colors", "Colors", "set_colors")];

    let declarations = css_custom_properties(&sets, &variables);
    assert_eq!(declarations[0].0, "--primary");
}

#[test]
fn test_solid_token_resolution() {
    let palette = ThemePalette::default();
    let style = resolve_token("primary", GradientKind::Linear, &palette);

    assert_eq!(style.background.as_deref(), Some("#6D3DF2"));
    assert_eq!(style.foreground.as_deref(), Some("#FFFFFF"));
}

#[test]
fn test_none_token_produces_no_styling() {
    let palette = ThemePalette::default();
    let style = resolve_token("none", GradientKind::Linear, &palette);
    assert_eq!(style, TokenStyle::default());
}

#[test]
fn test_linear_gradient_token() {
    let palette = ThemePalette::default();
    let style = resolve_token("gradient-primary-secondary", GradientKind::Linear, &palette);

    assert_eq!(
        style.background.as_deref(),
        Some("linear-gradient(to right, #6D3DF240, #F55B0040)")
    );
}

#[test]
fn test_radial_gradient_token() {
    let palette = ThemePalette::default();
    let style = resolve_token("gradient-primary-secondary", GradientKind::Radial, &palette);

    assert_eq!(
        style.background.as_deref(),
        Some("radial-gradient(circle, #6D3DF240, #F55B0040)")
    );
}

#[test]
fn test_gradient_uses_palette_values() {
    let sets = vec![VariableSet::new("set_colors", "Colors", "set_colors")];
    let variables = vec![
        color("var_1", "--primary", "#111111", "set_colors"),
        color("var_2", "--secondary", "#222222", "set_colors"),
    ];
    let palette = ThemePalette::from_variables(&sets, &variables);

    let style = resolve_token("gradient-primary-secondary", GradientKind::Linear, &palette);
    assert_eq!(
        style.background.as_deref(),
        Some("linear-gradient(to right, #11111140, #22222240)")
    );
}

#[test]
fn test_palette_falls_back_to_documented_defaults() {
    let palette = ThemePalette::from_variables(&[], &[]);
    assert_eq!(palette.primary, "#6D3DF2");
    assert_eq!(palette.secondary, "#F55B00");
}

#[test]
fn test_font_resolution_builds_stylesheet_url() {
    let settings = ProjectSettings {
        heading_font: Some("Space Grotesk".to_string()),
        body_font: Some("Inter".to_string()),
    };

    let fonts = resolve_fonts(&settings);
    assert_eq!(
        fonts.stylesheet_url.as_deref(),
        Some("https://fonts.googleapis.com/css2?family=Space+Grotesk&family=Inter&display=swap")
    );
    assert_eq!(fonts.css_rules().len(), 2);
}

#[test]
fn test_font_resolution_without_fonts() {
    let fonts = resolve_fonts(&ProjectSettings::default());
    assert_eq!(fonts.stylesheet_url, None);
    assert!(fonts.css_rules().is_empty());
}

#[test]
fn test_same_font_for_heading_and_body_deduplicates() {
    let settings = ProjectSettings {
        heading_font: Some("Inter".to_string()),
        body_font: Some("Inter".to_string()),
    };

    let fonts = resolve_fonts(&settings);
    assert_eq!(
        fonts.stylesheet_url.as_deref(),
        Some("https://fonts.googleapis.com/css2?family=Inter&display=swap")
    );
}
