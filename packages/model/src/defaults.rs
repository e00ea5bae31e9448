//! Default design-token bundle.
//!
//! Applied when a loaded project carries no variables at all, so the
//! preview theming pipeline always has a non-empty active color set.

use crate::variable::{Variable, VariableKind, VariableSet};

pub const DEFAULT_PRIMARY: &str = "#6D3DF2";
pub const DEFAULT_SECONDARY: &str = "#F55B00";
pub const DEFAULT_ACCENT: &str = "#00C4CC";
pub const DEFAULT_MUTED: &str = "#6B7280";
pub const DEFAULT_RADIUS: &str = "12px";

/// Seed color + radius token sets
pub fn default_variable_bundle() -> (Vec<VariableSet>, Vec<Variable>) {
    let sets = vec![
        VariableSet::new("set_colors", "Colors", "set_colors"),
        VariableSet::new("set_radius", "Radius", "set_radius"),
    ];

    let variables = vec![
        Variable::new(
            "var_primary",
            "Primary",
            "--primary",
            VariableKind::Color,
            DEFAULT_PRIMARY,
        )
        .in_set("set_colors"),
        Variable::new(
            "var_secondary",
            "Secondary",
            "--secondary",
            VariableKind::Color,
            DEFAULT_SECONDARY,
        )
        .in_set("set_colors"),
        Variable::new(
            "var_accent",
            "Accent",
            "--accent",
            VariableKind::Color,
            DEFAULT_ACCENT,
        )
        .in_set("set_colors"),
        Variable::new(
            "var_muted",
            "Muted",
            "--muted",
            VariableKind::Color,
            DEFAULT_MUTED,
        )
        .in_set("set_colors"),
        Variable::new(
            "var_radius",
            "Radius",
            "--radius",
            VariableKind::Size,
            DEFAULT_RADIUS,
        )
        .in_set("set_radius"),
    ];

    (sets, variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_active_palette() {
        let (sets, variables) = default_variable_bundle();
        let palette = sets.iter().find(|s| s.is_active_palette()).unwrap();

        let colors: Vec<&Variable> = variables
            .iter()
            .filter(|v| v.kind == VariableKind::Color && v.set_id() == Some(palette.id.as_str()))
            .collect();
        assert!(!colors.is_empty());
    }

    #[test]
    fn test_seed_includes_radius_token() {
        let (_, variables) = default_variable_bundle();
        let radius = variables.iter().find(|v| v.key == "--radius").unwrap();
        assert_eq!(radius.kind, VariableKind::Size);
        assert_eq!(radius.value, "12px");
    }
}
