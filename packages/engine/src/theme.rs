//! # Theming Pipeline
//!
//! Turns named design variables into concrete style declarations:
//!
//! - CSS custom properties for the active color palette
//! - font-family declarations plus an external font stylesheet URL
//! - symbolic theme tokens (`primary`, `gradient-primary-secondary`, …)
//!   resolved to solid or gradient preview styling

use sitekit_model::defaults::{
    DEFAULT_ACCENT, DEFAULT_MUTED, DEFAULT_PRIMARY, DEFAULT_SECONDARY,
};
use sitekit_model::{ProjectSettings, CssRule, Variable, VariableKind, VariableSet};
use tracing::debug;

/// Hex alpha suffix applied to every gradient color stop (~25%)
const GRADIENT_ALPHA: &str = "40";

const FONT_CSS_ENDPOINT: &str = "https://fonts.googleapis.com/css2";

/// CSS custom-property declarations for all color variables in the active
/// palette set. When no set carries a palette key, every color variable is
/// treated as active.
pub fn css_custom_properties(
    sets: &[VariableSet],
    variables: &[Variable],
) -> Vec<(String, String)> {
    let active_set = sets.iter().find(|s| s.is_active_palette());

    variables
        .iter()
        .filter(|v| v.kind == VariableKind::Color)
        .filter(|v| match active_set {
            Some(set) => v.set_id() == Some(set.id.as_str()),
            None => true,
        })
        .map(|v| (custom_property_name(&v.key), v.value.clone()))
        .collect()
}

/// Whether the preview has a non-empty active color set to render with
pub fn has_active_palette(sets: &[VariableSet], variables: &[Variable]) -> bool {
    !css_custom_properties(sets, variables).is_empty()
}

fn custom_property_name(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        format!("--{}", key.trim_start_matches('-'))
    }
}

/// Concrete palette colors consumed by theme-token resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub muted: String,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
            muted: DEFAULT_MUTED.to_string(),
        }
    }
}

impl ThemePalette {
    /// Build the palette from the active color set, falling back to the
    /// documented defaults for any missing slot.
    pub fn from_variables(sets: &[VariableSet], variables: &[Variable]) -> Self {
        let declarations = css_custom_properties(sets, variables);
        let lookup = |name: &str| {
            declarations
                .iter()
                .find(|(key, _)| key == &format!("--{}", name))
                .map(|(_, value)| value.clone())
        };

        Self {
            primary: lookup("primary").unwrap_or_else(|| DEFAULT_PRIMARY.to_string()),
            secondary: lookup("secondary").unwrap_or_else(|| DEFAULT_SECONDARY.to_string()),
            accent: lookup("accent").unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
            muted: lookup("muted").unwrap_or_else(|| DEFAULT_MUTED.to_string()),
        }
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        match name {
            "primary" => Some(&self.primary),
            "secondary" => Some(&self.secondary),
            "accent" => Some(&self.accent),
            "muted" => Some(&self.muted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

impl GradientKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "radial" => GradientKind::Radial,
            _ => GradientKind::Linear,
        }
    }
}

/// Resolved preview styling for one theme token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenStyle {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl TokenStyle {
    fn solid(background: &str, foreground: &str) -> Self {
        Self {
            background: Some(background.to_string()),
            foreground: Some(foreground.to_string()),
        }
    }
}

/// Resolve a symbolic theme token to concrete styling.
///
/// Solid tokens (`primary`, `secondary`, `accent`, `muted`) produce a
/// background/foreground pair; `none` produces no styling; gradient tokens
/// (`gradient-<from>-<to>`) produce a two-stop gradient with a fixed 25%
/// alpha on each stop. Linear gradients run left to right; radial
/// gradients are a circle centered in the element.
pub fn resolve_token(token: &str, kind: GradientKind, palette: &ThemePalette) -> TokenStyle {
    if token == "none" || token.is_empty() {
        return TokenStyle::default();
    }

    if let Some(pair) = token.strip_prefix("gradient-") {
        let Some((from_name, to_name)) = pair.split_once('-') else {
            debug!(token, "malformed gradient token");
            return TokenStyle::default();
        };
        let from = palette.color(from_name).unwrap_or(DEFAULT_PRIMARY);
        let to = palette.color(to_name).unwrap_or(DEFAULT_SECONDARY);

        let background = match kind {
            GradientKind::Linear => format!(
                "linear-gradient(to right, {from}{a}, {to}{a})",
                from = from,
                to = to,
                a = GRADIENT_ALPHA
            ),
            GradientKind::Radial => format!(
                "radial-gradient(circle, {from}{a}, {to}{a})",
                from = from,
                to = to,
                a = GRADIENT_ALPHA
            ),
        };

        return TokenStyle {
            background: Some(background),
            foreground: Some("#FFFFFF".to_string()),
        };
    }

    match palette.color(token) {
        Some(color) => {
            let foreground = if token == "muted" { "#111827" } else { "#FFFFFF" };
            TokenStyle::solid(color, foreground)
        }
        None => {
            debug!(token, "unknown theme token");
            TokenStyle::default()
        }
    }
}

/// Resolved typography for a project
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontResolution {
    pub heading_family: Option<String>,
    pub body_family: Option<String>,
    /// External stylesheet URL, present when at least one font is named
    pub stylesheet_url: Option<String>,
}

impl FontResolution {
    /// Font-family rules for the document
    pub fn css_rules(&self) -> Vec<CssRule> {
        let mut rules = Vec::new();

        if let Some(body) = &self.body_family {
            rules.push(CssRule {
                selector: "body".to_string(),
                declarations: vec![(
                    "font-family".to_string(),
                    format!("'{}', sans-serif", body),
                )],
            });
        }

        if let Some(heading) = &self.heading_family {
            rules.push(CssRule {
                selector: "h1, h2, h3, h4, h5, h6".to_string(),
                declarations: vec![(
                    "font-family".to_string(),
                    format!("'{}', sans-serif", heading),
                )],
            });
        }

        rules
    }
}

/// Resolve heading/body font names into families plus a loading URL
pub fn resolve_fonts(settings: &ProjectSettings) -> FontResolution {
    let heading = settings.heading_font.clone().filter(|f| !f.is_empty());
    let body = settings.body_font.clone().filter(|f| !f.is_empty());

    let mut families: Vec<&String> = Vec::new();
    for font in [&heading, &body].into_iter().flatten() {
        if !families.contains(&font) {
            families.push(font);
        }
    }

    let stylesheet_url = if families.is_empty() {
        None
    } else {
        let query: Vec<String> = families
            .iter()
            .map(|f| format!("family={}", f.replace(' ', "+")))
            .collect();
        Some(format!(
            "{}?{}&display=swap",
            FONT_CSS_ENDPOINT,
            query.join("&")
        ))
    };

    FontResolution {
        heading_family: heading,
        body_family: body,
        stylesheet_url,
    }
}
