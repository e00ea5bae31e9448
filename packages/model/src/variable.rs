use serde::{Deserialize, Serialize};

/// Keys a variable set may carry to mark itself as the active color palette
pub const ACTIVE_PALETTE_KEYS: [&str; 2] = ["set_colors", "colors"];

/// A named design token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub name: String,

    /// Style custom-property name, e.g. `--primary`
    pub key: String,

    #[serde(rename = "type")]
    pub kind: VariableKind,

    /// Primary value
    pub value: String,

    /// Secondary value; falls back to the primary when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,

    /// Owning set, accepted as either a bare id or an embedded object
    #[serde(
        default,
        rename = "variableSet",
        skip_serializing_if = "Option::is_none"
    )]
    pub variable_set: Option<VariableSetRef>,
}

impl Variable {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        kind: VariableKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: key.into(),
            kind,
            value: value.into(),
            secondary: None,
            variable_set: None,
        }
    }

    pub fn in_set(mut self, set_id: impl Into<String>) -> Self {
        self.variable_set = Some(VariableSetRef::Id(set_id.into()));
        self
    }

    /// Secondary value with the primary as fallback
    pub fn secondary_value(&self) -> &str {
        self.secondary.as_deref().unwrap_or(&self.value)
    }

    /// Normalized owning-set id, whichever wire form was used
    pub fn set_id(&self) -> Option<&str> {
        self.variable_set.as_ref().map(|s| s.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Color,
    Text,
    Size,
    Boolean,
}

/// Reference to a variable set: the backend sends either the id or the
/// whole embedded object depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSetRef {
    Embedded(VariableSet),
    Id(String),
}

impl VariableSetRef {
    pub fn id(&self) -> &str {
        match self {
            VariableSetRef::Id(id) => id,
            VariableSetRef::Embedded(set) => &set.id,
        }
    }
}

/// A named grouping of variables, e.g. the color palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSet {
    pub id: String,
    pub name: String,
    pub key: String,
}

impl VariableSet {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: key.into(),
        }
    }

    /// Whether this set is the palette consumed by the preview pipeline
    pub fn is_active_palette(&self) -> bool {
        ACTIVE_PALETTE_KEYS.contains(&self.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reference_accepts_both_wire_forms() {
        let by_id: Variable = serde_json::from_str(
            r##"{"id":"var_1","name":"Primary","key":"--primary","type":"color","value":"#6D3DF2","variableSet":"set_colors"}"##,
        )
        .unwrap();
        assert_eq!(by_id.set_id(), Some("set_colors"));

        let embedded: Variable = serde_json::from_str(
            r##"{"id":"var_1","name":"Primary","key":"--primary","type":"color","value":"#6D3DF2","variableSet":{"id":"set_colors","name":"Colors","key":"set_colors"}}"##,
        )
        .unwrap();
        assert_eq!(embedded.set_id(), Some("set_colors"));
    }

    #[test]
    fn test_secondary_falls_back_to_primary() {
        let mut var = Variable::new("var_1", "Primary", "--primary", VariableKind::Color, "#6D3DF2");
        assert_eq!(var.secondary_value(), "#6D3DF2");

        var.secondary = Some("#1F0A52".to_string());
        assert_eq!(var.secondary_value(), "#1F0A52");
    }

    #[test]
    fn test_active_palette_keys() {
        assert!(VariableSet::new("s1", "Colors", "set_colors").is_active_palette());
        assert!(VariableSet::new("s1", "Colors", "colors").is_active_palette());
        assert!(!VariableSet::new("s2", "Radius", "set_radius").is_active_palette());
    }
}
