use serde::{Deserialize, Serialize};

/// Top-level site container. Owns pages, variables and block instances
/// (by reference through their `project`-scoped collections).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Subdomain the published site is served under
    pub subdomain: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub tier: ProjectTier,

    #[serde(default)]
    pub settings: ProjectSettings,

    #[serde(default)]
    pub metadata: ProjectMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            subdomain: subdomain.into(),
            user_id: String::new(),
            tier: ProjectTier::default(),
            settings: ProjectSettings::default(),
            metadata: ProjectMetadata::default(),
            verification_token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTier {
    #[default]
    Free,
    Pro,
}

/// Site-wide design settings (typography)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
}

/// SEO metadata rendered into the document head
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let project = Project::new("proj_1", "Portfolio", "portfolio");
        assert_eq!(project.tier, ProjectTier::Free);
        assert!(project.settings.heading_font.is_none());
        assert!(project.verification_token.is_none());
    }

    #[test]
    fn test_project_wire_shape_is_camel_case() {
        let mut project = Project::new("proj_1", "Portfolio", "portfolio");
        project.user_id = "user_9".to_string();

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["userId"], "user_9");
        assert!(json.get("user_id").is_none());
    }
}
