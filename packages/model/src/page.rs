use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitekit_common::page_id;

/// A single routed page of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,

    /// Route the page is served under, always with a leading slash
    pub path: String,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a page with a generated id and a path derived from its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: page_id(),
            path: derive_page_path(&name),
            name,
            is_static: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Derive a default route from a page name: `"About Us"` becomes `/about-us`.
/// Anything that is not alphanumeric collapses into a single dash.
pub fn derive_page_path(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_derivation() {
        assert_eq!(derive_page_path("About"), "/about");
        assert_eq!(derive_page_path("About Us"), "/about-us");
        assert_eq!(derive_page_path("Pricing & Plans"), "/pricing-plans");
        assert_eq!(derive_page_path("  "), "/");
    }

    #[test]
    fn test_new_page_gets_unique_id_and_path() {
        let a = Page::new("About");
        let b = Page::new("About");
        assert_ne!(a.id, b.id);
        assert_eq!(a.path, "/about");
        assert_eq!(b.path, "/about");
    }
}
