//! Identifier generation.
//!
//! Every entity id is a random v4 uuid behind a short kind prefix so that
//! raw ids stay greppable in logs and network payloads (`page_…`,
//! `block_…`, `var_…`).

use uuid::Uuid;

/// Generate an id with the given kind prefix
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub fn page_id() -> String {
    generate_id("page")
}

pub fn block_id() -> String {
    generate_id("block")
}

pub fn variable_id() -> String {
    generate_id("var")
}

pub fn variable_set_id() -> String {
    generate_id("set")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_carry_prefix() {
        assert!(page_id().starts_with("page_"));
        assert!(block_id().starts_with("block_"));
        assert!(variable_id().starts_with("var_"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = block_id();
        let b = block_id();
        assert_ne!(a, b);
    }
}
