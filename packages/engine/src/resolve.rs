//! # Instance Link Resolution
//!
//! Linked block instances mirror another instance's content through their
//! `ref`/`instance` attributes. Resolution follows `ref` first, then
//! `instance`, until it reaches an instance with neither (the root) or a
//! target missing from the collection.
//!
//! The source data permits arbitrary link graphs, so resolution carries a
//! visited-id set: revisiting an id terminates with a cycle error instead
//! of looping.

use sitekit_model::BlockInstance;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

/// Flat id → instance lookup
pub type BlockArena<'a> = HashMap<&'a str, &'a BlockInstance>;

pub fn build_arena(blocks: &[BlockInstance]) -> BlockArena<'_> {
    blocks
        .iter()
        .map(|b| (b.instance_id.as_str(), b))
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("link cycle detected: resolving {start} revisits {repeated}")]
    CycleDetected { start: String, repeated: String },
}

/// Resolve a block instance to its root source.
///
/// Returns the instance itself when it has no links, the last reachable
/// instance when a link dangles (with a diagnostic), and an error when the
/// link graph cycles. Idempotent: resolving a root returns it unchanged.
pub fn resolve_root<'a>(
    arena: &BlockArena<'a>,
    start: &'a BlockInstance,
) -> Result<&'a BlockInstance, ResolveError> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = start;
    visited.insert(current.instance_id.as_str());

    while let Some(target) = current.link_target() {
        match arena.get(target) {
            None => {
                warn!(
                    instance_id = %current.instance_id,
                    target,
                    "linked instance not found, stopping at last reachable instance"
                );
                return Ok(current);
            }
            Some(next) => {
                if !visited.insert(next.instance_id.as_str()) {
                    return Err(ResolveError::CycleDetected {
                        start: start.instance_id.clone(),
                        repeated: next.instance_id.clone(),
                    });
                }
                current = next;
            }
        }
    }

    Ok(current)
}

/// Resolve a block to its root and cache the result in the instance's
/// `ref` attribute as a one-time shortcut. Returns the root id.
pub fn resolve_and_cache(
    blocks: &mut [BlockInstance],
    block_id: &str,
) -> Result<Option<String>, ResolveError> {
    let root_id = {
        let arena: BlockArena = blocks
            .iter()
            .map(|b| (b.instance_id.as_str(), b))
            .collect();
        let Some(start) = arena.get(block_id) else {
            return Ok(None);
        };
        resolve_root(&arena, start)?.instance_id.clone()
    };

    if let Some(block) = blocks.iter_mut().find(|b| b.instance_id == block_id) {
        if block.ref_id.is_none() && !block.is_root() {
            block.ref_id = Some(root_id.clone());
        }
    }

    Ok(Some(root_id))
}
