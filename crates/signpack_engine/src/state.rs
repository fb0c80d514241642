//! Live selection state: which pack is in effect per category, and which
//! rule currently governs each original sign name.
//!
//! The state has single-writer discipline: only a completed apply pass in
//! [`ReplacementEngine`](crate::engine::ReplacementEngine) commits it, and a
//! commit is all-or-nothing per category. Both categories start pointing at
//! their identity pack, with the active-rule map pre-populated from the
//! identity rules, so [`active_rule`](SelectionState::active_rule) never has
//! to special-case the "nothing ever applied" state.

use crate::registry;
use signpack_model::{Category, Pack, Rule};
use std::collections::HashMap;

/// Per-category applied pack plus the merged original-name -> rule map.
#[derive(Debug, Clone)]
pub struct SelectionState {
    applied_speed: Pack,
    applied_general: Pack,
    active: HashMap<String, Rule>,
}

impl SelectionState {
    pub(crate) fn new() -> Self {
        let applied_speed = registry::identity_pack(Category::Speed).clone();
        let applied_general = registry::identity_pack(Category::General).clone();

        let mut active = HashMap::new();
        for rule in applied_speed.rules.iter().chain(&applied_general.rules) {
            active.insert(rule.target_name.clone(), rule.clone());
        }

        Self {
            applied_speed,
            applied_general,
            active,
        }
    }

    /// The pack currently considered in effect for a category.
    pub fn applied_pack(&self, category: Category) -> &Pack {
        match category {
            Category::Speed => &self.applied_speed,
            Category::General => &self.applied_general,
        }
    }

    /// The rule presently governing an original sign name, across whichever
    /// categories have been committed so far.
    pub fn active_rule(&self, original_name: &str) -> Option<&Rule> {
        self.active.get(original_name)
    }

    /// Commit a category's new applied pack after a completed pass.
    ///
    /// Rules of the new pack are upserted into the active map; names the new
    /// pack does not mention keep whatever mapping they had (merge, not
    /// replace).
    pub(crate) fn commit(&mut self, category: Category, pack: &Pack) {
        for rule in &pack.rules {
            self.active.insert(rule.target_name.clone(), rule.clone());
        }
        match category {
            Category::Speed => self.applied_speed = pack.clone(),
            Category::General => self.applied_general = pack.clone(),
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
