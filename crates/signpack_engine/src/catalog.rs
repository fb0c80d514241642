//! Pack catalog construction.
//!
//! The catalog is the browsable, per-category view of all loaded packs.
//! Building it splits every raw pack into a speed-sign subset and a
//! general-sign subset, drops rules whose replacement references an
//! unavailable workshop prefix, and discards derived packs that end up
//! empty. Each category list starts with its identity pack; raw packs
//! follow in input order. The ordering is observable: the engine's revert
//! lookup scans a category's entire pack list and the first matching rule
//! wins, so a stable catalog order is part of the contract.
//!
//! The catalog must be fully built before any apply pass reads it; callers
//! provide that ordering (a single initialization step), not this module.

use crate::registry;
use crate::world::SubscriptionCheck;
use signpack_model::{Category, Pack};

/// Per-category ordered pack lists, identity pack first.
#[derive(Debug, Clone)]
pub struct Catalog {
    speed: Vec<Pack>,
    general: Vec<Pack>,
}

impl Catalog {
    /// Build the catalog from raw packs loaded from configuration.
    ///
    /// `subscriptions` is consulted once per rule that carries a workshop
    /// prefix; rules failing the check are dropped silently — this models
    /// "referenced asset pack is not installed" and is not an error.
    pub fn build(raw_packs: &[Pack], subscriptions: &dyn SubscriptionCheck) -> Self {
        let mut speed = vec![registry::identity_pack(Category::Speed).clone()];
        let mut general = vec![registry::identity_pack(Category::General).clone()];

        if raw_packs.is_empty() {
            tracing::info!("no sign packs configured, catalog is vanilla only");
        }

        for raw in raw_packs {
            let mut speed_rules = Vec::new();
            let mut general_rules = Vec::new();

            for rule in &raw.rules {
                if let Some(prefix) = rule.workshop_prefix() {
                    if !subscriptions.is_available(prefix) {
                        tracing::warn!(
                            "workshop subscription {} not found, dropping rule {} -> {} from pack {}",
                            prefix,
                            rule.target_name,
                            rule.replacement_name,
                            raw.name
                        );
                        continue;
                    }
                }

                match registry::classify(&rule.target_name) {
                    Category::Speed => speed_rules.push(rule.clone()),
                    Category::General => general_rules.push(rule.clone()),
                }
            }

            // A pack that ends up empty in a category is omitted from that
            // category's list; it may still appear in the other one.
            if !speed_rules.is_empty() {
                speed.push(Pack::new(raw.name.clone(), speed_rules));
            }
            if !general_rules.is_empty() {
                general.push(Pack::new(raw.name.clone(), general_rules));
            }
        }

        Self { speed, general }
    }

    /// A catalog containing only the identity packs.
    pub fn vanilla() -> Self {
        Self::build(&[], &|_: &str| true)
    }

    /// All packs of a category, identity pack first, in catalog order.
    pub fn packs(&self, category: Category) -> &[Pack] {
        match category {
            Category::Speed => &self.speed,
            Category::General => &self.general,
        }
    }

    /// First pack of a category with the given name.
    pub fn find(&self, category: Category, name: &str) -> Option<&Pack> {
        self.packs(category).iter().find(|p| p.name == name)
    }

    /// The identity pack of a category.
    pub fn identity(&self, category: Category) -> &Pack {
        &self.packs(category)[0]
    }
}
