//! The replacement engine: one synchronous pass over the world per apply.
//!
//! # Pass algorithm
//!
//! 1. Resolve which categories are dirty: a selection whose pack name equals
//!    the currently applied pack name is skipped entirely (idempotence).
//! 2. Visit every item from the [`ItemSource`]. Per item, capture the
//!    rotation once; per slot, run the fixed pipeline
//!    `revert(General) -> replace(General) -> revert(Speed) -> replace(Speed)`
//!    for the dirty categories, composing angle deltas against the captured
//!    base, and commit the composed rotation at most once per slot.
//! 3. After the full pass, commit each dirty category's selection into the
//!    [`SelectionState`] and upsert its rules into the active-rule map.
//!
//! Revert scans the category's *entire* catalog pack list for the first rule
//! anywhere whose replacement name matches the slot — not just the
//! previously applied pack. An item can therefore be reverted by a rule from
//! a pack that was never applied, as long as it still bears that pack's
//! replacement name. This breadth matches the long-standing behavior of the
//! shipped implementation and is kept as-is.
//!
//! Asset lookup misses are local to one slot: the slot keeps its pre-failure
//! value, the name is recorded in the [`ApplyReport`], and the pass carries
//! on. Nothing in here returns an error.

use crate::catalog::Catalog;
use crate::state::SelectionState;
use crate::world::{ItemSource, NameResolver, PlacedItem};
use signpack_model::{Category, Pack, Rule};
use std::time::{Duration, Instant};

/// Summary returned after an apply pass completes.
///
/// The engine never fails; this report is how lookup misses and no-op
/// invocations are surfaced to callers.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Slots pointed at a new replacement asset.
    pub replaced: usize,
    /// Slots restored to an original asset during the revert phase.
    pub reverted: usize,
    /// Asset names the resolver could not find, in encounter order.
    pub missing_assets: Vec<String>,
    /// Categories whose applied pack changed during this invocation.
    pub committed: Vec<Category>,
    /// Wall-clock time for the pass.
    pub elapsed: Duration,
}

impl ApplyReport {
    /// True when the invocation changed nothing (no selection, or every
    /// selection already applied).
    pub fn is_noop(&self) -> bool {
        self.committed.is_empty()
    }
}

/// Owns the pack catalog and the live selection state.
///
/// Single-threaded and non-reentrant by design: one full synchronous pass
/// per [`apply`](Self::apply) call, invoked from a single control thread.
/// The catalog is fixed at construction; rebuild the engine to pick up a new
/// pack configuration.
#[derive(Debug)]
pub struct ReplacementEngine {
    catalog: Catalog,
    state: SelectionState,
}

impl ReplacementEngine {
    /// Create an engine over a built catalog, with both categories initially
    /// considered vanilla.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: SelectionState::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The pack currently in effect for a category.
    pub fn applied_pack(&self, category: Category) -> &Pack {
        self.state.applied_pack(category)
    }

    /// The rule presently governing an original sign name.
    pub fn active_rule(&self, original_name: &str) -> Option<&Rule> {
        self.state.active_rule(original_name)
    }

    /// Apply selections given by pack name, looked up in the catalog.
    ///
    /// This is the settings-restore and UI path: `None` skips the category,
    /// and a name missing from the catalog (a stale persisted selection)
    /// degrades to no selection with a warning.
    pub fn apply_by_name(
        &mut self,
        items: &mut dyn ItemSource,
        resolver: &dyn NameResolver,
        sign_selection: Option<&str>,
        speed_selection: Option<&str>,
    ) -> ApplyReport {
        let sign_pack = sign_selection.and_then(|name| self.lookup(Category::General, name));
        let speed_pack = speed_selection.and_then(|name| self.lookup(Category::Speed, name));
        self.apply(items, resolver, sign_pack.as_ref(), speed_pack.as_ref())
    }

    fn lookup(&self, category: Category, name: &str) -> Option<Pack> {
        match self.catalog.find(category, name) {
            Some(pack) => Some(pack.clone()),
            None => {
                tracing::warn!(
                    "pack '{}' not found in {} catalog, ignoring selection",
                    name,
                    category
                );
                None
            }
        }
    }

    /// Run one full pass over the working set, applying the given selections.
    ///
    /// A `None` selection leaves that category's applied pack and mapping
    /// untouched. Selecting the identity pack is the documented way to fully
    /// revert a category; a pack with zero rules is also legal and reverts
    /// everything while replacing nothing.
    pub fn apply(
        &mut self,
        items: &mut dyn ItemSource,
        resolver: &dyn NameResolver,
        sign_selection: Option<&Pack>,
        speed_selection: Option<&Pack>,
    ) -> ApplyReport {
        let start = Instant::now();
        let mut report = ApplyReport::default();

        if sign_selection.is_none() && speed_selection.is_none() {
            tracing::debug!("no selection, nothing to do");
            report.elapsed = start.elapsed();
            return report;
        }

        let sign_target = self.dirty_selection(Category::General, sign_selection);
        let speed_target = self.dirty_selection(Category::Speed, speed_selection);

        if sign_target.is_none() && speed_target.is_none() {
            report.elapsed = start.elapsed();
            return report;
        }

        let catalog = &self.catalog;
        let mut replaced = 0usize;
        let mut reverted = 0usize;
        let mut missing: Vec<String> = Vec::new();

        items.visit_items(&mut |item| {
            // Captured once per item: every slot composes against this
            // base, never against an angle a sibling slot already wrote.
            let base = item.rotation();

            for slot in 0..item.slot_count() {
                let mut angle = base;
                let mut touched = false;

                // Fixed category order, general before speed.
                for (category, target) in [
                    (Category::General, sign_target),
                    (Category::Speed, speed_target),
                ] {
                    let Some(target) = target else { continue };

                    match revert_slot(catalog.packs(category), resolver, item, slot, &mut angle) {
                        SlotOutcome::Applied => {
                            reverted += 1;
                            touched = true;
                        }
                        SlotOutcome::Missing(name) => missing.push(name),
                        SlotOutcome::NoMatch => {}
                    }

                    match replace_slot(target, resolver, item, slot, &mut angle) {
                        SlotOutcome::Applied => {
                            replaced += 1;
                            touched = true;
                        }
                        SlotOutcome::Missing(name) => missing.push(name),
                        SlotOutcome::NoMatch => {}
                    }
                }

                if touched {
                    item.set_rotation(angle);
                }
            }
        });

        report.replaced = replaced;
        report.reverted = reverted;
        report.missing_assets = missing;

        // The pass ran to completion; commit the dirty categories.
        if let Some(pack) = sign_target {
            tracing::info!("applied sign pack '{}'", pack.name);
            self.state.commit(Category::General, pack);
            report.committed.push(Category::General);
        }
        if let Some(pack) = speed_target {
            tracing::info!("applied speed pack '{}'", pack.name);
            self.state.commit(Category::Speed, pack);
            report.committed.push(Category::Speed);
        }

        report.elapsed = start.elapsed();
        report
    }

    /// A selection is dirty only when its name differs from the applied
    /// pack's; re-selecting the applied pack skips all work for the
    /// category.
    fn dirty_selection<'p>(
        &self,
        category: Category,
        selection: Option<&'p Pack>,
    ) -> Option<&'p Pack> {
        let pack = selection?;
        if pack.name == self.state.applied_pack(category).name {
            tracing::debug!("pack '{}' already applied for {}", pack.name, category);
            None
        } else {
            Some(pack)
        }
    }
}

enum SlotOutcome {
    /// No rule matched the slot's current asset.
    NoMatch,
    /// The slot was updated and the angle delta composed.
    Applied,
    /// A rule matched but the asset it points at is not loaded.
    Missing(String),
}

/// Restore a slot to its original asset, if any rule across the category's
/// pack list claims its current asset as a replacement.
///
/// First match across the whole list wins; later packs carrying the same
/// replacement name are unreachable by construction.
fn revert_slot(
    packs: &[Pack],
    resolver: &dyn NameResolver,
    item: &mut dyn PlacedItem,
    slot: usize,
    angle: &mut f32,
) -> SlotOutcome {
    let Some(current) = item.slot_asset(slot).map(str::to_owned) else {
        return SlotOutcome::NoMatch;
    };

    for pack in packs {
        if let Some(rule) = pack.rule_for_replacement(&current) {
            return match resolver.resolve(&rule.target_name) {
                Some(original) => {
                    item.set_slot_asset(slot, &original);
                    *angle -= rule.rotation;
                    SlotOutcome::Applied
                }
                None => {
                    tracing::warn!("couldn't revert {} to vanilla: {} is not loaded", current, rule.target_name);
                    SlotOutcome::Missing(rule.target_name.clone())
                }
            };
        }
    }

    SlotOutcome::NoMatch
}

/// Swap a slot to the target pack's replacement for its current asset.
/// Runs after the revert attempt, so "current" is the original identifier
/// whenever a revert fired.
fn replace_slot(
    target: &Pack,
    resolver: &dyn NameResolver,
    item: &mut dyn PlacedItem,
    slot: usize,
    angle: &mut f32,
) -> SlotOutcome {
    let Some(current) = item.slot_asset(slot).map(str::to_owned) else {
        return SlotOutcome::NoMatch;
    };

    if let Some(rule) = target.rule_for_target(&current) {
        return match resolver.resolve(&rule.replacement_name) {
            Some(replacement) => {
                item.set_slot_asset(slot, &replacement);
                *angle += rule.rotation;
                SlotOutcome::Applied
            }
            None => {
                tracing::warn!("couldn't find replacement {} for {}", rule.replacement_name, current);
                SlotOutcome::Missing(rule.replacement_name.clone())
            }
        };
    }

    SlotOutcome::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VANILLA_PACK_NAME;
    use crate::world::{AssetIndex, SnapshotItem, SnapshotWorld};
    use signpack_model::Rule;

    fn world_with(items: Vec<SnapshotItem>, extra_assets: &[&str]) -> SnapshotWorld {
        let mut assets = AssetIndex::default();
        for name in crate::registry::SPEED_SIGNS
            .iter()
            .chain(&crate::registry::GENERAL_SIGNS)
        {
            assets.insert(*name);
        }
        for name in extra_assets {
            assets.insert(*name);
        }
        SnapshotWorld { items, assets }
    }

    fn item(primary: &str, rotation: f32) -> SnapshotItem {
        SnapshotItem {
            primary: Some(primary.to_string()),
            variant: None,
            rotation,
        }
    }

    fn alpha_pack() -> Pack {
        Pack::new("Alpha", vec![Rule::new("Stop Sign", "alpha.StopSignV2", 15.0)])
    }

    fn alpha_engine() -> ReplacementEngine {
        ReplacementEngine::new(Catalog::build(&[alpha_pack()], &|_: &str| true))
    }

    #[test]
    fn test_no_selection_is_a_noop() {
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &[]);
        let mut engine = alpha_engine();

        let report = engine.apply(&mut world.items, &world.assets, None, None);

        assert!(report.is_noop());
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 90.0);
    }

    #[test]
    fn test_alpha_scenario() {
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &["alpha.StopSignV2"]);
        let mut engine = alpha_engine();

        let report = engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);

        assert_eq!(world.items[0].primary.as_deref(), Some("alpha.StopSignV2"));
        assert_eq!(world.items[0].rotation, 105.0);
        assert_eq!(engine.applied_pack(Category::General).name, "Alpha");
        assert_eq!(
            engine.active_rule("Stop Sign").unwrap().replacement_name,
            "alpha.StopSignV2"
        );
        assert_eq!(report.committed, [Category::General]);
        assert!(report.missing_assets.is_empty());

        // Reverting to vanilla restores asset and angle exactly.
        let report = engine.apply_by_name(
            &mut world.items,
            &world.assets,
            Some(VANILLA_PACK_NAME),
            None,
        );
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 90.0);
        assert_eq!(engine.applied_pack(Category::General).name, VANILLA_PACK_NAME);
        assert!(!report.is_noop());
    }

    #[test]
    fn test_second_apply_is_idempotent() {
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &["alpha.StopSignV2"]);
        let mut engine = alpha_engine();

        engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);
        let snapshot = world.items.clone();

        let report = engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);

        assert!(report.is_noop());
        assert_eq!(report.replaced, 0);
        assert_eq!(report.reverted, 0);
        assert_eq!(world.items, snapshot);
    }

    #[test]
    fn test_rotation_round_trip_is_exact() {
        // A delta without an exact binary representation still round-trips,
        // because apply and revert use the same literal value.
        let delta = 13.7f32;
        let start = 42.42f32;
        let pack = Pack::new("Twist", vec![Rule::new("Stop Sign", "t.Stop", delta)]);
        let mut world = world_with(vec![item("Stop Sign", start)], &["t.Stop"]);
        let mut engine = ReplacementEngine::new(Catalog::build(&[pack], &|_: &str| true));

        engine.apply_by_name(&mut world.items, &world.assets, Some("Twist"), None);
        assert_eq!(world.items[0].rotation, start + delta);

        engine.apply_by_name(&mut world.items, &world.assets, Some(VANILLA_PACK_NAME), None);
        assert_eq!(world.items[0].rotation, start);
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
    }

    #[test]
    fn test_revert_uses_first_matching_pack_in_catalog_order() {
        // Two packs claim the same replacement name; the earliest-listed
        // pack's rule must win the revert lookup, observable through its
        // rotation delta.
        let first = Pack::new("First", vec![Rule::new("Stop Sign", "x.Shared", 10.0)]);
        let second = Pack::new("Second", vec![Rule::new("No Parking Sign", "x.Shared", 20.0)]);
        let catalog = Catalog::build(&[first, second], &|_: &str| true);

        // The item already bears the shared replacement name.
        let mut world = world_with(vec![item("x.Shared", 50.0)], &["x.Shared"]);
        let mut engine = ReplacementEngine::new(catalog);

        engine.apply_by_name(&mut world.items, &world.assets, Some("Second"), None);

        // Reverted via First's rule (delta 10), then Second has no rule
        // targeting "Stop Sign", so the slot stays reverted.
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 40.0);
    }

    #[test]
    fn test_category_isolation() {
        let sign_pack = Pack::new("Signs", vec![Rule::new("Stop Sign", "s.Stop", 5.0)]);
        let speed_pack = Pack::new("Speeds", vec![Rule::new("30 Speed Limit", "v.S30", 0.0)]);
        let catalog = Catalog::build(&[sign_pack, speed_pack], &|_: &str| true);

        let mut world = world_with(
            vec![item("Stop Sign", 90.0), item("30 Speed Limit", 0.0)],
            &["s.Stop", "v.S30"],
        );
        let mut engine = ReplacementEngine::new(catalog);

        let report = engine.apply_by_name(&mut world.items, &world.assets, None, Some("Speeds"));

        // Only the speed item changed.
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 90.0);
        assert_eq!(world.items[1].primary.as_deref(), Some("v.S30"));

        assert_eq!(report.committed, [Category::Speed]);
        assert_eq!(engine.applied_pack(Category::General).name, VANILLA_PACK_NAME);
        assert_eq!(engine.applied_pack(Category::Speed).name, "Speeds");
    }

    #[test]
    fn test_empty_pack_reverts_and_replaces_nothing() {
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &["alpha.StopSignV2"]);
        let mut engine = alpha_engine();
        engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);

        // An empty pack is a legal selection: turn the category off.
        let off = Pack::new("Off", Vec::new());
        let report = engine.apply(&mut world.items, &world.assets, Some(&off), None);

        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 90.0);
        assert_eq!(report.replaced, 0);
        assert_eq!(engine.applied_pack(Category::General).name, "Off");
        // The active map keeps Alpha's entry; an empty pack upserts nothing.
        assert_eq!(
            engine.active_rule("Stop Sign").unwrap().replacement_name,
            "alpha.StopSignV2"
        );
    }

    #[test]
    fn test_missing_replacement_leaves_slot_reverted() {
        // Alpha's replacement asset is not loaded.
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &[]);
        let mut engine = alpha_engine();

        let report = engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);

        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
        assert_eq!(world.items[0].rotation, 90.0);
        assert_eq!(report.missing_assets, ["alpha.StopSignV2"]);
        // The pass still completes and commits the selection.
        assert_eq!(engine.applied_pack(Category::General).name, "Alpha");
    }

    #[test]
    fn test_missing_original_leaves_slot_replaced() {
        // The item bears a replacement whose original is not loaded; revert
        // reports the miss and the slot keeps its current asset.
        let pack = Pack::new("Ghost", vec![Rule::new("Ghost Sign", "g.Ghost", 30.0)]);
        let catalog = Catalog::build(&[pack], &|_: &str| true);

        let mut world = world_with(vec![item("g.Ghost", 10.0)], &["g.Ghost"]);
        let mut engine = ReplacementEngine::new(catalog);

        let off = Pack::new("Off", Vec::new());
        let report = engine.apply(&mut world.items, &world.assets, Some(&off), None);

        assert_eq!(world.items[0].primary.as_deref(), Some("g.Ghost"));
        assert_eq!(world.items[0].rotation, 10.0);
        assert_eq!(report.missing_assets, ["Ghost Sign"]);
    }

    #[test]
    fn test_both_slots_compose_from_the_captured_base() {
        // Two slots on one item both match; each must compose against the
        // rotation captured before either slot ran.
        let mut world = world_with(
            vec![SnapshotItem {
                primary: Some("Stop Sign".to_string()),
                variant: Some("Stop Sign".to_string()),
                rotation: 90.0,
            }],
            &["alpha.StopSignV2"],
        );
        let mut engine = alpha_engine();

        engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);

        assert_eq!(world.items[0].primary.as_deref(), Some("alpha.StopSignV2"));
        assert_eq!(world.items[0].variant.as_deref(), Some("alpha.StopSignV2"));
        // 90 + 15, not 90 + 15 + 15.
        assert_eq!(world.items[0].rotation, 105.0);
    }

    #[test]
    fn test_stale_selection_name_is_ignored() {
        let mut world = world_with(vec![item("Stop Sign", 90.0)], &["alpha.StopSignV2"]);
        let mut engine = alpha_engine();

        let report =
            engine.apply_by_name(&mut world.items, &world.assets, Some("Deleted Pack"), None);

        assert!(report.is_noop());
        assert_eq!(engine.applied_pack(Category::General).name, VANILLA_PACK_NAME);
        assert_eq!(world.items[0].primary.as_deref(), Some("Stop Sign"));
    }

    #[test]
    fn test_superseding_pack_reverts_before_replacing() {
        let alpha = alpha_pack();
        let beta = Pack::new("Beta", vec![Rule::new("Stop Sign", "beta.Stop", 40.0)]);
        let catalog = Catalog::build(&[alpha, beta], &|_: &str| true);

        let mut world = world_with(
            vec![item("Stop Sign", 90.0)],
            &["alpha.StopSignV2", "beta.Stop"],
        );
        let mut engine = ReplacementEngine::new(catalog);

        engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);
        assert_eq!(world.items[0].rotation, 105.0);

        engine.apply_by_name(&mut world.items, &world.assets, Some("Beta"), None);

        // Alpha's delta is removed before Beta's is added.
        assert_eq!(world.items[0].primary.as_deref(), Some("beta.Stop"));
        assert_eq!(world.items[0].rotation, 130.0);
        assert_eq!(engine.applied_pack(Category::General).name, "Beta");
    }
}
