//! Built-in sign registry: category classification and identity packs.
//!
//! The game ships a fixed set of default road signs. Five of them are
//! speed-limit signs and form the [`Category::Speed`] partition; every other
//! target name — default or not — classifies as [`Category::General`].
//!
//! Each category also has a synthetic `"Vanilla"` identity pack mapping every
//! default sign of that category to itself with zero rotation. The identity
//! pack doubles as a real selectable option and as the reversion baseline
//! before any user pack has ever been applied.

use signpack_model::{Category, Pack, Rule};
use std::sync::OnceLock;

/// Name of the built-in identity packs.
pub const VANILLA_PACK_NAME: &str = "Vanilla";

/// Default speed-limit sign names.
pub const SPEED_SIGNS: [&str; 5] = [
    "30 Speed Limit",
    "40 Speed Limit",
    "50 Speed Limit",
    "60 Speed Limit",
    "100 Speed Limit",
];

/// Default general sign names.
pub const GENERAL_SIGNS: [&str; 6] = [
    "Stop Sign",
    "No Parking Sign",
    "No Right Turn Sign",
    "No Left Turn Sign",
    "Motorway Sign",
    "Street Name Sign",
];

/// Classify a rule by the sign it targets. Names outside the speed-limit
/// table classify as general.
pub fn classify(target_name: &str) -> Category {
    if SPEED_SIGNS.contains(&target_name) {
        Category::Speed
    } else {
        Category::General
    }
}

/// The built-in zero-rotation, self-mapping pack for a category.
///
/// Built once from the default sign tables and cached for the process
/// lifetime.
pub fn identity_pack(category: Category) -> &'static Pack {
    static SPEED: OnceLock<Pack> = OnceLock::new();
    static GENERAL: OnceLock<Pack> = OnceLock::new();

    match category {
        Category::Speed => SPEED.get_or_init(|| build_identity(&SPEED_SIGNS)),
        Category::General => GENERAL.get_or_init(|| build_identity(&GENERAL_SIGNS)),
    }
}

fn build_identity(names: &[&str]) -> Pack {
    Pack::new(
        VANILLA_PACK_NAME,
        names.iter().map(|name| Rule::identity(*name)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_speed_signs() {
        for name in SPEED_SIGNS {
            assert_eq!(classify(name), Category::Speed);
        }
    }

    #[test]
    fn test_classify_everything_else_as_general() {
        assert_eq!(classify("Stop Sign"), Category::General);
        assert_eq!(classify("Street Name Sign"), Category::General);
        assert_eq!(classify("Some Workshop Sign"), Category::General);
        assert_eq!(classify(""), Category::General);
    }

    #[test]
    fn test_identity_packs_are_self_mapping() {
        for category in [Category::Speed, Category::General] {
            let pack = identity_pack(category);
            assert_eq!(pack.name, VANILLA_PACK_NAME);
            assert!(!pack.rules.is_empty());
            for rule in &pack.rules {
                assert_eq!(rule.target_name, rule.replacement_name);
                assert_eq!(rule.rotation, 0.0);
                assert_eq!(classify(&rule.target_name), category);
            }
        }
    }

    #[test]
    fn test_identity_pack_is_cached() {
        let a = identity_pack(Category::Speed) as *const Pack;
        let b = identity_pack(Category::Speed) as *const Pack;
        assert_eq!(a, b);
    }
}
