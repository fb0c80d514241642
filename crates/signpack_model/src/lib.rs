use serde::{Deserialize, Serialize};
use std::fmt;

pub mod file;

pub use file::{PackFile, PackFileError};

fn zero_rotation() -> f32 {
    0.0
}

fn is_zero_rotation(rotation: &f32) -> bool {
    *rotation == 0.0
}

/// One original-to-substitute sign mapping plus a rotation offset.
///
/// `rotation` (degrees) is added to an item's existing orientation when the
/// rule is applied and subtracted again when it is reverted. Both operations
/// use the same literal value, so a full apply/revert cycle restores the
/// original angle exactly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rule {
    /// The canonical/original asset identifier this rule targets.
    ///
    /// Example: `Stop Sign`
    #[serde(rename = "target")]
    pub target_name: String,

    /// The substitute asset identifier, optionally carrying a workshop
    /// prefix before the first `.`.
    ///
    /// Example: `alpha.StopSignV2`
    #[serde(rename = "replacement")]
    pub replacement_name: String,

    /// Rotation offset in degrees applied on top of the item's angle.
    #[serde(default = "zero_rotation", skip_serializing_if = "is_zero_rotation")]
    pub rotation: f32,
}

impl Rule {
    pub fn new(
        target_name: impl Into<String>,
        replacement_name: impl Into<String>,
        rotation: f32,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            replacement_name: replacement_name.into(),
            rotation,
        }
    }

    /// A rule that maps a sign to itself with no rotation offset.
    /// Identity packs are built entirely from these.
    pub fn identity(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            target_name: name.clone(),
            replacement_name: name,
            rotation: 0.0,
        }
    }

    /// The workshop/namespace prefix of `replacement_name`: the substring
    /// before the first `.`, if any. A leading dot yields no prefix, and an
    /// unprefixed name means the replacement carries no source restriction.
    pub fn workshop_prefix(&self) -> Option<&str> {
        match self.replacement_name.split_once('.') {
            Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
            _ => None,
        }
    }
}

/// A named, ordered collection of replacement rules.
///
/// Pack names are the user-facing selection handle and are expected to be
/// unique within a category list; untrusted input is not validated for
/// duplicates — every lookup is first-match-wins.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pack {
    pub name: String,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Pack {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// First rule whose `target_name` matches, in pack order.
    pub fn rule_for_target(&self, target_name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.target_name == target_name)
    }

    /// First rule whose `replacement_name` matches, in pack order.
    pub fn rule_for_replacement(&self, replacement_name: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.replacement_name == replacement_name)
    }
}

/// Partition of rules by the sign they target: the handful of speed-limit
/// signs form their own category, everything else is general signage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Speed,
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Speed => f.write_str("speed"),
            Category::General => f.write_str("general"),
        }
    }
}
