//! Closed enum families shared across the pipeline.
//!
//! Every family is a tagged union with exhaustive matching at its use sites;
//! no stringly-typed or integer-coded variants escape this module.

use serde::{Deserialize, Serialize};

/// Team color of the armor plates being hunted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyColor {
    #[default]
    Red,
    Blue,
}

impl EnemyColor {
    /// The opposite team color.
    pub fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

/// Armor plate footprint class, decided from blob area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSize {
    Small,
    Big,
    #[default]
    Unknown,
}

/// Robot class painted on the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    Hero,
    Sentry,
    Infantry3,
    Infantry4,
    Infantry5,
    #[default]
    Unknown,
}

impl TargetId {
    /// Engagement priority for this class (1 = highest). `Unknown` has none.
    pub fn priority(self) -> u8 {
        match self {
            Self::Hero => 1,
            Self::Sentry => 2,
            Self::Infantry3 => 3,
            Self::Infantry4 => 4,
            Self::Infantry5 => 5,
            Self::Unknown => 0,
        }
    }
}

/// Which robot classes the fire gate is allowed to engage.
///
/// `Unknown` targets are never engaged regardless of the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidTargetMask {
    pub hero: bool,
    pub sentry: bool,
    pub infantry_3: bool,
    pub infantry_4: bool,
    pub infantry_5: bool,
}

impl ValidTargetMask {
    /// Mask allowing every known class.
    pub const ALL: Self = Self {
        hero: true,
        sentry: true,
        infantry_3: true,
        infantry_4: true,
        infantry_5: true,
    };

    /// Mask rejecting every class.
    pub const NONE: Self = Self {
        hero: false,
        sentry: false,
        infantry_3: false,
        infantry_4: false,
        infantry_5: false,
    };

    /// Whether the given class may be engaged.
    pub fn allows(self, id: TargetId) -> bool {
        match id {
            TargetId::Hero => self.hero,
            TargetId::Sentry => self.sentry,
            TargetId::Infantry3 => self.infantry_3,
            TargetId::Infantry4 => self.infantry_4,
            TargetId::Infantry5 => self.infantry_5,
            TargetId::Unknown => false,
        }
    }
}

impl Default for ValidTargetMask {
    fn default() -> Self {
        Self::ALL
    }
}
