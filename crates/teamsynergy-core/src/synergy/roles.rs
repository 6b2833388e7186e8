// Tactical role classification from base attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::team::member::BaseStats;

// ---------------------------------------------------------------------------
// Tactical role
// ---------------------------------------------------------------------------

/// Coarse tactical role used for role-balance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sweeper,
    Wallbreaker,
    Tank,
    Support,
    Balanced,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Sweeper,
        Role::Wallbreaker,
        Role::Tank,
        Role::Support,
        Role::Balanced,
    ];

    /// Classify a member's stats into a role.
    ///
    /// Rules are evaluated in order and the first match wins:
    /// 1. speed > 100 and offense > 120 -> Sweeper
    /// 2. offense > 140 -> Wallbreaker
    /// 3. bulk > 140 -> Tank
    /// 4. hp > 100 -> Support
    /// 5. otherwise Balanced
    pub fn classify(stats: &BaseStats) -> Self {
        if stats.speed > 100 && stats.offense() > 120 {
            Role::Sweeper
        } else if stats.offense() > 140 {
            Role::Wallbreaker
        } else if stats.bulk() > 140 {
            Role::Tank
        } else if stats.hp > 100 {
            Role::Support
        } else {
            Role::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Sweeper => "sweeper",
            Role::Wallbreaker => "wallbreaker",
            Role::Tank => "tank",
            Role::Support => "support",
            Role::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Stat category (diversity signal)
// ---------------------------------------------------------------------------

/// Secondary five-way classification used only by the diversity term of
/// the reference-member scorer. Distinct from [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Sweeper,
    Tank,
    Attacker,
    Wall,
    Balanced,
}

impl StatCategory {
    pub fn of(stats: &BaseStats) -> Self {
        let offense = stats.offense() as i64;
        let bulk = stats.bulk() as i64;
        if stats.speed > 100 {
            StatCategory::Sweeper
        } else if bulk - offense > 50 {
            StatCategory::Tank
        } else if offense - bulk > 50 {
            StatCategory::Attacker
        } else if stats.hp > 100 {
            StatCategory::Wall
        } else {
            StatCategory::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatCategory::Sweeper => "sweeper",
            StatCategory::Tank => "tank",
            StatCategory::Attacker => "attacker",
            StatCategory::Wall => "wall",
            StatCategory::Balanced => "balanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> BaseStats {
        BaseStats::new(hp, atk, def, spa, spd, spe)
    }

    #[test]
    fn sweeper_needs_speed_and_offense() {
        assert_eq!(Role::classify(&stats(70, 80, 60, 50, 60, 110)), Role::Sweeper);
        // Fast but offense exactly 120 is not a sweeper.
        assert_eq!(Role::classify(&stats(70, 60, 60, 60, 60, 110)), Role::Balanced);
        // Speed exactly 100 falls through to wallbreaker.
        assert_eq!(
            Role::classify(&stats(70, 100, 60, 50, 60, 100)),
            Role::Wallbreaker
        );
    }

    #[test]
    fn evaluation_order_is_fixed() {
        // Offense and bulk both exceed 140: wallbreaker wins over tank.
        assert_eq!(
            Role::classify(&stats(120, 80, 80, 70, 80, 40)),
            Role::Wallbreaker
        );
        // Bulk > 140 and hp > 100: tank wins over support.
        assert_eq!(Role::classify(&stats(120, 50, 80, 50, 80, 40)), Role::Tank);
        assert_eq!(Role::classify(&stats(120, 50, 60, 50, 60, 40)), Role::Support);
    }

    #[test]
    fn fallthrough_is_balanced() {
        assert_eq!(Role::classify(&BaseStats::default()), Role::Balanced);
        assert_eq!(Role::classify(&stats(100, 70, 70, 70, 70, 100)), Role::Balanced);
    }

    #[test]
    fn stat_category_thresholds() {
        assert_eq!(StatCategory::of(&stats(50, 50, 50, 50, 50, 101)), StatCategory::Sweeper);
        assert_eq!(StatCategory::of(&stats(50, 40, 90, 40, 60, 30)), StatCategory::Tank);
        assert_eq!(StatCategory::of(&stats(50, 100, 40, 60, 40, 30)), StatCategory::Attacker);
        assert_eq!(StatCategory::of(&stats(120, 60, 60, 60, 60, 30)), StatCategory::Wall);
        assert_eq!(StatCategory::of(&stats(80, 60, 60, 60, 60, 30)), StatCategory::Balanced);
    }
}
