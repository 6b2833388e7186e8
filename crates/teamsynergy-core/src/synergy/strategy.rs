// Named strategy profiles: stat weighting, role targets, synergy weights
// and advisory text.

use crate::error::{Result, TeamError};
use crate::synergy::roles::Role;
use crate::team::member::{BaseStats, TypeTag};

/// Types that benefit from (or set) weather conditions.
pub const WEATHER_TYPES: &[TypeTag] = &[
    TypeTag::Fire,
    TypeTag::Water,
    TypeTag::Grass,
    TypeTag::Rock,
    TypeTag::Ground,
    TypeTag::Steel,
    TypeTag::Ice,
];

// ---------------------------------------------------------------------------
// Strategy kind
// ---------------------------------------------------------------------------

/// Which play style a profile encodes. `SingleType` carries the chosen type;
/// `None` marks the uninstantiated catalog template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Balanced,
    SingleType { chosen: Option<TypeTag> },
    Offensive,
    Defensive,
    SpeedControl,
    Weather,
    DualCore,
    Attrition,
}

/// How the offensive-synergy term rewards a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Offense,
    Defense,
    Neutral,
}

impl StrategyKind {
    pub const KEYS: [&'static str; 8] = [
        "balanced",
        "single-type",
        "offensive",
        "defensive",
        "speed-control",
        "weather",
        "dual-core",
        "attrition",
    ];

    /// Stable kebab-case key used for lookup and persistence.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::Balanced => "balanced",
            StrategyKind::SingleType { .. } => "single-type",
            StrategyKind::Offensive => "offensive",
            StrategyKind::Defensive => "defensive",
            StrategyKind::SpeedControl => "speed-control",
            StrategyKind::Weather => "weather",
            StrategyKind::DualCore => "dual-core",
            StrategyKind::Attrition => "attrition",
        }
    }

    /// Parse a key. "single-type" parses to the template (no chosen type).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "balanced" => Some(StrategyKind::Balanced),
            "single-type" | "mono-type" => Some(StrategyKind::SingleType { chosen: None }),
            "offensive" => Some(StrategyKind::Offensive),
            "defensive" => Some(StrategyKind::Defensive),
            "speed-control" => Some(StrategyKind::SpeedControl),
            "weather" => Some(StrategyKind::Weather),
            "dual-core" => Some(StrategyKind::DualCore),
            "attrition" => Some(StrategyKind::Attrition),
            _ => None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            StrategyKind::Offensive | StrategyKind::SpeedControl => Orientation::Offense,
            StrategyKind::Defensive | StrategyKind::Attrition => Orientation::Defense,
            StrategyKind::Balanced
            | StrategyKind::SingleType { .. }
            | StrategyKind::Weather
            | StrategyKind::DualCore => Orientation::Neutral,
        }
    }

    /// The chosen type of an instantiated single-type strategy.
    pub fn chosen_type(&self) -> Option<TypeTag> {
        match self {
            StrategyKind::SingleType { chosen } => *chosen,
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile components
// ---------------------------------------------------------------------------

/// Per-attribute multipliers applied to a candidate's base stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatPriorities {
    pub hp: f64,
    pub attack: f64,
    pub defense: f64,
    pub sp_attack: f64,
    pub sp_defense: f64,
    pub speed: f64,
}

impl StatPriorities {
    pub fn uniform(value: f64) -> Self {
        StatPriorities {
            hp: value,
            attack: value,
            defense: value,
            sp_attack: value,
            sp_defense: value,
            speed: value,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }

    /// Priority-weighted mean of the stats. Zero when all priorities are zero.
    pub fn weighted_mean(&self, stats: &BaseStats) -> f64 {
        let weights = self.as_array();
        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let dot: f64 = weights
            .iter()
            .zip(stats.as_array())
            .map(|(w, v)| w * f64::from(v))
            .sum();
        dot / total_weight
    }
}

/// Desired number of roster members per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTargets {
    pub sweeper: usize,
    pub wallbreaker: usize,
    pub tank: usize,
    pub support: usize,
    pub balanced: usize,
}

impl RoleTargets {
    pub fn target(&self, role: Role) -> usize {
        match role {
            Role::Sweeper => self.sweeper,
            Role::Wallbreaker => self.wallbreaker,
            Role::Tank => self.tank,
            Role::Support => self.support,
            Role::Balanced => self.balanced,
        }
    }
}

/// Multipliers for each synergy term. Informally sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynergyWeights {
    pub type_balance: f64,
    pub stat_complement: f64,
    pub move_coverage: f64,
    pub defensive_coverage: f64,
    pub offensive_synergy: f64,
}

// ---------------------------------------------------------------------------
// Strategy profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyProfile {
    pub kind: StrategyKind,
    pub name: String,
    pub description: String,
    pub stat_priorities: StatPriorities,
    pub role_targets: RoleTargets,
    pub synergy: SynergyWeights,
    /// When non-empty, only members carrying one of these types qualify.
    pub allowed_types: Vec<TypeTag>,
    /// Members carrying any of these types are never recommended.
    pub denied_types: Vec<TypeTag>,
    pub warnings: Vec<String>,
    pub tips: Vec<String>,
}

impl StrategyProfile {
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    /// Instantiate a single-type template for `chosen`. Other kinds are
    /// returned unchanged.
    pub fn with_chosen_type(mut self, chosen: TypeTag) -> Self {
        if let StrategyKind::SingleType { .. } = self.kind {
            self.kind = StrategyKind::SingleType {
                chosen: Some(chosen),
            };
            self.allowed_types = vec![chosen];
            self.name = format!("Mono-{}", chosen.label());
            self.description = format!(
                "Every member carries the {} type; partners are chosen to patch its weaknesses.",
                chosen.label()
            );
        }
        self
    }

    /// Copy of this profile that excludes members carrying any of `types`.
    pub fn with_denied_types(mut self, types: impl IntoIterator<Item = TypeTag>) -> Self {
        for tag in types {
            if !self.denied_types.contains(&tag) {
                self.denied_types.push(tag);
            }
        }
        self
    }

    /// Whether a member with these types passes the allow/deny lists.
    pub fn admits(&self, types: &[TypeTag]) -> bool {
        if types.iter().any(|t| self.denied_types.contains(t)) {
            return false;
        }
        self.allowed_types.is_empty() || types.iter().any(|t| self.allowed_types.contains(t))
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Static registry of the built-in profiles.
pub struct StrategyCatalog;

impl StrategyCatalog {
    /// All registered profiles in presentation order. The single-type entry
    /// is the uninstantiated template.
    pub fn all() -> Vec<StrategyProfile> {
        StrategyKind::KEYS
            .iter()
            .filter_map(|key| StrategyKind::from_key(key))
            .map(build_profile)
            .collect()
    }

    /// Look up a profile by key.
    pub fn get(key: &str) -> Result<StrategyProfile> {
        StrategyKind::from_key(key)
            .map(build_profile)
            .ok_or_else(|| TeamError::StrategyNotFound {
                name: key.to_string(),
            })
    }

    /// Look up a profile by key, instantiating single-type with `chosen`
    /// when given.
    pub fn resolve(key: &str, chosen: Option<TypeTag>) -> Result<StrategyProfile> {
        let profile = Self::get(key)?;
        Ok(match chosen {
            Some(tag) => profile.with_chosen_type(tag),
            None => profile,
        })
    }

    /// Concrete single-type profile for `chosen`.
    pub fn single_type(chosen: TypeTag) -> StrategyProfile {
        build_profile(StrategyKind::SingleType { chosen: None }).with_chosen_type(chosen)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_profile(kind: StrategyKind) -> StrategyProfile {
    let base = |name: &str,
                description: &str,
                stat_priorities: StatPriorities,
                role_targets: RoleTargets,
                synergy: SynergyWeights,
                warnings: &[&str],
                tips: &[&str]| StrategyProfile {
        kind,
        name: name.to_string(),
        description: description.to_string(),
        stat_priorities,
        role_targets,
        synergy,
        allowed_types: Vec::new(),
        denied_types: Vec::new(),
        warnings: strings(warnings),
        tips: strings(tips),
    };

    let profile = match kind {
        StrategyKind::Balanced => base(
            "Balanced",
            "A well-rounded team that can answer most threats.",
            StatPriorities::uniform(1.0),
            RoleTargets {
                sweeper: 1,
                wallbreaker: 1,
                tank: 1,
                support: 1,
                balanced: 2,
            },
            SynergyWeights {
                type_balance: 0.3,
                stat_complement: 0.25,
                move_coverage: 0.15,
                defensive_coverage: 0.2,
                offensive_synergy: 0.1,
            },
            &[],
            &[
                "Aim for one member of each role before doubling up.",
                "Spread your types so no single attack hits half the team.",
            ],
        ),
        StrategyKind::SingleType { .. } => base(
            "Single Type",
            "Every member shares one type; choose the type to build around.",
            StatPriorities::uniform(1.0),
            RoleTargets {
                sweeper: 2,
                wallbreaker: 1,
                tank: 1,
                support: 1,
                balanced: 1,
            },
            SynergyWeights {
                type_balance: 0.35,
                stat_complement: 0.25,
                move_coverage: 0.1,
                defensive_coverage: 0.2,
                offensive_synergy: 0.1,
            },
            &["Mono-type teams share every weakness of the chosen type."],
            &[
                "Use secondary types to cover the chosen type's weaknesses.",
                "Vary roles since every member shares the same type.",
            ],
        ),
        StrategyKind::Offensive => base(
            "Hyper Offense",
            "Overwhelm opponents with fast, hard-hitting attackers.",
            StatPriorities {
                hp: 0.8,
                attack: 1.4,
                defense: 0.6,
                sp_attack: 1.4,
                sp_defense: 0.6,
                speed: 1.3,
            },
            RoleTargets {
                sweeper: 3,
                wallbreaker: 2,
                tank: 0,
                support: 1,
                balanced: 0,
            },
            SynergyWeights {
                type_balance: 0.15,
                stat_complement: 0.2,
                move_coverage: 0.2,
                defensive_coverage: 0.1,
                offensive_synergy: 0.35,
            },
            &["Hyper offense struggles once momentum is lost."],
            &["Mix physical and special attackers to break different walls."],
        ),
        StrategyKind::Defensive => base(
            "Stall",
            "Outlast opponents with bulky members and recovery.",
            StatPriorities {
                hp: 1.4,
                attack: 0.7,
                defense: 1.4,
                sp_attack: 0.7,
                sp_defense: 1.4,
                speed: 0.6,
            },
            RoleTargets {
                sweeper: 0,
                wallbreaker: 1,
                tank: 3,
                support: 2,
                balanced: 0,
            },
            SynergyWeights {
                type_balance: 0.25,
                stat_complement: 0.2,
                move_coverage: 0.05,
                defensive_coverage: 0.4,
                offensive_synergy: 0.1,
            },
            &["Stall teams are vulnerable to setup sweepers and wallbreakers."],
            &["Pair a physical wall with a special wall."],
        ),
        StrategyKind::SpeedControl => base(
            "Speed Control",
            "Always move first: outspeed and pressure before the opponent acts.",
            StatPriorities {
                hp: 0.8,
                attack: 1.2,
                defense: 0.7,
                sp_attack: 1.2,
                sp_defense: 0.7,
                speed: 1.6,
            },
            RoleTargets {
                sweeper: 3,
                wallbreaker: 1,
                tank: 0,
                support: 1,
                balanced: 1,
            },
            SynergyWeights {
                type_balance: 0.2,
                stat_complement: 0.2,
                move_coverage: 0.15,
                defensive_coverage: 0.1,
                offensive_synergy: 0.35,
            },
            &["Priority attacks bypass raw speed advantages."],
            &["Keep at least one member that can punish faster threats."],
        ),
        StrategyKind::Weather => base(
            "Weather",
            "Build around a weather condition and the types it empowers.",
            StatPriorities {
                hp: 1.0,
                attack: 1.0,
                defense: 0.9,
                sp_attack: 1.2,
                sp_defense: 0.9,
                speed: 1.1,
            },
            RoleTargets {
                sweeper: 2,
                wallbreaker: 1,
                tank: 1,
                support: 1,
                balanced: 1,
            },
            SynergyWeights {
                type_balance: 0.3,
                stat_complement: 0.2,
                move_coverage: 0.15,
                defensive_coverage: 0.2,
                offensive_synergy: 0.15,
            },
            &["Opposing weather setters can overwrite your condition."],
            &["Include a member that benefits from the weather you set."],
        ),
        StrategyKind::DualCore => base(
            "Dual Core",
            "Two members whose types and stats cover each other's weaknesses.",
            StatPriorities {
                hp: 1.0,
                attack: 1.2,
                defense: 1.1,
                sp_attack: 1.2,
                sp_defense: 1.1,
                speed: 1.0,
            },
            RoleTargets {
                sweeper: 1,
                wallbreaker: 2,
                tank: 2,
                support: 0,
                balanced: 1,
            },
            SynergyWeights {
                type_balance: 0.35,
                stat_complement: 0.3,
                move_coverage: 0.1,
                defensive_coverage: 0.15,
                offensive_synergy: 0.1,
            },
            &["Losing one half of the core exposes the other."],
            &["Pick core partners whose resistances mirror each other's weaknesses."],
        ),
        StrategyKind::Attrition => base(
            "Attrition",
            "Wear opponents down with residual damage and durable members.",
            StatPriorities {
                hp: 1.5,
                attack: 0.7,
                defense: 1.3,
                sp_attack: 0.8,
                sp_defense: 1.3,
                speed: 0.6,
            },
            RoleTargets {
                sweeper: 0,
                wallbreaker: 0,
                tank: 3,
                support: 2,
                balanced: 1,
            },
            SynergyWeights {
                type_balance: 0.2,
                stat_complement: 0.15,
                move_coverage: 0.05,
                defensive_coverage: 0.45,
                offensive_synergy: 0.15,
            },
            &["Attrition games are long; a single uncovered threat can snowball."],
            &["Favour high HP and mixed bulk over raw power."],
        ),
    };

    match kind.chosen_type() {
        Some(tag) => profile.with_chosen_type(tag),
        None => profile,
    }
}
