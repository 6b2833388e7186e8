// Team member representation: type tags and base attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// The 18 elemental type tags a member can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl TypeTag {
    /// Every type tag, in chart order.
    pub const ALL: [TypeTag; 18] = [
        TypeTag::Normal,
        TypeTag::Fire,
        TypeTag::Water,
        TypeTag::Electric,
        TypeTag::Grass,
        TypeTag::Ice,
        TypeTag::Fighting,
        TypeTag::Poison,
        TypeTag::Ground,
        TypeTag::Flying,
        TypeTag::Psychic,
        TypeTag::Bug,
        TypeTag::Rock,
        TypeTag::Ghost,
        TypeTag::Dragon,
        TypeTag::Dark,
        TypeTag::Steel,
        TypeTag::Fairy,
    ];

    /// Parse a type tag, case-insensitively. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Some(TypeTag::Normal),
            "fire" => Some(TypeTag::Fire),
            "water" => Some(TypeTag::Water),
            "electric" => Some(TypeTag::Electric),
            "grass" => Some(TypeTag::Grass),
            "ice" => Some(TypeTag::Ice),
            "fighting" => Some(TypeTag::Fighting),
            "poison" => Some(TypeTag::Poison),
            "ground" => Some(TypeTag::Ground),
            "flying" => Some(TypeTag::Flying),
            "psychic" => Some(TypeTag::Psychic),
            "bug" => Some(TypeTag::Bug),
            "rock" => Some(TypeTag::Rock),
            "ghost" => Some(TypeTag::Ghost),
            "dragon" => Some(TypeTag::Dragon),
            "dark" => Some(TypeTag::Dark),
            "steel" => Some(TypeTag::Steel),
            "fairy" => Some(TypeTag::Fairy),
            _ => None,
        }
    }

    /// Lowercase key used in storage and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            TypeTag::Normal => "normal",
            TypeTag::Fire => "fire",
            TypeTag::Water => "water",
            TypeTag::Electric => "electric",
            TypeTag::Grass => "grass",
            TypeTag::Ice => "ice",
            TypeTag::Fighting => "fighting",
            TypeTag::Poison => "poison",
            TypeTag::Ground => "ground",
            TypeTag::Flying => "flying",
            TypeTag::Psychic => "psychic",
            TypeTag::Bug => "bug",
            TypeTag::Rock => "rock",
            TypeTag::Ghost => "ghost",
            TypeTag::Dragon => "dragon",
            TypeTag::Dark => "dark",
            TypeTag::Steel => "steel",
            TypeTag::Fairy => "fairy",
        }
    }

    /// Capitalized display label (e.g. "Fire").
    pub fn label(&self) -> &'static str {
        match self {
            TypeTag::Normal => "Normal",
            TypeTag::Fire => "Fire",
            TypeTag::Water => "Water",
            TypeTag::Electric => "Electric",
            TypeTag::Grass => "Grass",
            TypeTag::Ice => "Ice",
            TypeTag::Fighting => "Fighting",
            TypeTag::Poison => "Poison",
            TypeTag::Ground => "Ground",
            TypeTag::Flying => "Flying",
            TypeTag::Psychic => "Psychic",
            TypeTag::Bug => "Bug",
            TypeTag::Rock => "Rock",
            TypeTag::Ghost => "Ghost",
            TypeTag::Dragon => "Dragon",
            TypeTag::Dark => "Dark",
            TypeTag::Steel => "Steel",
            TypeTag::Fairy => "Fairy",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Base attributes
// ---------------------------------------------------------------------------

/// The six base attributes of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    pub fn new(
        hp: u32,
        attack: u32,
        defense: u32,
        sp_attack: u32,
        sp_defense: u32,
        speed: u32,
    ) -> Self {
        BaseStats {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    /// attack + sp_attack, widened so any pair of `u32` stats fits.
    pub fn offense(&self) -> u64 {
        u64::from(self.attack) + u64::from(self.sp_attack)
    }

    /// defense + sp_defense
    pub fn bulk(&self) -> u64 {
        u64::from(self.defense) + u64::from(self.sp_defense)
    }

    /// hp + defense + sp_defense
    pub fn durability(&self) -> u64 {
        u64::from(self.hp) + self.bulk()
    }

    /// The attributes in fixed order: hp, attack, defense, sp_attack,
    /// sp_defense, speed.
    pub fn as_array(&self) -> [u32; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }

    /// Attack strictly dominates special attack.
    pub fn is_physical(&self) -> bool {
        self.attack > self.sp_attack
    }

    /// Special attack strictly dominates attack.
    pub fn is_special(&self) -> bool {
        self.sp_attack > self.attack
    }

    /// Offense total strictly exceeds bulk.
    pub fn is_offensive(&self) -> bool {
        self.offense() > self.bulk()
    }

    /// Bulk strictly exceeds offense total.
    pub fn is_defensive(&self) -> bool {
        self.bulk() > self.offense()
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// A single creature obtained from the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    /// One or two type tags, primary first. May be empty for malformed
    /// catalog entries; scoring treats that as zero contribution.
    #[serde(default)]
    pub types: Vec<TypeTag>,
    pub stats: BaseStats,
}

impl Member {
    pub fn new(id: u32, name: impl Into<String>, types: Vec<TypeTag>, stats: BaseStats) -> Self {
        Member {
            id,
            name: name.into(),
            types,
            stats,
        }
    }

    pub fn has_type(&self, tag: TypeTag) -> bool {
        self.types.contains(&tag)
    }

    /// Slash-joined type labels, e.g. "Fire/Flying".
    pub fn type_label(&self) -> String {
        if self.types.is_empty() {
            return "???".to_string();
        }
        self.types
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.type_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TypeTag::parse("FIRE"), Some(TypeTag::Fire));
        assert_eq!(TypeTag::parse(" grass "), Some(TypeTag::Grass));
        assert_eq!(TypeTag::parse("shadow"), None);
    }

    #[test]
    fn every_tag_parses_from_its_key() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::parse(tag.key()), Some(tag));
        }
    }

    #[test]
    fn stat_leanings_are_strict() {
        let even = BaseStats::new(80, 90, 60, 90, 60, 70);
        assert!(!even.is_physical());
        assert!(!even.is_special());
        assert!(even.is_offensive());
        assert!(!even.is_defensive());

        let wall = BaseStats::new(100, 50, 120, 40, 110, 30);
        assert!(wall.is_defensive());
        assert_eq!(wall.offense(), 90);
        assert_eq!(wall.bulk(), 230);
        assert_eq!(wall.durability(), 330);
    }

    #[test]
    fn derived_totals_do_not_overflow() {
        let maxed = BaseStats::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX, u32::MAX, 1);
        assert_eq!(maxed.offense(), 2 * u64::from(u32::MAX));
        assert_eq!(maxed.durability(), 3 * u64::from(u32::MAX));
        assert!(!maxed.is_physical());
        assert!(!maxed.is_offensive());
    }

    #[test]
    fn type_label_joins_tags() {
        let m = Member::new(
            6,
            "Blazewing",
            vec![TypeTag::Fire, TypeTag::Flying],
            BaseStats::default(),
        );
        assert_eq!(m.type_label(), "Fire/Flying");
        assert_eq!(m.to_string(), "#6 Blazewing (Fire/Flying)");
    }
}
