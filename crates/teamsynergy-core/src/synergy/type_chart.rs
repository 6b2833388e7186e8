// Categorical type relationships (weak / resistant / immune).
//
// Defensive view: `weaknesses_of(Fire)` lists the attacking types Fire
// takes extra damage from. No multipliers are modelled; callers only use
// set membership and intersection.

use std::collections::BTreeSet;

use crate::team::member::TypeTag;
use crate::team::member::TypeTag::*;

/// Attacking types the given type is weak against.
pub fn weaknesses_of(tag: TypeTag) -> &'static [TypeTag] {
    match tag {
        Normal => &[Fighting],
        Fire => &[Water, Ground, Rock],
        Water => &[Electric, Grass],
        Electric => &[Ground],
        Grass => &[Fire, Ice, Poison, Flying, Bug],
        Ice => &[Fire, Fighting, Rock, Steel],
        Fighting => &[Flying, Psychic, Fairy],
        Poison => &[Ground, Psychic],
        Ground => &[Water, Grass, Ice],
        Flying => &[Electric, Ice, Rock],
        Psychic => &[Bug, Ghost, Dark],
        Bug => &[Fire, Flying, Rock],
        Rock => &[Water, Grass, Fighting, Ground, Steel],
        Ghost => &[Ghost, Dark],
        Dragon => &[Ice, Dragon, Fairy],
        Dark => &[Fighting, Bug, Fairy],
        Steel => &[Fire, Fighting, Ground],
        Fairy => &[Poison, Steel],
    }
}

/// Attacking types the given type resists.
pub fn resistances_of(tag: TypeTag) -> &'static [TypeTag] {
    match tag {
        Normal => &[],
        Fire => &[Fire, Grass, Ice, Bug, Steel, Fairy],
        Water => &[Fire, Water, Ice, Steel],
        Electric => &[Electric, Flying, Steel],
        Grass => &[Water, Electric, Grass, Ground],
        Ice => &[Ice],
        Fighting => &[Bug, Rock, Dark],
        Poison => &[Grass, Fighting, Poison, Bug, Fairy],
        Ground => &[Poison, Rock],
        Flying => &[Grass, Fighting, Bug],
        Psychic => &[Fighting, Psychic],
        Bug => &[Grass, Fighting, Ground],
        Rock => &[Normal, Fire, Poison, Flying],
        Ghost => &[Poison, Bug],
        Dragon => &[Fire, Water, Electric, Grass],
        Dark => &[Ghost, Dark],
        Steel => &[
            Normal, Grass, Ice, Flying, Psychic, Bug, Rock, Dragon, Steel, Fairy,
        ],
        Fairy => &[Fighting, Bug, Dark],
    }
}

/// Attacking types the given type is immune to.
pub fn immunities_of(tag: TypeTag) -> &'static [TypeTag] {
    match tag {
        Normal => &[Ghost],
        Ground => &[Electric],
        Flying => &[Ground],
        Ghost => &[Normal, Fighting],
        Dark => &[Psychic],
        Steel => &[Poison],
        Fairy => &[Dragon],
        _ => &[],
    }
}

/// String-keyed lookup. Unknown tags yield an empty set.
pub fn weaknesses_of_key(key: &str) -> BTreeSet<TypeTag> {
    TypeTag::parse(key)
        .map(|t| weaknesses_of(t).iter().copied().collect())
        .unwrap_or_default()
}

/// String-keyed lookup. Unknown tags yield an empty set.
pub fn resistances_of_key(key: &str) -> BTreeSet<TypeTag> {
    TypeTag::parse(key)
        .map(|t| resistances_of(t).iter().copied().collect())
        .unwrap_or_default()
}

/// Union of weaknesses across all of a member's types.
pub fn combined_weaknesses(types: &[TypeTag]) -> BTreeSet<TypeTag> {
    types
        .iter()
        .flat_map(|t| weaknesses_of(*t).iter().copied())
        .collect()
}

/// Union of resistances across all of a member's types.
pub fn combined_resistances(types: &[TypeTag]) -> BTreeSet<TypeTag> {
    types
        .iter()
        .flat_map(|t| resistances_of(*t).iter().copied())
        .collect()
}

/// Union of immunities across all of a member's types.
pub fn combined_immunities(types: &[TypeTag]) -> BTreeSet<TypeTag> {
    types
        .iter()
        .flat_map(|t| immunities_of(*t).iter().copied())
        .collect()
}

/// Whether `defender` resists at least one of `attacker`'s weaknesses.
pub fn covers_weakness_of(defender: TypeTag, attacker: TypeTag) -> bool {
    let resists = resistances_of(defender);
    weaknesses_of(attacker).iter().any(|w| resists.contains(w))
}

/// Whether any of `types` resists the attacking type `attack`.
pub fn any_resists(types: &[TypeTag], attack: TypeTag) -> bool {
    types.iter().any(|t| resistances_of(*t).contains(&attack))
}
