// Roster-level type analysis: shared weaknesses, shared resistances and
// coverage gaps.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::synergy::roles::Role;
use crate::synergy::type_chart::{combined_immunities, combined_resistances, combined_weaknesses};
use crate::team::member::{BaseStats, TypeTag};
use crate::team::roster::{Roster, ROSTER_SIZE};

/// Minimum number of members sharing a weakness/resistance for it to count
/// as "common".
pub const COMMON_THRESHOLD: usize = 2;

// ---------------------------------------------------------------------------
// Roster analysis
// ---------------------------------------------------------------------------

/// Summary of how the current roster's types interact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterAnalysis {
    pub type_counts: BTreeMap<TypeTag, usize>,
    /// Types at least two members are weak to, in chart order.
    pub common_weaknesses: Vec<TypeTag>,
    /// Types at least two members resist, in chart order.
    pub common_strengths: Vec<TypeTag>,
    pub recommendations: Vec<String>,
}

/// For every attacking type, how many members are weak to it.
pub fn weakness_counts(roster: &Roster) -> BTreeMap<TypeTag, usize> {
    let mut counts = BTreeMap::new();
    for member in roster.members() {
        for tag in combined_weaknesses(&member.types) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}

/// For every attacking type, how many members resist it.
pub fn resistance_counts(roster: &Roster) -> BTreeMap<TypeTag, usize> {
    let mut counts = BTreeMap::new();
    for member in roster.members() {
        for tag in combined_resistances(&member.types) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}

fn at_least(counts: &BTreeMap<TypeTag, usize>, threshold: usize) -> Vec<TypeTag> {
    counts
        .iter()
        .filter(|(_, n)| **n >= threshold)
        .map(|(tag, _)| *tag)
        .collect()
}

/// Count members per tactical role.
pub fn role_balance(roster: &Roster) -> BTreeMap<Role, usize> {
    let mut balance = BTreeMap::new();
    for member in roster.members() {
        *balance.entry(Role::classify(&member.stats)).or_insert(0) += 1;
    }
    balance
}

/// Analyze the roster's shared weaknesses and strengths.
pub fn analyze_roster(roster: &Roster) -> RosterAnalysis {
    let weaknesses = weakness_counts(roster);
    let common_weaknesses = at_least(&weaknesses, COMMON_THRESHOLD);
    let common_strengths = at_least(&resistance_counts(roster), COMMON_THRESHOLD);

    let mut recommendations = Vec::new();
    let size = roster.len();
    if size == 0 {
        recommendations
            .push("Start with a member you like; suggestions adapt as the roster grows.".into());
    } else {
        for tag in &common_weaknesses {
            recommendations.push(format!(
                "{} members are weak to {tag}; add a member that resists it.",
                weaknesses[tag]
            ));
        }

        if size >= 3 {
            let roles = role_balance(roster);
            for role in [Role::Tank, Role::Sweeper] {
                if !roles.contains_key(&role) {
                    recommendations.push(format!("No {role} on the roster yet."));
                }
            }
        }

        let open = ROSTER_SIZE - size;
        if open > 0 {
            recommendations.push(format!("{open} open slot(s) remaining."));
        }
    }

    RosterAnalysis {
        type_counts: roster.type_counts(),
        common_weaknesses,
        common_strengths,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Coverage report (strategy mode)
// ---------------------------------------------------------------------------

/// Coverage bundle returned alongside strategy recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub size: usize,
    /// Distinct types present on the roster.
    pub types_covered: Vec<TypeTag>,
    /// Types some member is weak to that no member resists or is immune to.
    pub weaknesses_uncovered: Vec<TypeTag>,
    pub role_balance: BTreeMap<Role, usize>,
    pub average_stats: BaseStats,
}

pub fn coverage_report(roster: &Roster) -> CoverageReport {
    let stats = roster.stats();
    let types_covered: Vec<TypeTag> = stats.type_counts.keys().copied().collect();

    let mut answered = BTreeSet::new();
    for member in roster.members() {
        answered.extend(combined_resistances(&member.types));
        answered.extend(combined_immunities(&member.types));
    }
    let weaknesses_uncovered = weakness_counts(roster)
        .into_keys()
        .filter(|tag| !answered.contains(tag))
        .collect();

    CoverageReport {
        size: stats.size,
        types_covered,
        weaknesses_uncovered,
        role_balance: role_balance(roster),
        average_stats: stats.average_stats,
    }
}
