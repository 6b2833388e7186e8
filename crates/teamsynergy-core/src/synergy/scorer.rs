// Synergy scoring: bounded [0, 100] fitness of one candidate against a
// roster, either relative to a reference member or under a strategy.
//
// Both modes run through `score_candidate`. Reference mode is the
// degenerate case: the type-balance term looks at a single partner (the
// reference) and the fixed reference weights replace a profile.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::synergy::analysis::{analyze_roster, RosterAnalysis};
use crate::synergy::roles::{Role, StatCategory};
use crate::synergy::strategy::{Orientation, StrategyKind, StrategyProfile, WEATHER_TYPES};
use crate::synergy::type_chart::{any_resists, covers_weakness_of, resistances_of, weaknesses_of};
use crate::team::member::{BaseStats, Member, TypeTag};
use crate::team::roster::Roster;

pub const MAX_SCORE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Synergy tags
// ---------------------------------------------------------------------------

/// Fixed vocabulary describing why a candidate fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynergyTag {
    TypeBalance,
    StatComplement,
    MoveCoverage,
    DefensiveWall,
    OffensiveCore,
}

impl SynergyTag {
    pub fn label(&self) -> &'static str {
        match self {
            SynergyTag::TypeBalance => "type-balance",
            SynergyTag::StatComplement => "stat-complement",
            SynergyTag::MoveCoverage => "move-coverage",
            SynergyTag::DefensiveWall => "defensive-wall",
            SynergyTag::OffensiveCore => "offensive-core",
        }
    }
}

// ---------------------------------------------------------------------------
// Score breakdown
// ---------------------------------------------------------------------------

/// Weighted contribution of every term. Terms a mode does not use stay 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub stat_priority: f64,
    pub role_fit: f64,
    pub type_balance: f64,
    pub stat_complement: f64,
    pub defensive_coverage: f64,
    pub offensive_synergy: f64,
    pub diversity: f64,
    /// Unweighted strategy-specific adjustment; may be negative.
    pub strategy_bonus: f64,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.stat_priority
            + self.role_fit
            + self.type_balance
            + self.stat_complement
            + self.defensive_coverage
            + self.offensive_synergy
            + self.diversity
            + self.strategy_bonus
    }

    /// The total clamped to [0, 100] and rounded.
    pub fn score(&self) -> u8 {
        let total = self.raw_total();
        if !total.is_finite() {
            return 0;
        }
        total.clamp(0.0, MAX_SCORE).round() as u8
    }
}

/// Result of scoring one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub score: u8,
    pub role: Role,
    pub breakdown: ScoreBreakdown,
    /// Every reason produced, strongest contribution first. Callers truncate.
    pub reasons: Vec<String>,
    pub tags: BTreeSet<SynergyTag>,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Score `candidate` as a partner for `reference` on `roster`.
///
/// Weighted sum of type balance (0.4), stat complementarity (0.3),
/// defensive coverage of the roster's common weaknesses (0.2) and stat
/// category diversity (0.1), capped at 100.
pub fn score_for_reference(candidate: &Member, roster: &Roster, reference: &Member) -> ScoredCandidate {
    let analysis = analyze_roster(roster);
    score_candidate(candidate, roster, &analysis, Mode::Reference(reference))
}

/// Score `candidate` for `roster` under `strategy`. `analysis` must describe
/// `roster`; it is taken as a parameter so a pipeline can compute it once.
pub fn score_for_strategy(
    candidate: &Member,
    roster: &Roster,
    strategy: &StrategyProfile,
    analysis: &RosterAnalysis,
) -> ScoredCandidate {
    score_candidate(candidate, roster, analysis, Mode::Strategy(strategy))
}

// ---------------------------------------------------------------------------
// Shared pipeline
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Mode<'a> {
    Reference(&'a Member),
    Strategy(&'a StrategyProfile),
}

/// Reference-mode term weights.
const REFERENCE_TYPE_WEIGHT: f64 = 0.4;
const REFERENCE_COMPLEMENT_WEIGHT: f64 = 0.3;
const REFERENCE_DEFENSIVE_WEIGHT: f64 = 0.2;
const REFERENCE_DIVERSITY_WEIGHT: f64 = 0.1;

/// Strategy-mode fixed term weights (the rest come from the profile).
const STAT_PRIORITY_WEIGHT: f64 = 0.3;
const ROLE_FIT_WEIGHT: f64 = 0.25;

/// How weakness coverage is credited in the type-balance term.
#[derive(Clone, Copy)]
enum Credit {
    /// Once per (partner type, candidate type) pair that covers.
    PerTypePair(f64),
    /// Once per partner with at least one covered weakness.
    PerPartner(f64),
}

/// Coverage credit plus the penalty per candidate type already on the roster.
#[derive(Clone, Copy)]
struct TypeBalanceRule {
    credit: Credit,
    duplicate_penalty: f64,
}

const REFERENCE_RULE: TypeBalanceRule = TypeBalanceRule {
    credit: Credit::PerTypePair(15.0),
    duplicate_penalty: 10.0,
};

const ROSTER_RULE: TypeBalanceRule = TypeBalanceRule {
    credit: Credit::PerPartner(10.0),
    duplicate_penalty: 5.0,
};

/// Collects (contribution, text) pairs and sorts them at the end.
#[derive(Default)]
struct Reasons(Vec<(f64, String)>);

impl Reasons {
    fn add(&mut self, contribution: f64, text: String) {
        if contribution > 0.0 {
            self.0.push((contribution, text));
        }
    }

    fn into_sorted(mut self) -> Vec<String> {
        // Stable: equal contributions keep insertion order.
        self.0
            .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        self.0.into_iter().map(|(_, text)| text).collect()
    }
}

fn score_candidate(
    candidate: &Member,
    roster: &Roster,
    analysis: &RosterAnalysis,
    mode: Mode<'_>,
) -> ScoredCandidate {
    let role = Role::classify(&candidate.stats);
    let mut breakdown = ScoreBreakdown::default();
    let mut reasons = Reasons::default();
    let mut tags = BTreeSet::new();

    match mode {
        Mode::Reference(reference) => {
            // Type balance against the single reference member.
            let balance = type_balance(candidate, &[reference], roster, REFERENCE_RULE);
            breakdown.type_balance = balance.raw * REFERENCE_TYPE_WEIGHT;
            if !balance.covered_types.is_empty() {
                reasons.add(
                    breakdown.type_balance,
                    format!(
                        "Resists {}, covering {}'s weaknesses",
                        list_types(balance.covered_types.iter().copied()),
                        reference.name
                    ),
                );
            }

            // Stat complementarity with the reference.
            let mut complement = split_complement(&reference.stats, &candidate.stats);
            let pivot = reference.stats.speed > 90
                && candidate.stats.speed < 50
                && candidate.stats.hp > 80;
            if pivot {
                complement += 15.0;
            }
            breakdown.stat_complement = complement * REFERENCE_COMPLEMENT_WEIGHT;
            if pivot {
                reasons.add(
                    breakdown.stat_complement,
                    format!("Bulky, slow partner to back up the speedy {}", reference.name),
                );
            } else {
                reasons.add(
                    breakdown.stat_complement,
                    format!("Balances {}'s stat spread", reference.name),
                );
            }

            // Coverage of weaknesses the roster already shares.
            let covered = covered_weaknesses(candidate, &analysis.common_weaknesses);
            let pairs = covered_weakness_pairs(candidate, &analysis.common_weaknesses);
            breakdown.defensive_coverage = pairs as f64 * 20.0 * REFERENCE_DEFENSIVE_WEIGHT;
            reasons.add(
                breakdown.defensive_coverage,
                format!("Shores up the team's shared weakness to {}", list_types(covered)),
            );

            // Stat category diversity.
            let category = StatCategory::of(&candidate.stats);
            let present = roster
                .members()
                .any(|m| StatCategory::of(&m.stats) == category);
            if !present {
                breakdown.diversity = 30.0 * REFERENCE_DIVERSITY_WEIGHT;
                reasons.add(
                    breakdown.diversity,
                    format!("Adds a {} profile the team lacks", category.label()),
                );
            }
        }
        Mode::Strategy(strategy) => {
            let weights = strategy.synergy;
            let members: Vec<&Member> = roster.members().collect();

            // Stat priorities.
            let weighted = strategy.stat_priorities.weighted_mean(&candidate.stats);
            breakdown.stat_priority = (weighted / 3.0).min(40.0) * STAT_PRIORITY_WEIGHT;
            if weighted >= 90.0 {
                reasons.add(
                    breakdown.stat_priority,
                    format!("Stats suit the {} priorities", strategy.name),
                );
            }

            // Role fit.
            let desired = strategy.role_targets.target(role);
            let current = members
                .iter()
                .filter(|m| Role::classify(&m.stats) == role)
                .count();
            if current < desired {
                breakdown.role_fit = (desired - current) as f64 * 20.0 * ROLE_FIT_WEIGHT;
                reasons.add(breakdown.role_fit, format!("Fills a needed {role} role"));
            }

            // Type balance.
            match strategy.kind {
                StrategyKind::SingleType {
                    chosen: Some(chosen),
                } => {
                    let (raw, patched) = single_type_balance(candidate, chosen);
                    breakdown.type_balance = raw * weights.type_balance;
                    if candidate.has_type(chosen) {
                        reasons.add(
                            breakdown.type_balance,
                            if patched.is_empty() {
                                format!("Fits the mono-{} theme", chosen.label())
                            } else {
                                format!(
                                    "Fits the mono-{} theme and its secondary type resists {}",
                                    chosen.label(),
                                    list_types(patched)
                                )
                            },
                        );
                    }
                }
                // Template without a chosen type: nothing to balance against.
                StrategyKind::SingleType { chosen: None } => {}
                StrategyKind::Balanced
                | StrategyKind::Offensive
                | StrategyKind::Defensive
                | StrategyKind::SpeedControl
                | StrategyKind::Weather
                | StrategyKind::DualCore
                | StrategyKind::Attrition => {
                    let balance = type_balance(candidate, &members, roster, ROSTER_RULE);
                    breakdown.type_balance = balance.raw * weights.type_balance;
                    if !balance.covered.is_empty() {
                        reasons.add(
                            breakdown.type_balance,
                            format!(
                                "Covers type weaknesses of {}",
                                join_words(balance.covered.iter().take(2).cloned())
                            ),
                        );
                    }
                }
            }

            // Stat complementarity averaged over the roster.
            if !members.is_empty() {
                let total: f64 = members
                    .iter()
                    .map(|m| split_complement(&m.stats, &candidate.stats))
                    .sum();
                let averaged = (total / members.len() as f64).min(35.0);
                breakdown.stat_complement = averaged * weights.stat_complement;
                reasons.add(
                    breakdown.stat_complement,
                    "Complements the roster's physical/special and offense/defense mix".into(),
                );
            }

            // Defensive coverage.
            match strategy.kind {
                StrategyKind::SingleType {
                    chosen: Some(chosen),
                } => {
                    let patched: Vec<TypeTag> = weaknesses_of(chosen)
                        .iter()
                        .copied()
                        .filter(|w| any_resists(&candidate.types, *w))
                        .collect();
                    breakdown.defensive_coverage =
                        patched.len() as f64 * 10.0 * weights.defensive_coverage;
                    reasons.add(
                        breakdown.defensive_coverage,
                        format!(
                            "Resists {}, a {} weakness",
                            list_types(patched),
                            chosen.label()
                        ),
                    );
                }
                StrategyKind::SingleType { chosen: None } => {}
                StrategyKind::Balanced
                | StrategyKind::Offensive
                | StrategyKind::Defensive
                | StrategyKind::SpeedControl
                | StrategyKind::Weather
                | StrategyKind::DualCore
                | StrategyKind::Attrition => {
                    let covered = covered_weaknesses(candidate, &analysis.common_weaknesses);
                    breakdown.defensive_coverage =
                        covered.len() as f64 * 15.0 * weights.defensive_coverage;
                    reasons.add(
                        breakdown.defensive_coverage,
                        format!("Shores up the team's shared weakness to {}", list_types(covered)),
                    );
                }
            }

            // Offensive synergy.
            let orientation = strategy.kind.orientation();
            let stats = &candidate.stats;
            let raw = match orientation {
                Orientation::Offense => {
                    let tier = if stats.speed > 100 {
                        15.0
                    } else if stats.speed > 80 {
                        10.0
                    } else {
                        0.0
                    };
                    (stats.offense() as f64 / 5.0).min(40.0) + tier
                }
                Orientation::Defense => (stats.durability() as f64 / 8.0).min(50.0),
                Orientation::Neutral => 25.0,
            };
            breakdown.offensive_synergy = raw * weights.offensive_synergy;
            match orientation {
                Orientation::Offense if stats.offense() > 200 || stats.speed > 100 => {
                    reasons.add(breakdown.offensive_synergy, "Strong offensive pressure".into());
                    tags.insert(SynergyTag::OffensiveCore);
                }
                Orientation::Defense if stats.durability() > 250 => {
                    reasons.add(breakdown.offensive_synergy, "Durable enough to grind games out".into());
                    tags.insert(SynergyTag::DefensiveWall);
                }
                _ => {}
            }

            // Strategy-specific bonus.
            let (bonus, text) = strategy_bonus(candidate, role, &members, strategy.kind);
            breakdown.strategy_bonus = bonus;
            if let Some(text) = text {
                reasons.add(bonus, text);
            }
        }
    }

    if breakdown.type_balance > 0.0 {
        tags.insert(SynergyTag::TypeBalance);
    }
    if breakdown.stat_complement > 0.0 {
        tags.insert(SynergyTag::StatComplement);
    }
    if breakdown.defensive_coverage > 0.0 {
        tags.insert(SynergyTag::DefensiveWall);
    }
    if matches!(role, Role::Sweeper | Role::Wallbreaker) {
        tags.insert(SynergyTag::OffensiveCore);
    }
    if !roster.is_empty() && candidate.types.iter().any(|t| !roster.has_type(*t)) {
        tags.insert(SynergyTag::MoveCoverage);
    }

    ScoredCandidate {
        score: breakdown.score(),
        role,
        breakdown,
        reasons: reasons.into_sorted(),
        tags,
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

struct TypeBalance {
    raw: f64,
    /// Names of partners with at least one weakness the candidate resists.
    covered: Vec<String>,
    /// The partner weaknesses the candidate resists.
    covered_types: BTreeSet<TypeTag>,
}

/// Type balance against `partners`: coverage credit per `rule.credit` for
/// weaknesses the candidate resists, minus a penalty for every candidate
/// type already on the roster. Floored at 0.
fn type_balance(
    candidate: &Member,
    partners: &[&Member],
    roster: &Roster,
    rule: TypeBalanceRule,
) -> TypeBalance {
    let mut raw = 0.0;
    let mut covered = Vec::new();
    let mut covered_types = BTreeSet::new();

    for partner in partners {
        let mut helped = false;
        for partner_type in &partner.types {
            for candidate_type in &candidate.types {
                if covers_weakness_of(*candidate_type, *partner_type) {
                    if let Credit::PerTypePair(credit) = rule.credit {
                        raw += credit;
                    }
                    helped = true;
                    let resists = resistances_of(*candidate_type);
                    covered_types.extend(
                        weaknesses_of(*partner_type)
                            .iter()
                            .filter(|w| resists.contains(w))
                            .copied(),
                    );
                }
            }
        }
        if helped {
            if let Credit::PerPartner(credit) = rule.credit {
                raw += credit;
            }
            covered.push(partner.name.clone());
        }
    }

    let duplicates = candidate
        .types
        .iter()
        .filter(|t| roster.has_type(**t))
        .count();
    raw -= duplicates as f64 * rule.duplicate_penalty;

    TypeBalance {
        raw: raw.max(0.0),
        covered,
        covered_types,
    }
}

/// Single-type balance: 30 for carrying the chosen type plus 5 per chosen
/// weakness a secondary type resists. Returns the raw value and the patched
/// weaknesses.
fn single_type_balance(candidate: &Member, chosen: TypeTag) -> (f64, Vec<TypeTag>) {
    let mut raw = 0.0;
    if candidate.has_type(chosen) {
        raw += 30.0;
    }
    let secondary: Vec<TypeTag> = candidate
        .types
        .iter()
        .copied()
        .filter(|t| *t != chosen)
        .collect();
    let patched: Vec<TypeTag> = weaknesses_of(chosen)
        .iter()
        .copied()
        .filter(|w| any_resists(&secondary, *w))
        .collect();
    raw += patched.len() as f64 * 5.0;
    (raw, patched)
}

/// 20 for a physical/special split, 25 for an offense/defense split.
/// Both directions are checked; comparisons are strict.
fn split_complement(a: &BaseStats, b: &BaseStats) -> f64 {
    let mut raw = 0.0;
    if (a.is_physical() && b.is_special()) || (a.is_special() && b.is_physical()) {
        raw += 20.0;
    }
    if (a.is_offensive() && b.is_defensive()) || (a.is_defensive() && b.is_offensive()) {
        raw += 25.0;
    }
    raw
}

/// Common weaknesses resisted by at least one candidate type.
fn covered_weaknesses(candidate: &Member, weaknesses: &[TypeTag]) -> Vec<TypeTag> {
    weaknesses
        .iter()
        .copied()
        .filter(|w| any_resists(&candidate.types, *w))
        .collect()
}

/// Count of (weakness, candidate type) pairs where the type resists it.
fn covered_weakness_pairs(candidate: &Member, weaknesses: &[TypeTag]) -> usize {
    weaknesses
        .iter()
        .map(|w| {
            candidate
                .types
                .iter()
                .filter(|t| resistances_of(**t).contains(w))
                .count()
        })
        .sum()
}

fn strategy_bonus(
    candidate: &Member,
    role: Role,
    members: &[&Member],
    kind: StrategyKind,
) -> (f64, Option<String>) {
    let stats = &candidate.stats;
    match kind {
        StrategyKind::SpeedControl => {
            if stats.speed > 110 {
                (15.0, Some("Outspeeds almost everything".into()))
            } else if stats.speed > 95 {
                (10.0, Some("Fast enough to control tempo".into()))
            } else if stats.speed < 60 {
                (-10.0, None)
            } else {
                (0.0, None)
            }
        }
        StrategyKind::Attrition => {
            let mut bonus = 0.0;
            if stats.hp > 100 {
                bonus += 10.0;
            }
            if stats.bulk() > 160 {
                bonus += 15.0;
            }
            if stats.offense() > 120 {
                bonus -= 5.0;
            }
            let text = (bonus > 0.0).then(|| "Built to survive long battles".to_string());
            (bonus, text)
        }
        StrategyKind::Weather => {
            match candidate.types.iter().find(|t| WEATHER_TYPES.contains(*t)) {
                Some(tag) => (10.0, Some(format!("{} type benefits from weather", tag.label()))),
                None => (0.0, None),
            }
        }
        StrategyKind::SingleType { .. } => {
            let absent = !members.iter().any(|m| Role::classify(&m.stats) == role);
            if absent {
                (15.0, Some(format!("Brings a {role} the team does not have")))
            } else {
                (0.0, None)
            }
        }
        StrategyKind::Offensive => {
            if stats.attack >= 120 || stats.sp_attack >= 120 {
                (10.0, Some("Hits hard enough to break walls".into()))
            } else {
                (0.0, None)
            }
        }
        StrategyKind::Defensive => {
            if stats.bulk() > 180 {
                (10.0, Some("Exceptional mixed bulk".into()))
            } else {
                (0.0, None)
            }
        }
        StrategyKind::DualCore => {
            let forms_core = (1..=2).contains(&members.len())
                && members.iter().all(|m| {
                    m.types.iter().any(|mt| {
                        candidate
                            .types
                            .iter()
                            .any(|ct| covers_weakness_of(*ct, *mt))
                    })
                });
            if forms_core {
                (10.0, Some("Forms a defensive core with the current members".into()))
            } else {
                (0.0, None)
            }
        }
        StrategyKind::Balanced => (0.0, None),
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

fn join_words(items: impl IntoIterator<Item = String>) -> String {
    let items: Vec<String> = items.into_iter().collect();
    match items.len() {
        0 => String::new(),
        1 => items[0].clone(),
        n => format!("{} and {}", items[..n - 1].join(", "), items[n - 1]),
    }
}

fn list_types(tags: impl IntoIterator<Item = TypeTag>) -> String {
    join_words(tags.into_iter().map(|t| t.label().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synergy::strategy::StrategyCatalog;

    fn member(id: u32, name: &str, types: Vec<TypeTag>, stats: BaseStats) -> Member {
        Member::new(id, name, types, stats)
    }

    fn fire_a() -> Member {
        member(1, "Emberfox", vec![TypeTag::Fire], BaseStats::new(70, 80, 60, 60, 60, 90))
    }

    fn water_b() -> Member {
        member(2, "Tidecrab", vec![TypeTag::Water], BaseStats::new(90, 60, 100, 50, 70, 40))
    }

    fn grass_c() -> Member {
        member(3, "Fernling", vec![TypeTag::Grass], BaseStats::new(70, 55, 65, 100, 70, 60))
    }

    #[test]
    fn grass_partner_for_fire_reference() {
        let roster = Roster::from_members(vec![fire_a(), water_b()]);
        let scored = score_for_reference(&grass_c(), &roster, &fire_a());

        // Grass resists Water and Ground, two of Fire's weaknesses: one
        // covering pair, no duplicate types.
        assert!((scored.breakdown.type_balance - 15.0 * 0.4).abs() < 1e-9);
        assert!(scored.tags.contains(&SynergyTag::TypeBalance));
        assert!(!scored.reasons.is_empty());
        assert!(scored.reasons.len() <= 4);
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.contains("Water and Ground") && r.contains("Emberfox")));
        assert!(scored.score <= 100);
    }

    #[test]
    fn duplicate_types_are_penalized_and_floored() {
        let roster = Roster::from_members(vec![fire_a()]);
        let other_fire = member(9, "Cinder", vec![TypeTag::Fire], BaseStats::new(60, 60, 60, 60, 60, 60));
        let scored = score_for_reference(&other_fire, &roster, &fire_a());
        // Fire does not cover Fire's weaknesses and is a duplicate: floored at 0.
        assert_eq!(scored.breakdown.type_balance, 0.0);
        assert!(!scored.tags.contains(&SynergyTag::TypeBalance));
    }

    #[test]
    fn reference_complement_and_pivot_bonus() {
        let fast = member(1, "Zip", vec![TypeTag::Electric], BaseStats::new(60, 100, 50, 60, 50, 120));
        let slow_wall = member(2, "Boulder", vec![TypeTag::Ground], BaseStats::new(110, 40, 110, 60, 100, 30));
        let roster = Roster::from_members(vec![fast.clone()]);
        let scored = score_for_reference(&slow_wall, &roster, &fast);
        // Physical vs special (20) + offense vs defense (25) + pivot (15).
        assert!((scored.breakdown.stat_complement - 60.0 * 0.3).abs() < 1e-9);
        assert!(scored.reasons.iter().any(|r| r.contains("Bulky, slow partner")));
    }

    #[test]
    fn diversity_only_for_new_category() {
        let roster = Roster::from_members(vec![fire_a()]);
        let same = member(5, "Twin", vec![TypeTag::Normal], fire_a().stats);
        let scored = score_for_reference(&same, &roster, &fire_a());
        assert_eq!(scored.breakdown.diversity, 0.0);

        let sweeper = member(6, "Dash", vec![TypeTag::Normal], BaseStats::new(60, 60, 60, 60, 60, 130));
        let scored = score_for_reference(&sweeper, &roster, &fire_a());
        assert!((scored.breakdown.diversity - 3.0).abs() < 1e-9);
    }

    #[test]
    fn typeless_candidate_scores_without_type_terms() {
        let roster = Roster::from_members(vec![fire_a(), water_b()]);
        let blank = member(7, "Unknown", vec![], BaseStats::default());
        let scored = score_for_reference(&blank, &roster, &fire_a());
        assert_eq!(scored.breakdown.type_balance, 0.0);
        assert_eq!(scored.breakdown.defensive_coverage, 0.0);
        assert!(!scored.tags.contains(&SynergyTag::MoveCoverage));
    }

    #[test]
    fn strategy_score_on_empty_roster_is_bounded() {
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        for strategy in StrategyCatalog::all() {
            let scored = score_for_strategy(&grass_c(), &roster, &strategy, &analysis);
            assert!(scored.score <= 100);
            assert_eq!(scored.breakdown.type_balance, 0.0);
            assert_eq!(scored.breakdown.stat_complement, 0.0);
        }
    }

    #[test]
    fn role_fit_rewards_missing_roles_only() {
        let strategy = StrategyCatalog::get("defensive").unwrap();
        let tank = member(10, "Shell", vec![TypeTag::Steel], BaseStats::new(70, 50, 120, 40, 100, 30));
        assert_eq!(Role::classify(&tank.stats), Role::Tank);

        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&tank, &roster, &strategy, &analysis);
        // Defensive wants three tanks, none present.
        assert!((scored.breakdown.role_fit - 3.0 * 20.0 * 0.25).abs() < 1e-9);

        let full_of_tanks = Roster::from_members((20..23).map(|id| Member {
            id,
            ..tank.clone()
        }));
        let analysis = analyze_roster(&full_of_tanks);
        let scored = score_for_strategy(&tank, &full_of_tanks, &strategy, &analysis);
        assert_eq!(scored.breakdown.role_fit, 0.0);
    }

    #[test]
    fn single_type_rewards_chosen_type_and_secondary_cover() {
        let strategy = StrategyCatalog::single_type(TypeTag::Fire);
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);

        let fire_water = member(11, "Steamer", vec![TypeTag::Fire, TypeTag::Water], BaseStats::new(70, 70, 70, 70, 70, 70));
        let scored = score_for_strategy(&fire_water, &roster, &strategy, &analysis);
        // 30 for Fire; Water resists Water (a Fire weakness): +5.
        assert!((scored.breakdown.type_balance - 35.0 * 0.35).abs() < 1e-9);
        // Fire resists none of its own weaknesses; Water resists Water.
        assert!((scored.breakdown.defensive_coverage - 10.0 * 0.2).abs() < 1e-9);
        // Empty roster: the role is absent.
        assert_eq!(scored.breakdown.strategy_bonus, 15.0);
    }

    #[test]
    fn speed_control_bonus_tiers() {
        let strategy = StrategyCatalog::get("speed-control").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let with_speed = |speed| member(12, "Runner", vec![TypeTag::Normal], BaseStats::new(60, 60, 60, 60, 60, speed));
        let bonus = |speed| score_for_strategy(&with_speed(speed), &roster, &strategy, &analysis)
            .breakdown
            .strategy_bonus;
        assert_eq!(bonus(120), 15.0);
        assert_eq!(bonus(100), 10.0);
        assert_eq!(bonus(80), 0.0);
        assert_eq!(bonus(40), -10.0);
    }

    #[test]
    fn attrition_bonus_components() {
        let strategy = StrategyCatalog::get("attrition").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let bulky = member(13, "Mound", vec![TypeTag::Ground], BaseStats::new(120, 70, 90, 60, 90, 30));
        let scored = score_for_strategy(&bulky, &roster, &strategy, &analysis);
        // hp > 100 (+10), bulk 180 > 160 (+15), offense 130 > 120 (-5).
        assert_eq!(scored.breakdown.strategy_bonus, 20.0);
    }

    #[test]
    fn weather_bonus_requires_weather_type() {
        let strategy = StrategyCatalog::get("weather").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        assert_eq!(
            score_for_strategy(&water_b(), &roster, &strategy, &analysis).breakdown.strategy_bonus,
            10.0
        );
        let ghost = member(14, "Wisp", vec![TypeTag::Ghost], BaseStats::default());
        assert_eq!(
            score_for_strategy(&ghost, &roster, &strategy, &analysis).breakdown.strategy_bonus,
            0.0
        );
    }

    #[test]
    fn neutral_orientation_gets_flat_credit() {
        let strategy = StrategyCatalog::get("balanced").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&grass_c(), &roster, &strategy, &analysis);
        assert!((scored.breakdown.offensive_synergy - 25.0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn reasons_are_sorted_by_contribution() {
        let strategy = StrategyCatalog::get("offensive").unwrap();
        let roster = Roster::from_members(vec![fire_a(), water_b()]);
        let analysis = analyze_roster(&roster);
        let sweeper = member(15, "Volt", vec![TypeTag::Electric], BaseStats::new(60, 70, 50, 120, 60, 130));
        let scored = score_for_strategy(&sweeper, &roster, &strategy, &analysis);
        assert!(scored.tags.contains(&SynergyTag::OffensiveCore));
        assert!(scored.tags.contains(&SynergyTag::MoveCoverage));

        // Each known reason paired with the term that produced it.
        let b = &scored.breakdown;
        let known = [
            ("Strong offensive pressure", b.offensive_synergy),
            ("Fills a needed sweeper role", b.role_fit),
            ("Hits hard enough to break walls", b.strategy_bonus),
            ("Complements the roster", b.stat_complement),
            ("Covers type weaknesses", b.type_balance),
        ];
        let mut found: Vec<(usize, f64)> = known
            .iter()
            .filter_map(|(prefix, contribution)| {
                scored
                    .reasons
                    .iter()
                    .position(|r| r.starts_with(prefix))
                    .map(|index| (index, *contribution))
            })
            .collect();
        assert_eq!(found.len(), known.len(), "reasons: {:?}", scored.reasons);

        found.sort_by_key(|(index, _)| *index);
        for pair in found.windows(2) {
            assert!(
                pair[0].1 >= pair[1].1,
                "reason {} ({}) ranked above reason {} ({})",
                pair[0].0,
                pair[0].1,
                pair[1].0,
                pair[1].1
            );
        }
    }

    #[test]
    fn roster_type_balance_credits_each_partner_once() {
        let strategy = StrategyCatalog::get("balanced").unwrap();
        let boulder = member(20, "Cragmaw", vec![TypeTag::Fire, TypeTag::Rock], BaseStats::new(80, 80, 80, 80, 80, 80));
        let marsh = member(21, "Bogwade", vec![TypeTag::Grass, TypeTag::Water], BaseStats::new(80, 80, 80, 80, 80, 80));

        // Both of Marsh's types cover both of Boulder's: four covering
        // pairs, but a single partner.
        let roster = Roster::from_members(vec![boulder.clone()]);
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&marsh, &roster, &strategy, &analysis);
        let raw = scored.breakdown.type_balance / strategy.synergy.type_balance;
        assert!((raw - 10.0).abs() < 1e-9, "raw type balance {raw}");

        // A second covered partner adds another 10.
        let mole = member(22, "Burrowl", vec![TypeTag::Ground], BaseStats::new(80, 80, 80, 80, 80, 80));
        let roster = Roster::from_members(vec![boulder.clone(), mole]);
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&marsh, &roster, &strategy, &analysis);
        let raw = scored.breakdown.type_balance / strategy.synergy.type_balance;
        assert!((raw - 20.0).abs() < 1e-9, "raw type balance {raw}");

        // Reference mode still credits every covering type pair.
        let roster = Roster::from_members(vec![boulder.clone()]);
        let scored = score_for_reference(&marsh, &roster, &boulder);
        assert!((scored.breakdown.type_balance - 4.0 * 15.0 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn roster_type_balance_penalizes_shared_types() {
        let strategy = StrategyCatalog::get("balanced").unwrap();
        let boulder = member(20, "Cragmaw", vec![TypeTag::Fire, TypeTag::Rock], BaseStats::new(80, 80, 80, 80, 80, 80));
        let pond = member(23, "Lilypad", vec![TypeTag::Water], BaseStats::new(80, 80, 80, 80, 80, 80));
        let marsh = member(21, "Bogwade", vec![TypeTag::Grass, TypeTag::Water], BaseStats::new(80, 80, 80, 80, 80, 80));

        // Covers both partners (+20); Water is already present (-5).
        let roster = Roster::from_members(vec![boulder, pond]);
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&marsh, &roster, &strategy, &analysis);
        let raw = scored.breakdown.type_balance / strategy.synergy.type_balance;
        assert!((raw - 15.0).abs() < 1e-9, "raw type balance {raw}");
    }

    #[test]
    fn single_type_template_skips_type_terms() {
        let template = StrategyCatalog::get("single-type").unwrap();
        let roster = Roster::from_members(vec![fire_a(), water_b()]);
        let analysis = analyze_roster(&roster);
        let scored = score_for_strategy(&grass_c(), &roster, &template, &analysis);
        assert_eq!(scored.breakdown.type_balance, 0.0);
        assert_eq!(scored.breakdown.defensive_coverage, 0.0);
    }

    #[test]
    fn offensive_bonus_needs_a_120_attacking_stat() {
        let strategy = StrategyCatalog::get("offensive").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let bonus = |attack, sp_attack| {
            let candidate = member(30, "Striker", vec![TypeTag::Fighting], BaseStats::new(70, attack, 70, sp_attack, 70, 70));
            score_for_strategy(&candidate, &roster, &strategy, &analysis)
                .breakdown
                .strategy_bonus
        };
        assert_eq!(bonus(120, 50), 10.0);
        assert_eq!(bonus(50, 125), 10.0);
        assert_eq!(bonus(119, 119), 0.0);
    }

    #[test]
    fn defensive_bonus_needs_bulk_above_180() {
        let strategy = StrategyCatalog::get("defensive").unwrap();
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);
        let bonus = |defense, sp_defense| {
            let candidate = member(31, "Bastion", vec![TypeTag::Steel], BaseStats::new(70, 50, defense, 50, sp_defense, 40));
            score_for_strategy(&candidate, &roster, &strategy, &analysis)
                .breakdown
                .strategy_bonus
        };
        assert_eq!(bonus(100, 81), 10.0);
        assert_eq!(bonus(90, 90), 0.0);
    }

    #[test]
    fn defense_orientation_rewards_durability_up_to_cap() {
        let strategy = StrategyCatalog::get("defensive").unwrap();
        let weight = strategy.synergy.offensive_synergy;
        let roster = Roster::new();
        let analysis = analyze_roster(&roster);

        // (100 + 100 + 100) / 8 = 37.5
        let sturdy = member(32, "Slab", vec![TypeTag::Rock], BaseStats::new(100, 40, 100, 40, 100, 30));
        let scored = score_for_strategy(&sturdy, &roster, &strategy, &analysis);
        assert!((scored.breakdown.offensive_synergy - 37.5 * weight).abs() < 1e-9);
        assert!(scored.tags.contains(&SynergyTag::DefensiveWall));
        assert!(scored.reasons.iter().any(|r| r == "Durable enough to grind games out"));

        // 600 / 8 = 75, capped at 50.
        let fortress = member(33, "Keep", vec![TypeTag::Rock], BaseStats::new(200, 40, 200, 40, 200, 30));
        let scored = score_for_strategy(&fortress, &roster, &strategy, &analysis);
        assert!((scored.breakdown.offensive_synergy - 50.0 * weight).abs() < 1e-9);
    }

    #[test]
    fn dual_core_bonus_needs_every_partner_covered() {
        let strategy = StrategyCatalog::get("dual-core").unwrap();
        let bonus = |roster: &Roster, candidate: &Member| {
            let analysis = analyze_roster(roster);
            score_for_strategy(candidate, roster, &strategy, &analysis)
                .breakdown
                .strategy_bonus
        };
        let pond = member(40, "Lilypad", vec![TypeTag::Water], BaseStats::new(70, 70, 70, 70, 70, 70));

        // Water covers Fire's Water weakness.
        assert_eq!(bonus(&Roster::from_members(vec![fire_a()]), &pond), 10.0);
        // Water does not cover Water's Electric/Grass weaknesses.
        assert_eq!(bonus(&Roster::from_members(vec![fire_a(), water_b()]), &pond), 0.0);
        // Grass covers both.
        assert_eq!(bonus(&Roster::from_members(vec![fire_a(), water_b()]), &grass_c()), 10.0);
        // No core on an empty roster or past two members.
        assert_eq!(bonus(&Roster::new(), &pond), 0.0);
        let three = member(41, "Pebble", vec![TypeTag::Fire], BaseStats::new(70, 70, 70, 70, 70, 70));
        assert_eq!(bonus(&Roster::from_members(vec![fire_a(), three.clone()]), &pond), 10.0);
        let four = member(42, "Coal", vec![TypeTag::Fire], BaseStats::new(70, 70, 70, 70, 70, 70));
        assert_eq!(bonus(&Roster::from_members(vec![fire_a(), three, four]), &pond), 0.0);
    }

    #[test]
    fn maxed_stats_score_without_overflow() {
        let brute = member(50, "Colossus", vec![TypeTag::Dragon], BaseStats::new(10, u32::MAX, 10, 1, 10, 10));
        let wall = member(51, "Monolith", vec![TypeTag::Steel], BaseStats::new(u32::MAX, 1, u32::MAX, 1, u32::MAX, 1));
        assert_eq!(Role::classify(&brute.stats), Role::Wallbreaker);
        assert_eq!(Role::classify(&wall.stats), Role::Tank);

        let rosters = [
            Roster::new(),
            Roster::from_members(vec![wall.clone()]),
            Roster::from_members(vec![fire_a(), brute.clone()]),
        ];
        let mut strategies = StrategyCatalog::all();
        strategies.push(StrategyCatalog::single_type(TypeTag::Dragon));
        for roster in &rosters {
            let analysis = analyze_roster(roster);
            for candidate in [&brute, &wall] {
                for strategy in &strategies {
                    let scored = score_for_strategy(candidate, roster, strategy, &analysis);
                    assert!(scored.score <= 100);
                }
                let scored = score_for_reference(candidate, roster, &fire_a());
                assert!(scored.score <= 100);
            }
        }
    }

    #[test]
    fn join_words_formats_lists() {
        assert_eq!(join_words(Vec::<String>::new()), "");
        assert_eq!(list_types([TypeTag::Water]), "Water");
        assert_eq!(list_types([TypeTag::Water, TypeTag::Ground]), "Water and Ground");
        assert_eq!(
            list_types([TypeTag::Water, TypeTag::Ground, TypeTag::Rock]),
            "Water, Ground and Rock"
        );
    }
}
