// Recommendation pipeline: filter the candidate pool, score every
// remaining candidate, rank, truncate, and (in strategy mode) assemble the
// coverage / tips / warnings summary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::synergy::analysis::{analyze_roster, coverage_report, weakness_counts, CoverageReport};
use crate::synergy::roles::Role;
use crate::synergy::scorer::{score_for_reference, score_for_strategy, ScoreBreakdown, SynergyTag};
use crate::synergy::strategy::{StrategyKind, StrategyProfile};
use crate::team::member::{BaseStats, Member};
use crate::team::roster::{Roster, ROSTER_SIZE};

/// Average speed below which a speed-control roster is flagged.
pub const SPEED_CONTROL_MIN_AVERAGE: u32 = 95;
/// Average HP below which an attrition roster is flagged.
pub const ATTRITION_MIN_AVERAGE_HP: u32 = 80;
/// Members sharing one weakness before it becomes a critical warning.
pub const CRITICAL_WEAKNESS_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Output bounds for one recommendation run. The defaults are the
/// built-in limits; the `[recommendations]` config section overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationLimits {
    pub reference_limit: usize,
    pub strategy_limit: usize,
    pub max_reasons: usize,
    pub max_tips: usize,
    pub max_warnings: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        RecommendationLimits {
            reference_limit: 10,
            strategy_limit: 12,
            max_reasons: 3,
            max_tips: 5,
            max_warnings: 4,
        }
    }
}

/// A ranked candidate. Computed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub member: Member,
    /// 0-100 inclusive.
    pub score: u8,
    pub role: Role,
    pub reasons: Vec<String>,
    pub tags: BTreeSet<SynergyTag>,
    pub breakdown: ScoreBreakdown,
}

/// What the candidates are scored against.
#[derive(Debug, Clone, Copy)]
pub enum RecommendationMode<'a> {
    /// Partners for one specific member.
    Reference(&'a Member),
    /// Fits for a strategy profile across the whole roster.
    Strategy(&'a StrategyProfile),
}

/// Strategy-mode extras returned next to the ranked list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategySummary {
    pub coverage: CoverageReport,
    pub tips: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of [`RecommendationPipeline::recommend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSet {
    /// Non-increasing by score.
    pub recommendations: Vec<Recommendation>,
    /// Present in strategy mode only.
    pub summary: Option<StrategySummary>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RecommendationPipeline {
    limits: RecommendationLimits,
}

impl RecommendationPipeline {
    pub fn new(limits: RecommendationLimits) -> Self {
        RecommendationPipeline { limits }
    }

    /// Rank `pool` for `roster` under `mode`.
    pub fn recommend(
        &self,
        roster: &Roster,
        mode: RecommendationMode<'_>,
        pool: &[Member],
    ) -> RecommendationSet {
        let candidates = filter_candidates(roster, mode, pool);
        let analysis = analyze_roster(roster);

        let mut ranked: Vec<Recommendation> = candidates
            .into_iter()
            .map(|candidate| {
                let scored = match mode {
                    RecommendationMode::Reference(reference) => {
                        score_for_reference(candidate, roster, reference)
                    }
                    RecommendationMode::Strategy(strategy) => {
                        score_for_strategy(candidate, roster, strategy, &analysis)
                    }
                };
                debug!(
                    "scored #{} {}: {} (raw {:.2})",
                    candidate.id,
                    candidate.name,
                    scored.score,
                    scored.breakdown.raw_total()
                );
                let mut reasons = scored.reasons;
                reasons.truncate(self.limits.max_reasons);
                Recommendation {
                    member: candidate.clone(),
                    score: scored.score,
                    role: scored.role,
                    reasons,
                    tags: scored.tags,
                    breakdown: scored.breakdown,
                }
            })
            .collect();

        // Stable: equal scores keep pool order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let (limit, summary) = match mode {
            RecommendationMode::Reference(_) => (self.limits.reference_limit, None),
            RecommendationMode::Strategy(strategy) => (
                self.limits.strategy_limit,
                Some(self.strategy_summary(roster, strategy)),
            ),
        };
        let considered = ranked.len();
        ranked.truncate(limit);

        match mode {
            RecommendationMode::Reference(reference) => info!(
                "recommended {} of {} candidates for #{} {}",
                ranked.len(),
                considered,
                reference.id,
                reference.name
            ),
            RecommendationMode::Strategy(strategy) => info!(
                "recommended {} of {} candidates for strategy '{}'",
                ranked.len(),
                considered,
                strategy.name
            ),
        }

        RecommendationSet {
            recommendations: ranked,
            summary,
        }
    }

    /// Partners for `reference`, best first.
    pub fn recommend_for_reference(
        &self,
        roster: &Roster,
        reference: &Member,
        pool: &[Member],
    ) -> Vec<Recommendation> {
        self.recommend(roster, RecommendationMode::Reference(reference), pool)
            .recommendations
    }

    /// Fits for `strategy`, best first, with the coverage summary.
    pub fn recommend_for_strategy(
        &self,
        roster: &Roster,
        strategy: &StrategyProfile,
        pool: &[Member],
    ) -> (Vec<Recommendation>, StrategySummary) {
        let set = self.recommend(roster, RecommendationMode::Strategy(strategy), pool);
        let summary = set
            .summary
            .unwrap_or_else(|| self.strategy_summary(roster, strategy));
        (set.recommendations, summary)
    }

    /// Coverage plus bounded tips and warnings for `roster` under `strategy`.
    ///
    /// Tips are the profile's static tips followed by situational ones.
    /// Warnings put situational criticals first so truncation keeps them.
    pub fn strategy_summary(&self, roster: &Roster, strategy: &StrategyProfile) -> StrategySummary {
        let coverage = coverage_report(roster);

        let mut tips = strategy.tips.clone();
        tips.extend(situational_tips(roster, strategy, &coverage));
        tips.truncate(self.limits.max_tips);

        let mut warnings = situational_warnings(roster, strategy);
        warnings.extend(strategy.warnings.iter().cloned());
        warnings.truncate(self.limits.max_warnings);

        StrategySummary {
            coverage,
            tips,
            warnings,
        }
    }
}

/// Apply the pool filters for `mode`, preserving pool order.
///
/// Roster ids are always excluded. Reference mode also drops the reference
/// itself; strategy mode applies the profile's allow and deny lists.
pub fn filter_candidates<'a>(
    roster: &Roster,
    mode: RecommendationMode<'_>,
    pool: &'a [Member],
) -> Vec<&'a Member> {
    pool.iter()
        .filter(|m| !roster.contains_id(m.id))
        .filter(|m| match mode {
            RecommendationMode::Reference(reference) => m.id != reference.id,
            RecommendationMode::Strategy(strategy) => strategy.admits(&m.types),
        })
        .collect()
}

fn situational_warnings(roster: &Roster, strategy: &StrategyProfile) -> Vec<String> {
    let mut warnings = Vec::new();
    if roster.is_empty() {
        return warnings;
    }
    // Thresholds compare the exact mean; the coverage averages are rounded.
    let speed = mean_stat(roster, |s| s.speed);
    let hp = mean_stat(roster, |s| s.hp);

    match strategy.kind {
        StrategyKind::SpeedControl if speed < f64::from(SPEED_CONTROL_MIN_AVERAGE) => {
            warnings.push(format!(
                "Average speed is {speed:.1}, below the {SPEED_CONTROL_MIN_AVERAGE} a speed-control team needs."
            ));
        }
        StrategyKind::Attrition if hp < f64::from(ATTRITION_MIN_AVERAGE_HP) => {
            warnings.push(format!("Average HP is {hp:.1}, too low to win long battles."));
        }
        StrategyKind::SingleType {
            chosen: Some(chosen),
        } => {
            for member in roster.members().filter(|m| !m.has_type(chosen)) {
                warnings.push(format!(
                    "{} does not carry the {} type.",
                    member.name,
                    chosen.label()
                ));
            }
        }
        _ => {}
    }

    for (tag, count) in weakness_counts(roster) {
        if count >= CRITICAL_WEAKNESS_COUNT {
            warnings.push(format!("{count} members are weak to {tag}."));
        }
    }
    warnings
}

/// Unrounded mean of one stat over the occupied slots. 0 when empty.
fn mean_stat(roster: &Roster, stat: impl Fn(&BaseStats) -> u32) -> f64 {
    let (sum, count) = roster
        .members()
        .fold((0u64, 0usize), |(sum, count), m| (sum + u64::from(stat(&m.stats)), count + 1));
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

fn situational_tips(
    roster: &Roster,
    strategy: &StrategyProfile,
    coverage: &CoverageReport,
) -> Vec<String> {
    let mut tips = Vec::new();

    for tag in coverage.weaknesses_uncovered.iter().take(2) {
        tips.push(format!("Nothing on the team resists {tag}; look for a member that does."));
    }

    for role in Role::ALL {
        let desired = strategy.role_targets.target(role);
        let current = coverage.role_balance.get(&role).copied().unwrap_or(0);
        if current < desired {
            tips.push(format!(
                "Add {} more {role}{} to match the {} plan.",
                desired - current,
                if desired - current == 1 { "" } else { "s" },
                strategy.name
            ));
        }
    }

    let open = ROSTER_SIZE - roster.len();
    if open > 0 {
        tips.push(format!("{open} open slot(s) left."));
    }
    tips
}
