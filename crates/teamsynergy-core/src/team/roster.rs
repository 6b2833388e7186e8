// Fixed six-slot roster and its aggregate statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::member::{BaseStats, Member, TypeTag};

/// Number of slots on a roster.
pub const ROSTER_SIZE: usize = 6;

/// A team's six slots, each empty or holding a member.
///
/// The roster itself does not enforce uniqueness; [`super::manager::TeamManager`]
/// is the only mutator and guarantees no member id appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub slots: [Option<Member>; ROSTER_SIZE],
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from members placed in the first slots, in order.
    /// Members beyond the sixth are ignored.
    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Self {
        let mut roster = Roster::new();
        for (slot, member) in roster.slots.iter_mut().zip(members) {
            *slot = Some(member);
        }
        roster
    }

    /// The member at `slot`, if the slot is in range and occupied.
    pub fn get(&self, slot: usize) -> Option<&Member> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Occupied slots in slot order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.members().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Lowest-index empty slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.members().any(|m| m.id == id)
    }

    /// First member id held by more than one slot, if any.
    pub fn duplicate_id(&self) -> Option<u32> {
        let mut seen = BTreeSet::new();
        self.members().map(|m| m.id).find(|id| !seen.insert(*id))
    }

    /// Whether any member carries the given type.
    pub fn has_type(&self, tag: TypeTag) -> bool {
        self.members().any(|m| m.has_type(tag))
    }

    /// Occurrence count of every type tag across occupied slots.
    pub fn type_counts(&self) -> BTreeMap<TypeTag, usize> {
        let mut counts = BTreeMap::new();
        for member in self.members() {
            for tag in &member.types {
                *counts.entry(*tag).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Aggregate statistics over the occupied slots.
    pub fn stats(&self) -> TeamStats {
        let size = self.len();
        let type_counts = self.type_counts();
        if size == 0 {
            return TeamStats {
                size,
                average_stats: BaseStats::default(),
                type_counts,
            };
        }

        let mut sums = [0u64; 6];
        for member in self.members() {
            for (sum, value) in sums.iter_mut().zip(member.stats.as_array()) {
                *sum += u64::from(value);
            }
        }
        let avg = |sum: u64| (sum as f64 / size as f64).round() as u32;

        TeamStats {
            size,
            average_stats: BaseStats {
                hp: avg(sums[0]),
                attack: avg(sums[1]),
                defense: avg(sums[2]),
                sp_attack: avg(sums[3]),
                sp_defense: avg(sums[4]),
                speed: avg(sums[5]),
            },
            type_counts,
        }
    }
}

/// Aggregate view of a roster. An empty roster yields size 0, all-zero
/// averages and no type counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub size: usize,
    /// Per-attribute averages rounded to the nearest integer.
    pub average_stats: BaseStats,
    pub type_counts: BTreeMap<TypeTag, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u32, types: Vec<TypeTag>, stats: BaseStats) -> Member {
        Member::new(id, format!("member-{id}"), types, stats)
    }

    #[test]
    fn empty_roster_stats_are_zeroed() {
        let stats = Roster::new().stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.average_stats, BaseStats::default());
        assert!(stats.type_counts.is_empty());
    }

    #[test]
    fn averages_round_to_nearest() {
        let roster = Roster::from_members(vec![
            member(1, vec![TypeTag::Fire], BaseStats::new(80, 81, 50, 60, 50, 90)),
            member(
                2,
                vec![TypeTag::Water, TypeTag::Fire],
                BaseStats::new(90, 80, 100, 60, 70, 40),
            ),
        ]);
        let stats = roster.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.average_stats.hp, 85);
        // 80.5 rounds away from zero.
        assert_eq!(stats.average_stats.attack, 81);
        assert_eq!(stats.average_stats.speed, 65);
        assert_eq!(stats.type_counts[&TypeTag::Fire], 2);
        assert_eq!(stats.type_counts[&TypeTag::Water], 1);
    }

    #[test]
    fn slot_queries() {
        let mut roster = Roster::new();
        roster.slots[2] = Some(member(7, vec![], BaseStats::default()));
        assert_eq!(roster.first_empty(), Some(0));
        assert_eq!(roster.len(), 1);
        assert!(roster.contains_id(7));
        assert!(roster.get(2).is_some());
        assert!(roster.get(9).is_none());
    }

    #[test]
    fn duplicate_id_finds_repeated_member() {
        let mut roster = Roster::from_members(vec![
            member(1, vec![], BaseStats::default()),
            member(2, vec![], BaseStats::default()),
        ]);
        assert_eq!(roster.duplicate_id(), None);
        roster.slots[5] = Some(member(2, vec![], BaseStats::default()));
        assert_eq!(roster.duplicate_id(), Some(2));
    }

    #[test]
    fn from_members_ignores_overflow() {
        let roster = Roster::from_members(
            (1..=8).map(|i| member(i, vec![TypeTag::Normal], BaseStats::default())),
        );
        assert_eq!(roster.len(), ROSTER_SIZE);
        assert_eq!(roster.first_empty(), None);
        assert!(!roster.contains_id(7));
    }
}
