// Team manager: owns the roster, saved teams and active strategy, and
// writes every change through to a key-value store.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TeamError};
use crate::store::KeyValueStore;
use crate::synergy::strategy::{StrategyCatalog, StrategyProfile};
use crate::team::member::{Member, TypeTag};
use crate::team::roster::{Roster, TeamStats, ROSTER_SIZE};

/// Store key for the serialized current roster.
pub const ROSTER_KEY: &str = "roster.current";
/// Store key for the serialized list of saved teams.
pub const SAVED_TEAMS_KEY: &str = "roster.saved_teams";
/// Store key for the active strategy selection.
pub const STRATEGY_KEY: &str = "strategy.active";

/// A named, timestamped snapshot of a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTeam {
    /// Opaque id, e.g. "team_20240315_142501_123".
    pub id: String,
    pub name: String,
    pub roster: Roster,
    pub created_at: DateTime<Utc>,
}

/// Persisted form of the active strategy: the catalog key plus the chosen
/// type for single-type profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StrategySelection {
    key: String,
    #[serde(default)]
    chosen_type: Option<TypeTag>,
}

/// Owns one session's team state.
///
/// Every mutation serializes the new state and writes it to the store
/// before committing it in memory, so a failed write leaves both sides
/// unchanged. Not designed for concurrent mutation; callers serialize.
pub struct TeamManager<S: KeyValueStore> {
    store: S,
    roster: Roster,
    saved_teams: Vec<SavedTeam>,
    strategy: Option<StrategyProfile>,
}

impl<S: KeyValueStore> TeamManager<S> {
    /// Restore roster, saved teams and strategy selection from `store`.
    /// Missing keys start empty. A stored roster holding the same member
    /// twice is a `PersistenceFailure`. A stored strategy that no longer
    /// resolves is logged and dropped.
    pub fn open(store: S) -> Result<Self> {
        let roster: Roster = read(&store, ROSTER_KEY)?.unwrap_or_default();
        check_restored(&roster, ROSTER_KEY)?;
        let saved_teams: Vec<SavedTeam> = read(&store, SAVED_TEAMS_KEY)?.unwrap_or_default();
        for team in &saved_teams {
            check_restored(&team.roster, &format!("saved team '{}'", team.id))?;
        }
        let selection = read::<Option<StrategySelection>>(&store, STRATEGY_KEY)?.flatten();

        let strategy = match selection {
            Some(sel) => match StrategyCatalog::resolve(&sel.key, sel.chosen_type) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("dropping stored strategy selection: {}", e);
                    None
                }
            },
            None => None,
        };

        info!(
            "restored team state: {} member(s), {} saved team(s), strategy {}",
            roster.len(),
            saved_teams.len(),
            strategy.as_ref().map(|p| p.name.as_str()).unwrap_or("none")
        );

        Ok(TeamManager {
            store,
            roster,
            saved_teams,
            strategy,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // -- Roster operations --------------------------------------------------

    /// Place `member` on the roster and return the slot it landed in.
    ///
    /// Fails with `DuplicateMember` when the id is already present (in any
    /// slot). With an explicit `slot` the member overwrites whatever is
    /// there; without one it takes the lowest empty slot or fails with
    /// `RosterFull`.
    pub fn add(&mut self, member: Member, slot: Option<usize>) -> Result<usize> {
        if self.roster.contains_id(member.id) {
            return Err(TeamError::DuplicateMember { id: member.id });
        }
        let index = match slot {
            Some(index) => check_slot(index)?,
            None => self.roster.first_empty().ok_or(TeamError::RosterFull)?,
        };

        let label = member.to_string();
        let mut next = self.roster.clone();
        next.slots[index] = Some(member);
        self.commit_roster(next)?;
        info!("added {} to slot {}", label, index);
        Ok(index)
    }

    /// Empty `slot`, returning whatever it held. Emptying an empty slot is
    /// not an error.
    pub fn remove(&mut self, slot: usize) -> Result<Option<Member>> {
        let index = check_slot(slot)?;
        let mut next = self.roster.clone();
        let removed = next.slots[index].take();
        self.commit_roster(next)?;
        if let Some(ref member) = removed {
            info!("removed {} from slot {}", member, index);
        }
        Ok(removed)
    }

    /// Swap the contents of two slots. Either or both may be empty.
    pub fn move_member(&mut self, from: usize, to: usize) -> Result<()> {
        let from = check_slot(from)?;
        let to = check_slot(to)?;
        let mut next = self.roster.clone();
        next.slots.swap(from, to);
        self.commit_roster(next)?;
        info!("swapped slots {} and {}", from, to);
        Ok(())
    }

    /// Empty every slot.
    pub fn clear(&mut self) -> Result<()> {
        self.commit_roster(Roster::new())?;
        info!("cleared roster");
        Ok(())
    }

    pub fn stats(&self) -> TeamStats {
        self.roster.stats()
    }

    // -- Saved teams --------------------------------------------------------

    /// Snapshot the current roster under `name` and return the new id.
    pub fn save(&mut self, name: &str) -> Result<String> {
        self.save_at(name, Utc::now())
    }

    fn save_at(&mut self, name: &str, now: DateTime<Utc>) -> Result<String> {
        let id = self.next_team_id(now);
        let mut next = self.saved_teams.clone();
        next.push(SavedTeam {
            id: id.clone(),
            name: name.to_string(),
            roster: self.roster.clone(),
            created_at: now,
        });
        write(&self.store, SAVED_TEAMS_KEY, &next)?;
        self.saved_teams = next;
        info!("saved team '{}' as {}", name, id);
        Ok(id)
    }

    /// Replace the current roster with the saved team `id`.
    pub fn load(&mut self, id: &str) -> Result<()> {
        let team = self
            .saved_teams
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TeamError::TeamNotFound { id: id.to_string() })?;
        let (roster, name) = (team.roster.clone(), team.name.clone());
        self.commit_roster(roster)?;
        info!("loaded saved team '{}' ({})", name, id);
        Ok(())
    }

    /// Delete the saved team `id` and return it.
    pub fn delete(&mut self, id: &str) -> Result<SavedTeam> {
        let position = self
            .saved_teams
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TeamError::TeamNotFound { id: id.to_string() })?;
        let mut next = self.saved_teams.clone();
        let removed = next.remove(position);
        write(&self.store, SAVED_TEAMS_KEY, &next)?;
        self.saved_teams = next;
        info!("deleted saved team '{}' ({})", removed.name, id);
        Ok(removed)
    }

    /// Saved teams in creation order.
    pub fn list(&self) -> &[SavedTeam] {
        &self.saved_teams
    }

    /// Timestamp-derived id, suffixed with a counter on collision.
    fn next_team_id(&self, now: DateTime<Utc>) -> String {
        let base = format!("team_{}", now.format("%Y%m%d_%H%M%S_%3f"));
        let taken = |id: &str| self.saved_teams.iter().any(|t| t.id == id);
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    // -- Strategy selection -------------------------------------------------

    /// Make `key` the active strategy. `chosen_type` instantiates the
    /// single-type template and is ignored by other profiles.
    pub fn select_strategy(
        &mut self,
        key: &str,
        chosen_type: Option<TypeTag>,
    ) -> Result<&StrategyProfile> {
        let profile = StrategyCatalog::resolve(key, chosen_type)?;
        let selection = StrategySelection {
            key: profile.key().to_string(),
            chosen_type: profile.kind.chosen_type(),
        };
        write(&self.store, STRATEGY_KEY, &Some(&selection))?;
        info!("selected strategy '{}'", profile.name);
        Ok(self.strategy.insert(profile))
    }

    /// Deselect the active strategy.
    pub fn clear_strategy(&mut self) -> Result<()> {
        write(&self.store, STRATEGY_KEY, &None::<StrategySelection>)?;
        self.strategy = None;
        info!("cleared strategy selection");
        Ok(())
    }

    pub fn active_strategy(&self) -> Option<&StrategyProfile> {
        self.strategy.as_ref()
    }

    fn commit_roster(&mut self, next: Roster) -> Result<()> {
        write(&self.store, ROSTER_KEY, &next)?;
        self.roster = next;
        Ok(())
    }
}

fn check_slot(index: usize) -> Result<usize> {
    if index < ROSTER_SIZE {
        Ok(index)
    } else {
        Err(TeamError::InvalidSlot { index })
    }
}

fn check_restored(roster: &Roster, source: &str) -> Result<()> {
    match roster.duplicate_id() {
        Some(id) => Err(TeamError::PersistenceFailure(anyhow!(
            "stored roster in {source} holds member {id} more than once"
        ))),
        None => Ok(()),
    }
}

fn read<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).map_err(TeamError::PersistenceFailure)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to deserialize stored value for '{key}'"))
        .map(Some)
        .map_err(TeamError::PersistenceFailure)
}

fn write<T: Serialize + ?Sized>(store: &impl KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)
        .with_context(|| format!("failed to serialize value for '{key}'"))
        .map_err(TeamError::PersistenceFailure)?;
    store.set(key, &json).map_err(TeamError::PersistenceFailure)
}
