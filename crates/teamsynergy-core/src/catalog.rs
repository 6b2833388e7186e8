// Member catalog loading.
//
// Reads a local CSV export with columns
// id,name,types,hp,attack,defense,sp_attack,sp_defense,speed where `types`
// holds one or two slash-separated type names (e.g. "Fire/Flying").

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::team::member::{BaseStats, Member, TypeTag};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The full candidate pool, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    members: Vec<Member>,
}

impl Catalog {
    pub fn new(members: Vec<Member>) -> Self {
        Catalog { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Look up by numeric id, falling back to a case-insensitive name match.
    pub fn find(&self, query: &str) -> Option<&Member> {
        let query = query.trim();
        if let Ok(id) = query.parse::<u32>() {
            return self.get(id);
        }
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(query))
    }
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawMember {
    id: u32,
    name: String,
    #[serde(default)]
    types: String,
    hp: u32,
    attack: u32,
    defense: u32,
    #[serde(alias = "special_attack", alias = "spa")]
    sp_attack: u32,
    #[serde(alias = "special_defense", alias = "spd")]
    sp_defense: u32,
    speed: u32,
}

/// Parse the slash-separated type column. Returns the unknown name on
/// failure.
fn parse_types(raw: &str) -> Result<Vec<TypeTag>, String> {
    let mut types = Vec::new();
    for part in raw.split('/').map(str::trim).filter(|p| !p.is_empty()) {
        let tag = TypeTag::parse(part).ok_or_else(|| part.to_string())?;
        if !types.contains(&tag) {
            types.push(tag);
        }
    }
    Ok(types)
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_members_from_reader<R: Read>(rdr: R) -> Result<Vec<Member>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut members = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.deserialize::<RawMember>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim().to_string();
                let types = match parse_types(&raw.types) {
                    Ok(types) => types,
                    Err(unknown) => {
                        warn!("skipping member '{}': unknown type '{}'", name, unknown);
                        continue;
                    }
                };
                if types.len() > 2 {
                    warn!("skipping member '{}': more than two types", name);
                    continue;
                }
                if !seen.insert(raw.id) {
                    warn!("duplicate member id {} ('{}'), keeping the first", raw.id, name);
                    continue;
                }
                members.push(Member::new(
                    raw.id,
                    name,
                    types,
                    BaseStats::new(
                        raw.hp,
                        raw.attack,
                        raw.defense,
                        raw.sp_attack,
                        raw.sp_defense,
                        raw.speed,
                    ),
                ));
            }
            Err(e) => {
                warn!("skipping malformed member row: {}", e);
            }
        }
    }
    Ok(members)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load the catalog from a CSV file. A file with no valid rows is an error.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let members = load_members_from_reader(file).map_err(|e| CatalogError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if members.is_empty() {
        return Err(CatalogError::Validation(format!(
            "catalog {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(Catalog::new(members))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,types,hp,attack,defense,sp_attack,sp_defense,speed";

    fn load(rows: &str) -> Vec<Member> {
        let data = format!("{HEADER}\n{rows}");
        load_members_from_reader(data.as_bytes()).unwrap()
    }

    #[test]
    fn catalog_csv_roundtrip() {
        let members = load(
            "6,Charizard,Fire/Flying,78,84,78,109,85,100\n\
             9,Blastoise,Water,79,83,100,85,105,78",
        );
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, 6);
        assert_eq!(members[0].name, "Charizard");
        assert_eq!(members[0].types, vec![TypeTag::Fire, TypeTag::Flying]);
        assert_eq!(members[0].stats.sp_attack, 109);
        assert_eq!(members[1].types, vec![TypeTag::Water]);
        assert_eq!(members[1].stats.bulk(), 205);
    }

    #[test]
    fn names_and_types_trimmed() {
        let members = load("25, Pikachu , electric ,35,55,40,50,50,90");
        assert_eq!(members[0].name, "Pikachu");
        assert_eq!(members[0].types, vec![TypeTag::Electric]);
    }

    #[test]
    fn unknown_type_skipped() {
        let members = load(
            "1,Glitch,Shadow,50,50,50,50,50,50\n\
             2,Real,Normal,50,50,50,50,50,50",
        );
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Real");
    }

    #[test]
    fn malformed_rows_skipped() {
        let members = load(
            "x,Broken,Fire,1,2,3,4,5,6\n\
             3,Fine,Grass,45,49,49,65,65,45",
        );
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, 3);
    }

    #[test]
    fn empty_types_allowed() {
        let members = load("7,Mystery,,50,50,50,50,50,50");
        assert_eq!(members.len(), 1);
        assert!(members[0].types.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let members = load(
            "4,First,Fire,39,52,43,60,50,65\n\
             4,Second,Water,44,48,65,50,64,43",
        );
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "First");
    }

    #[test]
    fn alias_columns_accepted() {
        let data = "id,name,types,hp,attack,defense,spa,spd,speed\n1,A,Ice,1,2,3,4,5,6";
        let members = load_members_from_reader(data.as_bytes()).unwrap();
        assert_eq!(members[0].stats.sp_defense, 5);
    }

    #[test]
    fn empty_csv_returns_empty_vec() {
        assert!(load_members_from_reader(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn find_by_id_or_name() {
        let catalog = Catalog::new(load("6,Charizard,Fire/Flying,78,84,78,109,85,100"));
        assert_eq!(catalog.find("6").map(|m| m.id), Some(6));
        assert_eq!(catalog.find("charizard").map(|m| m.id), Some(6));
        assert!(catalog.find("7").is_none());
        assert!(catalog.find("Mew").is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
