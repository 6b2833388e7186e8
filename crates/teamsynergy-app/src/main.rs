// Team synergy command-line front end.
//
// Startup sequence:
// 1. Resolve the home directory (--home, the working directory, or the
//    platform data directory)
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config
// 4. Open database and restore team state
// 5. Load the catalog for commands that need it
// 6. Run the subcommand

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::info;

use teamsynergy::catalog::{self, Catalog};
use teamsynergy::config::{self, Config, CONFIG_FILE};
use teamsynergy::db::Database;
use teamsynergy::synergy::analysis::{analyze_roster, coverage_report};
use teamsynergy::synergy::recommend::{Recommendation, RecommendationPipeline};
use teamsynergy::synergy::roles::Role;
use teamsynergy::synergy::strategy::{StrategyCatalog, StrategyKind};
use teamsynergy::team::manager::TeamManager;
use teamsynergy::team::member::TypeTag;
use teamsynergy::team::roster::Roster;

/// Shipped configuration, seeded into the platform data directory when the
/// binary runs outside a project checkout.
const DEFAULT_CONFIG: &str = include_str!("../../../defaults/teamsynergy.toml");

#[derive(Parser)]
#[command(name = "teamsynergy")]
#[command(about = "Build a six-member team with synergy-driven suggestions", long_about = None)]
struct Cli {
    /// Directory holding config/ and the relative data paths
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current roster and its averages
    Show,

    /// Add a catalog member by id or name
    Add {
        member: String,

        /// Target slot (0-5); overwrites the slot when given
        #[arg(long)]
        slot: Option<usize>,
    },

    /// Empty a slot
    Remove { slot: usize },

    /// Swap two slots
    Move { from: usize, to: usize },

    /// Empty every slot
    Clear,

    /// Snapshot the current roster under a name
    Save { name: String },

    /// Replace the roster with a saved team
    Load { id: String },

    /// Delete a saved team
    Delete { id: String },

    /// List saved teams
    Teams,

    /// List available strategies
    Strategies,

    /// Select the active strategy
    UseStrategy {
        key: String,

        /// Chosen type for the single-type strategy
        #[arg(long = "type")]
        chosen_type: Option<String>,
    },

    /// Deselect the active strategy
    ClearStrategy,

    /// Recommend candidates for the roster
    Suggest {
        /// Suggest partners for this member (id or name) instead of using
        /// the active strategy
        #[arg(long)]
        reference: Option<String>,
    },

    /// Show shared weaknesses, coverage gaps and role balance
    Analyze,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1-2. Home directory and tracing
    let home = resolve_home(cli.home)?;
    init_tracing(&home)?;
    info!("teamsynergy starting in {}", home.display());

    // 3. Config
    let config = config::load_config(&home).context("failed to load configuration")?;

    // 4. Database and team state
    let db_path = home.join(&config.db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    let mut manager = TeamManager::open(db).context("failed to restore team state")?;

    // 5-6. Run
    match cli.command {
        Commands::Show => print_roster(manager.roster()),

        Commands::Add { member, slot } => {
            let catalog = load_catalog(&home, &config)?;
            let found = catalog
                .find(&member)
                .with_context(|| format!("no catalog member matches '{member}'"))?
                .clone();
            let label = found.to_string();
            let index = manager.add(found, slot)?;
            println!("Added {label} to slot {index}.");
        }

        Commands::Remove { slot } => match manager.remove(slot)? {
            Some(member) => println!("Removed {member} from slot {slot}."),
            None => println!("Slot {slot} was already empty."),
        },

        Commands::Move { from, to } => {
            manager.move_member(from, to)?;
            println!("Swapped slots {from} and {to}.");
        }

        Commands::Clear => {
            manager.clear()?;
            println!("Roster cleared.");
        }

        Commands::Save { name } => {
            let id = manager.save(&name)?;
            println!("Saved '{name}' as {id}.");
        }

        Commands::Load { id } => {
            manager.load(&id)?;
            println!("Loaded {id}.");
            print_roster(manager.roster());
        }

        Commands::Delete { id } => {
            let removed = manager.delete(&id)?;
            println!("Deleted '{}' ({}).", removed.name, removed.id);
        }

        Commands::Teams => {
            if manager.list().is_empty() {
                println!("No saved teams.");
            }
            for team in manager.list() {
                println!(
                    "{}  {}  {} member(s)  saved {}",
                    team.id,
                    team.name,
                    team.roster.len(),
                    team.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }

        Commands::Strategies => {
            let active = manager.active_strategy().map(|p| p.key());
            for profile in StrategyCatalog::all() {
                let marker = if Some(profile.key()) == active { "*" } else { " " };
                println!("{marker} {:<14} {}", profile.key(), profile.description);
            }
        }

        Commands::UseStrategy { key, chosen_type } => {
            let chosen = chosen_type
                .as_deref()
                .map(|raw| TypeTag::parse(raw).with_context(|| format!("unknown type '{raw}'")))
                .transpose()?;
            if matches!(StrategyKind::from_key(&key), Some(StrategyKind::SingleType { .. }))
                && chosen.is_none()
            {
                anyhow::bail!("the single-type strategy needs --type <TYPE>");
            }
            let profile = manager.select_strategy(&key, chosen)?;
            println!("Active strategy: {} ({}).", profile.name, profile.description);
        }

        Commands::ClearStrategy => {
            manager.clear_strategy()?;
            println!("Strategy cleared.");
        }

        Commands::Suggest { reference } => {
            let catalog = load_catalog(&home, &config)?;
            let pipeline = RecommendationPipeline::new(config.limits);
            let roster = manager.roster();

            match reference {
                Some(query) => {
                    let reference = roster
                        .members()
                        .find(|m| m.id.to_string() == query || m.name.eq_ignore_ascii_case(&query))
                        .or_else(|| catalog.find(&query))
                        .with_context(|| format!("no member matches '{query}'"))?;
                    println!("Partners for {reference}:");
                    let ranked = pipeline.recommend_for_reference(roster, reference, catalog.members());
                    print_recommendations(&ranked);
                }
                None => {
                    let strategy = match manager.active_strategy() {
                        Some(profile) => profile.clone(),
                        None => StrategyCatalog::get(&config.default_strategy)?,
                    };
                    println!("Suggestions for {}:", strategy.name);
                    let (ranked, summary) =
                        pipeline.recommend_for_strategy(roster, &strategy, catalog.members());
                    print_recommendations(&ranked);

                    if !summary.coverage.weaknesses_uncovered.is_empty() {
                        println!("\nUncovered weaknesses: {}", join_types(&summary.coverage.weaknesses_uncovered));
                    }
                    if !summary.warnings.is_empty() {
                        println!("\nWarnings:");
                        for warning in &summary.warnings {
                            println!("  ! {warning}");
                        }
                    }
                    if !summary.tips.is_empty() {
                        println!("\nTips:");
                        for tip in &summary.tips {
                            println!("  - {tip}");
                        }
                    }
                }
            }
        }

        Commands::Analyze => {
            let roster = manager.roster();
            let analysis = analyze_roster(roster);
            let coverage = coverage_report(roster);

            print_roster(roster);
            println!("\nCommon weaknesses: {}", join_types(&analysis.common_weaknesses));
            println!("Common resistances: {}", join_types(&analysis.common_strengths));
            println!("Uncovered weaknesses: {}", join_types(&coverage.weaknesses_uncovered));
            println!("\nRoles:");
            for role in Role::ALL {
                let count = coverage.role_balance.get(&role).copied().unwrap_or(0);
                println!("  {:<12} {count}", role.label());
            }
            if !analysis.recommendations.is_empty() {
                println!("\nNotes:");
                for note in &analysis.recommendations {
                    println!("  - {note}");
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Startup helpers
// ---------------------------------------------------------------------------

/// Pick the directory holding config/. An explicit `--home` wins; a working
/// directory with config/ or defaults/ is used as-is; otherwise the
/// platform data directory, seeded with the shipped defaults.
fn resolve_home(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    let cwd = std::env::current_dir().context("failed to read working directory")?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }

    let dirs = ProjectDirs::from("", "", "teamsynergy")
        .context("could not determine a data directory for this platform")?;
    let home = dirs.data_dir().to_path_buf();
    let defaults = home.join("defaults");
    std::fs::create_dir_all(&defaults)
        .with_context(|| format!("failed to create {}", defaults.display()))?;
    let seeded = defaults.join(CONFIG_FILE);
    if !seeded.exists() {
        std::fs::write(&seeded, DEFAULT_CONFIG)
            .with_context(|| format!("failed to write {}", seeded.display()))?;
    }
    Ok(home)
}

fn init_tracing(home: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = home.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("teamsynergy.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("teamsynergy=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

fn load_catalog(home: &Path, config: &Config) -> anyhow::Result<Catalog> {
    let path = home.join(&config.catalog_path);
    let catalog = catalog::load_catalog(&path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))?;
    info!("Loaded {} catalog members", catalog.len());
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_roster(roster: &Roster) {
    for (index, slot) in roster.slots.iter().enumerate() {
        match slot {
            Some(member) => println!(
                "  [{index}] {member}  {}",
                Role::classify(&member.stats).label()
            ),
            None => println!("  [{index}] (empty)"),
        }
    }

    let stats = roster.stats();
    if stats.size > 0 {
        let avg = stats.average_stats;
        println!(
            "  avg  HP {} / Atk {} / Def {} / SpA {} / SpD {} / Spe {}",
            avg.hp, avg.attack, avg.defense, avg.sp_attack, avg.sp_defense, avg.speed
        );
    }
}

fn print_recommendations(ranked: &[Recommendation]) {
    if ranked.is_empty() {
        println!("  No candidates.");
        return;
    }
    for (rank, rec) in ranked.iter().enumerate() {
        let tags: Vec<&str> = rec.tags.iter().map(|t| t.label()).collect();
        println!(
            "{:>3}. {:>3}  {}  [{}]  {}",
            rank + 1,
            rec.score,
            rec.member,
            rec.role.label(),
            tags.join(", ")
        );
        for reason in &rec.reasons {
            println!("         - {reason}");
        }
    }
}

fn join_types(types: &[TypeTag]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ")
}
