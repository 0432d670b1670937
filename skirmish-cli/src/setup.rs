//! Loading content and settings shared by every command

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use skirmish_arena::BattleConfig;
use skirmish_core::{AbilityCatalog, Character, CharacterId, Roster};

#[derive(Args)]
pub struct SetupArgs {
    /// Ability catalog JSON file
    #[arg(long, value_name = "FILE", default_value = "data/abilities.json")]
    pub abilities: PathBuf,

    /// First team's roster JSON file
    #[arg(long, value_name = "FILE")]
    pub team_a: PathBuf,

    /// Second team's roster JSON file
    #[arg(long, value_name = "FILE")]
    pub team_b: PathBuf,

    /// Battle settings JSON file (flags below take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rounds before the battle is a draw
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Battlefield width in columns
    #[arg(long)]
    pub width: Option<i32>,

    /// Battlefield height in rows
    #[arg(long)]
    pub height: Option<i32>,
}

/// Everything a command needs to start battling
pub struct Setup {
    pub catalog: AbilityCatalog,
    pub team_a_name: String,
    pub team_b_name: String,
    pub team_a: Vec<Character>,
    pub team_b: Vec<Character>,
    pub config: BattleConfig,
}

impl Setup {
    /// Character names by id, across both teams
    pub fn names(&self) -> BTreeMap<CharacterId, String> {
        self.team_a
            .iter()
            .chain(&self.team_b)
            .map(|c| (c.id, c.name.clone()))
            .collect()
    }
}

pub fn load(args: &SetupArgs) -> Result<Setup> {
    let catalog = AbilityCatalog::load(&args.abilities)
        .with_context(|| format!("Failed to load abilities: {}", args.abilities.display()))?;

    let roster_a = load_roster(&args.team_a)?;
    let roster_b = load_roster(&args.team_b)?;
    let team_a = roster_a
        .instantiate(&catalog, 0)
        .with_context(|| format!("Invalid roster: {}", args.team_a.display()))?;
    let team_b = roster_b
        .instantiate(&catalog, team_a.len() as u32)
        .with_context(|| format!("Invalid roster: {}", args.team_b.display()))?;

    let config = load_config(args)?;
    tracing::info!(
        "Loaded {} abilities, {} ({}) vs {} ({})",
        catalog.len(),
        roster_a.name,
        team_a.len(),
        roster_b.name,
        team_b.len()
    );

    Ok(Setup {
        catalog,
        team_a_name: roster_a.name,
        team_b_name: roster_b.name,
        team_a,
        team_b,
        config,
    })
}

fn load_roster(path: &Path) -> Result<Roster> {
    Roster::load(path).with_context(|| format!("Failed to load roster: {}", path.display()))
}

/// Config file (or defaults), then explicit flags
fn load_config(args: &SetupArgs) -> Result<BattleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => BattleConfig::default(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_rounds) = args.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }
    let width = args.width.unwrap_or(config.battlefield_width);
    let height = args.height.unwrap_or(config.battlefield_height);
    Ok(config.with_battlefield(width, height))
}
