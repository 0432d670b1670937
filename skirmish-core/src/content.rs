//! Loading ability catalogs and rosters from JSON

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ability::{AbilityCatalog, AbilityTemplate};
use crate::character::{Attributes, Character, CharacterId};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("ability key `{0}` is defined more than once")]
    DuplicateAbility(String),
    #[error("{character} knows unknown ability `{key}`")]
    UnknownAbility { character: String, key: String },
    #[error("{character} needs {used} memory but only has {capacity}")]
    MemoryBudget {
        character: String,
        used: u32,
        capacity: u32,
    },
    #[error("roster `{0}` has no members")]
    EmptyRoster(String),
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl AbilityCatalog {
    /// Load from a JSON file holding either a bare array of templates or
    /// an object with an `abilities` array.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = read(path)?;
        Self::from_json(&content).map_err(|e| match e {
            ContentError::Json { source, .. } => ContentError::Json {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, ContentError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CatalogFile {
            Flat(Vec<AbilityTemplate>),
            Wrapped { abilities: Vec<AbilityTemplate> },
        }

        let file: CatalogFile = serde_json::from_str(content).map_err(|source| ContentError::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        let templates = match file {
            CatalogFile::Flat(t) => t,
            CatalogFile::Wrapped { abilities } => abilities,
        };
        AbilityCatalog::new(templates)
    }
}

/// A character as written in a roster file, abilities named by key
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    /// Current HP; defaults to `max_hp`
    #[serde(default)]
    pub hp: Option<i32>,
    pub max_hp: i32,
    #[serde(default = "default_max_ap")]
    pub max_ap: u32,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default = "default_defense")]
    pub defense: i32,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub tech: BTreeMap<String, u32>,
    #[serde(default = "default_memory")]
    pub memory_capacity: u32,
}

fn default_level() -> u32 {
    1
}
fn default_max_ap() -> u32 {
    4
}
fn default_speed() -> u32 {
    3
}
fn default_defense() -> i32 {
    10
}
fn default_memory() -> u32 {
    10
}

impl CharacterSheet {
    /// Resolve ability keys and check the memory budget
    pub fn to_character(&self, id: CharacterId, catalog: &AbilityCatalog) -> Result<Character, ContentError> {
        let mut abilities = Vec::with_capacity(self.abilities.len());
        let mut used = 0;
        for key in &self.abilities {
            let ability = catalog.id_of(key).ok_or_else(|| ContentError::UnknownAbility {
                character: self.name.clone(),
                key: key.clone(),
            })?;
            used += catalog.get(ability).memory_cost;
            abilities.push(ability);
        }
        if used > self.memory_capacity {
            return Err(ContentError::MemoryBudget {
                character: self.name.clone(),
                used,
                capacity: self.memory_capacity,
            });
        }

        let mut character = Character::new(id, self.name.clone())
            .with_level(self.level)
            .with_max_ap(self.max_ap)
            .with_defense(self.defense)
            .with_attributes(self.attributes)
            .with_abilities(abilities)
            .with_hp(self.hp.unwrap_or(self.max_hp), self.max_hp);
        character.experience = self.experience;
        character.speed = self.speed;
        character.tech = self.tech.clone();
        character.memory_capacity = self.memory_capacity;
        Ok(character)
    }
}

/// A named team of characters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    pub name: String,
    pub members: Vec<CharacterSheet>,
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build characters with consecutive ids starting at `first_id`
    pub fn instantiate(&self, catalog: &AbilityCatalog, first_id: u32) -> Result<Vec<Character>, ContentError> {
        if self.members.is_empty() {
            return Err(ContentError::EmptyRoster(self.name.clone()));
        }
        self.members
            .iter()
            .enumerate()
            .map(|(i, sheet)| sheet.to_character(CharacterId(first_id + i as u32), catalog))
            .collect()
    }
}
