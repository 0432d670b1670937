//! Ability templates
//!
//! Templates are immutable once loaded and live in an [`AbilityCatalog`];
//! characters refer to them by [`AbilityId`].

use serde::{Deserialize, Serialize};

use crate::area::AreaOfEffect;
use crate::character::{Attribute, Character};
use crate::content::ContentError;
use crate::dice::DiceRoll;
use crate::status::{Condition, StatusApplication};

/// Index into an [`AbilityCatalog`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    #[default]
    Attack,
    Spell,
    Support,
    Utility,
}

/// What the rolled amount does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    Necrotic,
    Radiant,
    Psychic,
    Healing,
}

/// Minimum rank in a named tech tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechRequirement {
    pub tree: String,
    pub rank: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTemplate {
    /// Stable content key, e.g. `"fireball"`
    pub key: String,
    pub name: String,
    pub ap_cost: u32,
    pub memory_cost: u32,
    pub category: ActionCategory,
    pub range: u32,
    pub area: AreaOfEffect,
    pub dice: Option<DiceRoll>,
    /// Attribute whose modifier is added to the roll (and sets the save DC)
    pub scaling: Option<Attribute>,
    pub effect: EffectKind,
    /// Attribute the recipient saves with
    pub save: Option<Attribute>,
    pub inflicts: Vec<StatusApplication>,
    pub min_level: u32,
    pub requirement: Option<TechRequirement>,
    /// Turns before the ability is off cooldown
    pub cooldown: u32,
    /// Declared defensive capability
    pub defensive: bool,
}

impl AbilityTemplate {
    pub fn is_healing(&self) -> bool {
        self.effect == EffectKind::Healing
    }

    pub fn is_area(&self) -> bool {
        self.area.is_area()
    }

    /// Heals, buffs the caster, or is tagged defensive
    pub fn is_defensive(&self) -> bool {
        let self_buff = self.area == AreaOfEffect::SelfOnly
            && !self.inflicts.is_empty()
            && self.inflicts.iter().all(|s| !s.condition.is_harmful());
        self.defensive || self.is_healing() || self_buff
    }

    /// Deals non-healing damage or disables the target
    pub fn is_offensive(&self) -> bool {
        let damaging = !self.is_healing() && self.dice.is_some();
        let disabling = self.inflicts.iter().any(|s| {
            matches!(
                s.condition,
                Condition::Stunned | Condition::Paralyzed | Condition::Poisoned
            )
        });
        damaging || disabling
    }

    /// Attribute bonus the user adds to the roll
    pub fn attribute_bonus(&self, user: &Character) -> i32 {
        self.scaling.map(|a| user.modifier(a)).unwrap_or(0)
    }

    /// Mean rolled amount for this user
    pub fn expected_value(&self, user: &Character) -> f32 {
        match self.dice {
            Some(dice) => dice.average() + self.attribute_bonus(user) as f32,
            None => 0.0,
        }
    }

    /// 10 + the user's modifier in the scaling attribute (Intelligence if none)
    pub fn save_dc(&self, user: &Character) -> i32 {
        10 + user.modifier(self.scaling.unwrap_or(Attribute::Intelligence))
    }
}

/// Arena of loaded ability templates
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    templates: Vec<AbilityTemplate>,
}

impl AbilityCatalog {
    /// Build a catalog; keys must be unique
    pub fn new(templates: Vec<AbilityTemplate>) -> Result<Self, ContentError> {
        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.key == template.key) {
                return Err(ContentError::DuplicateAbility(template.key.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Look up a template. Ids are only handed out by this catalog.
    pub fn get(&self, id: AbilityId) -> &AbilityTemplate {
        &self.templates[id.0 as usize]
    }

    pub fn id_of(&self, key: &str) -> Option<AbilityId> {
        self.templates
            .iter()
            .position(|t| t.key == key)
            .map(|i| AbilityId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityId, &AbilityTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, t)| (AbilityId(i as u32), t))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, CharacterId};

    fn fireball() -> AbilityTemplate {
        AbilityTemplate {
            key: "fireball".into(),
            name: "Fireball".into(),
            ap_cost: 3,
            area: AreaOfEffect::Radius(1),
            dice: Some(DiceRoll::new(3, 6, 0)),
            scaling: Some(Attribute::Intelligence),
            effect: EffectKind::Fire,
            save: Some(Attribute::Dexterity),
            ..Default::default()
        }
    }

    #[test]
    fn test_classification() {
        let heal = AbilityTemplate {
            key: "mend".into(),
            dice: Some(DiceRoll::new(2, 4, 2)),
            effect: EffectKind::Healing,
            ..Default::default()
        };
        let ward = AbilityTemplate {
            key: "ward".into(),
            area: AreaOfEffect::SelfOnly,
            inflicts: vec![StatusApplication { condition: Condition::Shielded, duration: 2 }],
            ..Default::default()
        };
        let hex = AbilityTemplate {
            key: "venom".into(),
            inflicts: vec![StatusApplication { condition: Condition::Poisoned, duration: 3 }],
            ..Default::default()
        };

        assert!(fireball().is_offensive());
        assert!(!fireball().is_defensive());
        assert!(heal.is_defensive() && !heal.is_offensive());
        assert!(ward.is_defensive() && !ward.is_offensive());
        assert!(hex.is_offensive());
    }

    #[test]
    fn test_expected_value_and_dc() {
        let mage = Character::new(CharacterId(0), "Mage").with_attributes(Attributes {
            intelligence: 16,
            ..Default::default()
        });
        assert_eq!(fireball().expected_value(&mage), 13.5);
        assert_eq!(fireball().save_dc(&mage), 13);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        assert!(matches!(
            AbilityCatalog::new(vec![fireball(), fireball()]),
            Err(ContentError::DuplicateAbility(key)) if key == "fireball"
        ));
        let catalog = AbilityCatalog::new(vec![fireball()]).unwrap();
        assert_eq!(catalog.id_of("fireball"), Some(AbilityId(0)));
        assert_eq!(catalog.get(AbilityId(0)).name, "Fireball");
        assert_eq!(catalog.id_of("missing"), None);
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "key": "cone_of_cold",
            "name": "Cone of Cold",
            "ap_cost": 3,
            "area": "3-hex cone",
            "dice": "2d8+1",
            "effect": "cold",
            "save": "constitution"
        }"#;
        let template: AbilityTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.area, AreaOfEffect::Cone(3));
        assert_eq!(template.dice, Some(DiceRoll::new(2, 8, 1)));
        assert_eq!(template.save, Some(Attribute::Constitution));
        assert_eq!(template.cooldown, 0);
    }
}
