//! Dice formulas (`2d6+1` style)

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiceParseError {
    #[error("empty dice expression")]
    Empty,
    #[error("malformed dice expression `{0}`")]
    Malformed(String),
}

/// `count` dice with `faces` sides plus a flat modifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    pub count: u32,
    pub faces: u32,
    pub modifier: i32,
}

impl DiceRoll {
    pub const fn new(count: u32, faces: u32, modifier: i32) -> Self {
        Self { count, faces, modifier }
    }

    pub const fn d20() -> Self {
        Self::new(1, 20, 0)
    }

    pub const fn d6() -> Self {
        Self::new(1, 6, 0)
    }

    /// Flat amount, no dice
    pub const fn flat(modifier: i32) -> Self {
        Self::new(0, 0, modifier)
    }

    /// Roll the dice only, without the modifier
    pub fn roll_dice<R: Rng>(&self, rng: &mut R) -> i32 {
        if self.faces == 0 {
            return 0;
        }
        (0..self.count).map(|_| rng.gen_range(1..=self.faces) as i32).sum()
    }

    /// Fresh total, modifier included
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        self.roll_dice(rng) + self.modifier
    }

    pub fn min(&self) -> i32 {
        if self.faces == 0 {
            self.modifier
        } else {
            self.count as i32 + self.modifier
        }
    }

    pub fn max(&self) -> i32 {
        (self.count * self.faces) as i32 + self.modifier
    }

    /// Mean total
    pub fn average(&self) -> f32 {
        if self.faces == 0 {
            return self.modifier as f32;
        }
        self.count as f32 * (self.faces as f32 + 1.0) / 2.0 + self.modifier as f32
    }
}

impl FromStr for DiceRoll {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
        if text.is_empty() {
            return Err(DiceParseError::Empty);
        }
        let malformed = || DiceParseError::Malformed(s.to_string());

        let Some(d) = text.find('d') else {
            // Plain number: flat amount
            let modifier = text.parse::<i32>().map_err(|_| malformed())?;
            return Ok(DiceRoll::flat(modifier));
        };

        let count = match &text[..d] {
            "" => 1,
            n => n.parse::<u32>().map_err(|_| malformed())?,
        };
        let rest = &text[d + 1..];
        let split = rest.find(['+', '-']).unwrap_or(rest.len());
        let faces = rest[..split].parse::<u32>().map_err(|_| malformed())?;
        let modifier = match &rest[split..] {
            "" => 0,
            m => m.parse::<i32>().map_err(|_| malformed())?,
        };
        if faces == 0 {
            return Err(malformed());
        }
        Ok(DiceRoll::new(count, faces, modifier))
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = DiceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceRoll> for String {
    fn from(value: DiceRoll) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.faces == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.faces)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}
