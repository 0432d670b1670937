//! Bounded occupancy grid for one encounter

use crate::character::CharacterId;
use crate::hex::Hex;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Why a placement or move was refused
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{hex:?} lies outside the {width}x{height} battlefield")]
    OutOfBounds { hex: Hex, width: i32, height: i32 },
    #[error("{hex:?} is already occupied by {occupant}")]
    Occupied { hex: Hex, occupant: CharacterId },
    #[error("nobody stands on {0:?}")]
    Vacant(Hex),
}

/// Width x height rectangle of flat-top columns (even-q layout)
/// with at most one occupant per cell.
#[derive(Clone, Debug)]
pub struct Battlefield {
    width: i32,
    height: i32,
    occupants: FxHashMap<Hex, CharacterId>,
}

impl Battlefield {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            occupants: FxHashMap::default(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if this hex is on the battlefield
    pub fn is_valid_position(&self, hex: Hex) -> bool {
        if hex.is_invalid() || hex.q < 0 || hex.q >= self.width {
            return false;
        }
        let (_, row) = hex.to_offset();
        (0..self.height).contains(&row)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.occupants.contains_key(&hex)
    }

    pub fn occupant(&self, hex: Hex) -> Option<CharacterId> {
        self.occupants.get(&hex).copied()
    }

    /// In-bounds neighbors, in direction order
    pub fn neighbors(&self, hex: Hex) -> Vec<Hex> {
        hex.neighbors().filter(|n| self.is_valid_position(*n)).collect()
    }

    /// Every in-bounds cell, column by column
    pub fn cells(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..self.width).flat_map(move |col| (0..self.height).map(move |row| Hex::from_offset(col, row)))
    }

    /// In bounds and unoccupied
    pub fn check_free(&self, hex: Hex) -> Result<(), PlacementError> {
        if !self.is_valid_position(hex) {
            return Err(PlacementError::OutOfBounds {
                hex,
                width: self.width,
                height: self.height,
            });
        }
        if let Some(occupant) = self.occupant(hex) {
            return Err(PlacementError::Occupied { hex, occupant });
        }
        Ok(())
    }

    /// Put a combatant on an empty in-bounds cell
    pub fn place(&mut self, id: CharacterId, hex: Hex) -> Result<(), PlacementError> {
        self.check_free(hex)?;
        self.occupants.insert(hex, id);
        Ok(())
    }

    pub fn remove(&mut self, hex: Hex) -> Option<CharacterId> {
        self.occupants.remove(&hex)
    }

    /// Move whoever stands on `from` to `to`.
    ///
    /// The destination is validated before the source is vacated, so a
    /// refused move leaves the occupant where it was.
    pub fn move_occupant(&mut self, from: Hex, to: Hex) -> Result<CharacterId, PlacementError> {
        let id = self.occupant(from).ok_or(PlacementError::Vacant(from))?;
        if from == to {
            return Ok(id);
        }
        self.check_free(to)?;
        self.occupants.remove(&from);
        self.occupants.insert(to, id);
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
    }

    pub fn occupied_count(&self) -> usize {
        self.occupants.len()
    }

    /// First free cell scanning columns from the left (or right) edge
    pub fn first_free_cell(&self, from_right: bool) -> Option<Hex> {
        let cols: Box<dyn Iterator<Item = i32>> = if from_right {
            Box::new((0..self.width).rev())
        } else {
            Box::new(0..self.width)
        };
        for col in cols {
            for row in 0..self.height {
                let hex = Hex::from_offset(col, row);
                if !self.is_occupied(hex) {
                    return Some(hex);
                }
            }
        }
        None
    }
}
