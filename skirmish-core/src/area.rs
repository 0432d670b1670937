//! Area-of-effect shapes
//!
//! Ability data describes its area as free text ("radius 2", "15ft cone",
//! "line of 4"). The text is classified once when the content is loaded and
//! from then on the engine only sees the closed [`AreaOfEffect`] variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::{nearest_direction, Hex, DIRECTIONS};

const DEFAULT_RADIUS: u32 = 1;
const DEFAULT_CONE: u32 = 1;
const DEFAULT_LINE: u32 = 3;
const DEFAULT_SQUARE: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AreaOfEffect {
    SelfOnly,
    #[default]
    Single,
    Radius(u32),
    /// Approximated as `Radius(n / 2)`
    Square(u32),
    Line(u32),
    /// Triangular spread, not a true angular cone
    Cone(u32),
}

impl AreaOfEffect {
    /// Classify a descriptor string. Unknown descriptors become `Single`.
    pub fn from_descriptor(descriptor: &str) -> Self {
        let text = descriptor.to_ascii_lowercase();
        let number = first_number(&text);

        if text.contains("self") {
            AreaOfEffect::SelfOnly
        } else if text.contains("radius") || text.contains("burst") || text.contains("sphere") {
            AreaOfEffect::Radius(number.unwrap_or(DEFAULT_RADIUS))
        } else if text.contains("square") || text.contains("cube") {
            AreaOfEffect::Square(number.unwrap_or(DEFAULT_SQUARE))
        } else if text.contains("line") {
            AreaOfEffect::Line(number.unwrap_or(DEFAULT_LINE))
        } else if text.contains("cone") {
            AreaOfEffect::Cone(number.unwrap_or(DEFAULT_CONE))
        } else {
            AreaOfEffect::Single
        }
    }

    /// Whether this shape can hit more than one cell
    pub fn is_area(&self) -> bool {
        !matches!(self, AreaOfEffect::SelfOnly | AreaOfEffect::Single)
    }

    /// Cells covered when centred on `anchor`.
    ///
    /// `facing` is an axial delta (usually anchor minus caster) and only
    /// matters for lines and cones; it is snapped to one of the six
    /// directions. Cells are not clipped to any battlefield.
    pub fn resolve(&self, anchor: Hex, facing: Option<(i32, i32)>) -> Vec<Hex> {
        let direction = facing.map(nearest_direction).unwrap_or(0);
        match *self {
            AreaOfEffect::SelfOnly | AreaOfEffect::Single => vec![anchor],
            AreaOfEffect::Radius(n) => hex_range(anchor, n),
            AreaOfEffect::Square(n) => hex_range(anchor, n / 2),
            AreaOfEffect::Line(n) => {
                let mut cells = vec![anchor];
                for step in 1..n as i32 {
                    cells.push(anchor.step(direction, step));
                }
                cells
            }
            AreaOfEffect::Cone(n) => cone(anchor, direction, n),
        }
    }
}

/// All hexes within `radius` of `center`, inclusive
fn hex_range(center: Hex, radius: u32) -> Vec<Hex> {
    let n = radius as i32;
    let mut cells = Vec::new();
    for dq in -n..=n {
        let lo = (-n).max(-dq - n);
        let hi = n.min(-dq + n);
        for dr in lo..=hi {
            cells.push(Hex::new(center.q + dq, center.r + dr));
        }
    }
    cells
}

/// Row k of the cone is the arc of the distance-k ring between the two
/// directions adjacent to `direction`, so it holds 2k + 1 cells.
fn cone(anchor: Hex, direction: usize, length: u32) -> Vec<Hex> {
    let (dq, dr) = DIRECTIONS[direction % 6];
    let (lq, lr) = DIRECTIONS[(direction + 5) % 6];
    let (rq, rr) = DIRECTIONS[(direction + 1) % 6];
    let mut cells = vec![anchor];
    for k in 1..=length as i32 {
        let center = Hex::new(anchor.q + dq * k, anchor.r + dr * k);
        cells.push(center);
        for j in 1..=k {
            cells.push(Hex::new(center.q + (lq - dq) * j, center.r + (lr - dr) * j));
            cells.push(Hex::new(center.q + (rq - dq) * j, center.r + (rr - dr) * j));
        }
    }
    cells
}

fn first_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl From<String> for AreaOfEffect {
    fn from(value: String) -> Self {
        AreaOfEffect::from_descriptor(&value)
    }
}

impl From<AreaOfEffect> for String {
    fn from(value: AreaOfEffect) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AreaOfEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaOfEffect::SelfOnly => write!(f, "self"),
            AreaOfEffect::Single => write!(f, "single"),
            AreaOfEffect::Radius(n) => write!(f, "radius {n}"),
            AreaOfEffect::Square(n) => write!(f, "square {n}"),
            AreaOfEffect::Line(n) => write!(f, "line {n}"),
            AreaOfEffect::Cone(n) => write!(f, "cone {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_classification() {
        assert_eq!(AreaOfEffect::from_descriptor("Self"), AreaOfEffect::SelfOnly);
        assert_eq!(AreaOfEffect::from_descriptor("single target"), AreaOfEffect::Single);
        assert_eq!(AreaOfEffect::from_descriptor("Radius 2"), AreaOfEffect::Radius(2));
        assert_eq!(AreaOfEffect::from_descriptor("radius"), AreaOfEffect::Radius(1));
        assert_eq!(AreaOfEffect::from_descriptor("cone"), AreaOfEffect::Cone(1));
        assert_eq!(AreaOfEffect::from_descriptor("line"), AreaOfEffect::Line(3));
        assert_eq!(AreaOfEffect::from_descriptor("square"), AreaOfEffect::Square(3));
        assert_eq!(AreaOfEffect::from_descriptor("a 4-hex line"), AreaOfEffect::Line(4));
        assert_eq!(AreaOfEffect::from_descriptor("whatever"), AreaOfEffect::Single);
    }

    #[test]
    fn test_serde_uses_descriptor_text() {
        let area: AreaOfEffect = serde_json::from_str("\"cone 3\"").unwrap();
        assert_eq!(area, AreaOfEffect::Cone(3));
        assert_eq!(serde_json::to_string(&area).unwrap(), "\"cone 3\"");
    }

    #[test]
    fn test_single_and_self() {
        let anchor = Hex::new(3, 1);
        assert_eq!(AreaOfEffect::Single.resolve(anchor, None), vec![anchor]);
        assert_eq!(AreaOfEffect::SelfOnly.resolve(anchor, Some((1, 0))), vec![anchor]);
    }

    #[test]
    fn test_radius() {
        let anchor = Hex::new(0, 0);
        assert_eq!(AreaOfEffect::Radius(0).resolve(anchor, None).len(), 1);
        assert_eq!(AreaOfEffect::Radius(1).resolve(anchor, None).len(), 7);
        let cells = AreaOfEffect::Radius(2).resolve(anchor, None);
        assert_eq!(cells.len(), 19);
        assert!(cells.iter().all(|c| anchor.distance_to(*c) <= 2));
    }

    #[test]
    fn test_square_is_half_radius() {
        let anchor = Hex::new(2, 2);
        assert_eq!(
            AreaOfEffect::Square(4).resolve(anchor, None),
            AreaOfEffect::Radius(2).resolve(anchor, None)
        );
        assert_eq!(AreaOfEffect::Square(1).resolve(anchor, None), vec![anchor]);
    }

    #[test]
    fn test_line_follows_snapped_direction() {
        let anchor = Hex::new(0, 0);
        let cells = AreaOfEffect::Line(3).resolve(anchor, Some((0, -5)));
        assert_eq!(cells, vec![anchor, Hex::new(0, -1), Hex::new(0, -2)]);

        let default_facing = AreaOfEffect::Line(2).resolve(anchor, None);
        assert_eq!(default_facing, vec![anchor, Hex::new(1, 0)]);
    }

    #[test]
    fn test_cone_widens() {
        let anchor = Hex::new(0, 0);
        let cells = AreaOfEffect::Cone(2).resolve(anchor, Some((1, 0)));
        // 1 + 3 + 5
        assert_eq!(cells.len(), 9);
        for k in 1..=2u32 {
            let row = cells.iter().filter(|c| anchor.distance_to(**c) == k).count();
            assert_eq!(row as u32, 2 * k + 1);
        }
        // Nothing behind the caster side
        assert!(cells.iter().all(|c| c.q >= 0));
    }
}
