use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A region of the canvas that text items are positioned against.
///
/// Width and height are expected to be non-negative but this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VerticalReference {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HorizontalReference {
    Left,
    Right,
}

/// Placement of an item measured from one vertical and one horizontal edge
/// of a [`Rectangle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub vertical_reference: VerticalReference,
    pub vertical_offset: i32,
    pub horizontal_reference: HorizontalReference,
    pub horizontal_offset: i32,
}

impl Position {
    pub fn new(
        vertical_reference: VerticalReference,
        vertical_offset: i32,
        horizontal_reference: HorizontalReference,
        horizontal_offset: i32,
    ) -> Self {
        Self {
            vertical_reference,
            vertical_offset,
            horizontal_reference,
            horizontal_offset,
        }
    }
}

/// Absolute top-left origin for an item of `item_width` x `item_height`
/// placed inside `rectangle` according to `position`.
///
/// The result is not clamped to the rectangle or the canvas: oversized items
/// or large offsets may produce coordinates outside both. Sums beyond the
/// `i32` range saturate at `i32::MIN`/`i32::MAX`, which is off any canvas.
pub fn resolve_origin(
    rectangle: &Rectangle,
    position: &Position,
    item_width: i32,
    item_height: i32,
) -> (i32, i32) {
    let y = match position.vertical_reference {
        VerticalReference::Top => rectangle.y as i64 + position.vertical_offset as i64,
        VerticalReference::Bottom => {
            rectangle.y as i64 + rectangle.height as i64 - item_height as i64
                + position.vertical_offset as i64
        }
    };

    let x = match position.horizontal_reference {
        HorizontalReference::Left => rectangle.x as i64 + position.horizontal_offset as i64,
        HorizontalReference::Right => {
            rectangle.x as i64 + rectangle.width as i64 - item_width as i64
                + position.horizontal_offset as i64
        }
    };

    (saturate(x), saturate(y))
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

const VERTICAL_NAMES: [(VerticalReference, &str); 2] = [
    (VerticalReference::Top, "Top"),
    (VerticalReference::Bottom, "Bottom"),
];

const HORIZONTAL_NAMES: [(HorizontalReference, &str); 2] = [
    (HorizontalReference::Left, "Left"),
    (HorizontalReference::Right, "Right"),
];

impl VerticalReference {
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalReference::Top => "Top",
            VerticalReference::Bottom => "Bottom",
        }
    }
}

impl HorizontalReference {
    pub fn as_str(self) -> &'static str {
        match self {
            HorizontalReference::Left => "Left",
            HorizontalReference::Right => "Right",
        }
    }
}

impl FromStr for VerticalReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VERTICAL_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(variant, _)| *variant)
            .ok_or_else(|| format!("Unknown vertical reference '{s}', expected Top or Bottom"))
    }
}

impl FromStr for HorizontalReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HORIZONTAL_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(variant, _)| *variant)
            .ok_or_else(|| format!("Unknown horizontal reference '{s}', expected Left or Right"))
    }
}

impl TryFrom<String> for VerticalReference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for HorizontalReference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VerticalReference> for String {
    fn from(value: VerticalReference) -> Self {
        value.as_str().to_string()
    }
}

impl From<HorizontalReference> for String {
    fn from(value: HorizontalReference) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VerticalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HorizontalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
