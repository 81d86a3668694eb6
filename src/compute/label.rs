//! Cell state alphabet and display tokens.
//!
//! Every rule set draws its states from the closed [`Label`] alphabet and
//! declares which subset it understands via its `alphabet()`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GridError;

/// A cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Label {
    /// Life: unoccupied.
    Dead,
    /// Life: occupied.
    Alive,
    /// Segregation: no agent.
    Empty,
    /// Segregation: first group.
    Red,
    /// Segregation: second group.
    Blue,
    /// Predator-prey: open water.
    Water,
    /// Predator-prey: prey.
    Fish,
    /// Predator-prey: predator.
    Shark,
    /// Sugarscape: resource patch without an agent.
    Patch,
    /// Sugarscape: resource patch hosting an agent.
    Agent,
}

impl Label {
    /// All labels, in declaration order.
    pub const ALL: [Label; 10] = [
        Label::Dead,
        Label::Alive,
        Label::Empty,
        Label::Red,
        Label::Blue,
        Label::Water,
        Label::Fish,
        Label::Shark,
        Label::Patch,
        Label::Agent,
    ];

    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Dead => "DEAD",
            Label::Alive => "ALIVE",
            Label::Empty => "EMPTY",
            Label::Red => "RED",
            Label::Blue => "BLUE",
            Label::Water => "WATER",
            Label::Fish => "FISH",
            Label::Shark => "SHARK",
            Label::Patch => "PATCH",
            Label::Agent => "AGENT",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GridError::UnknownLabel(s.to_string()))
    }
}

impl TryFrom<String> for Label {
    type Error = GridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Opaque display token handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TEAL: Color = Color::rgb(0, 128, 128);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    /// Returned for labels outside a rule set's alphabet.
    pub const ERROR: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("fish".parse::<Label>().unwrap(), Label::Fish);
        assert_eq!(" Shark ".parse::<Label>().unwrap(), Label::Shark);
        assert_eq!("EMPTY".parse::<Label>().unwrap(), Label::Empty);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "kelp".parse::<Label>(),
            Err(GridError::UnknownLabel(name)) if name == "kelp"
        ));
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Label::Alive).unwrap();
        assert_eq!(json, "\"ALIVE\"");
        let back: Label = serde_json::from_str("\"WATER\"").unwrap();
        assert_eq!(back, Label::Water);
    }

    #[test]
    fn test_serde_accepts_any_case() {
        let cells: Vec<Vec<Label>> =
            serde_json::from_str(r#"[["fish", "Shark", "WATER"]]"#).unwrap();
        assert_eq!(cells, vec![vec![Label::Fish, Label::Shark, Label::Water]]);
        assert!(serde_json::from_str::<Label>("\"kelp\"").is_err());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::TEAL.to_string(), "#008080");
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
    }
}
