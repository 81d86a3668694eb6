//! Rule sets sharing the sweep / reconcile / commit protocol.

mod life;
mod predator_prey;
mod segregation;
mod sugarscape;

pub use life::*;
pub use predator_prey::*;
pub use segregation::*;
pub use sugarscape::*;

use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Color, Label, Position, Sweep};

/// Named parameter map exchanged with configuration files.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Rule set construction errors.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Unknown rule variant: {0}")]
    UnknownVariant(String),
    #[error("Invalid parameters for {variant}: {source}")]
    InvalidParameters {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Parameter {name} for {variant} is out of range: {reason}")]
    OutOfRange {
        variant: &'static str,
        name: &'static str,
        reason: String,
    },
    #[error("Label {label} at ({row}, {col}) is not used by {variant}")]
    LabelNotInAlphabet {
        label: Label,
        variant: &'static str,
        row: usize,
        col: usize,
    },
}

/// The closed set of rule variants.
#[derive(Debug, Clone)]
pub enum Rules {
    Life(LifeRules),
    Segregation(SegregationRules),
    PredatorPrey(PredatorPreyRules),
    Sugarscape(SugarscapeRules),
}

impl Rules {
    /// Look up a variant by name and build it from `parameters`.
    ///
    /// Names are matched ignoring case, spaces, `_` and `-`, so
    /// `"Predator Prey"` and `"predator_prey"` are the same variant.
    pub fn from_parameters(variant: &str, parameters: &Parameters) -> Result<Self, RuleError> {
        let key: String = variant
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        let rules = match key.as_str() {
            "life" | "gameoflife" => {
                Rules::Life(LifeRules::new(parse(LifeRules::ID, parameters)?)?)
            }
            "segregation" | "schelling" => {
                Rules::Segregation(SegregationRules::new(parse(SegregationRules::ID, parameters)?)?)
            }
            "predatorprey" | "wator" => {
                let config = parse(PredatorPreyRules::ID, parameters)?;
                Rules::PredatorPrey(PredatorPreyRules::new(config))
            }
            "sugarscape" => {
                Rules::Sugarscape(SugarscapeRules::new(parse(SugarscapeRules::ID, parameters)?)?)
            }
            _ => return Err(RuleError::UnknownVariant(variant.to_string())),
        };
        Ok(rules)
    }

    /// Per-cell step of the sweep.
    pub fn apply<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        match self {
            Rules::Life(rules) => rules.apply(pos, sweep),
            Rules::Segregation(rules) => rules.apply(pos, sweep),
            Rules::PredatorPrey(rules) => rules.apply(pos, sweep),
            Rules::Sugarscape(rules) => rules.apply(pos, sweep),
        }
    }

    /// Runs once after the last cell, before commit.
    pub fn end_of_sweep<R: Rng + ?Sized>(&mut self, sweep: &mut Sweep<'_, R>) {
        match self {
            Rules::Life(_) => {}
            Rules::Segregation(rules) => rules.end_of_sweep(sweep),
            Rules::PredatorPrey(rules) => rules.end_of_sweep(),
            Rules::Sugarscape(rules) => rules.end_of_sweep(),
        }
    }

    /// Stable identifier, accepted back by [`Rules::from_parameters`].
    pub fn id(&self) -> &'static str {
        match self {
            Rules::Life(_) => LifeRules::ID,
            Rules::Segregation(_) => SegregationRules::ID,
            Rules::PredatorPrey(_) => PredatorPreyRules::ID,
            Rules::Sugarscape(_) => SugarscapeRules::ID,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Rules::Life(_) => "Game of Life",
            Rules::Segregation(_) => "Segregation",
            Rules::PredatorPrey(_) => "Predator Prey",
            Rules::Sugarscape(_) => "Sugarscape",
        }
    }

    /// Labels this variant reads and writes.
    pub fn alphabet(&self) -> &'static [Label] {
        match self {
            Rules::Life(_) => LifeRules::ALPHABET,
            Rules::Segregation(_) => SegregationRules::ALPHABET,
            Rules::PredatorPrey(_) => PredatorPreyRules::ALPHABET,
            Rules::Sugarscape(_) => SugarscapeRules::ALPHABET,
        }
    }

    pub fn display_attribute(&self, label: Label) -> Color {
        let color = match self {
            Rules::Life(_) => LifeRules::color(label),
            Rules::Segregation(_) => SegregationRules::color(label),
            Rules::PredatorPrey(_) => PredatorPreyRules::color(label),
            Rules::Sugarscape(_) => SugarscapeRules::color(label),
        };
        color.unwrap_or(Color::ERROR)
    }

    /// Current parameter values.
    pub fn parameters(&self) -> Parameters {
        match self {
            Rules::Life(rules) => export(rules.config()),
            Rules::Segregation(rules) => export(rules.config()),
            Rules::PredatorPrey(rules) => export(&rules.config()),
            Rules::Sugarscape(rules) => export(rules.config()),
        }
    }
}

fn parse<T: DeserializeOwned>(
    variant: &'static str,
    parameters: &Parameters,
) -> Result<T, RuleError> {
    serde_json::from_value(serde_json::Value::Object(parameters.clone()))
        .map_err(|source| RuleError::InvalidParameters { variant, source })
}

fn export<T: Serialize>(config: &T) -> Parameters {
    match serde_json::to_value(config) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => Parameters::new(),
    }
}
