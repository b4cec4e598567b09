use super::dimension::Dimension;
use super::error::UnitError;
use super::quantity::{Quantity, Unit};
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Specific-activity constants relating a measured activity concentration to
/// an equivalent mass fraction, per isotope.
pub const I131_SPECIFIC_ACTIVITY: f64 = 1.25e5;
pub const CS137_SPECIFIC_ACTIVITY: f64 = 88.0;
pub const CO58_SPECIFIC_ACTIVITY: f64 = 3.19e4;
pub const CO60_SPECIFIC_ACTIVITY: f64 = 1.13e3;

#[derive(Debug, Clone, Copy)]
struct UnitDef {
    factor: f64,
    dimension: Dimension,
}

const fn def(factor: f64, dimension: Dimension) -> UnitDef {
    UnitDef { factor, dimension }
}

// Base units: gram, liter, second, mole, equivalent, count.
static BUILTIN_UNITS: Map<&'static str, UnitDef> = phf_map! {
    "g" => def(1.0, Dimension::MASS),
    "kg" => def(1.0e3, Dimension::MASS),
    "lb" => def(453.59237, Dimension::MASS),

    "L" => def(1.0, Dimension::VOLUME),
    "mL" => def(1.0e-3, Dimension::VOLUME),
    "gal" => def(3.785411784, Dimension::VOLUME),
    "ft3" => def(28.316846592, Dimension::VOLUME),
    "m3" => def(1.0e3, Dimension::VOLUME),

    "s" => def(1.0, Dimension::TIME),
    "min" => def(60.0, Dimension::TIME),
    "h" => def(3600.0, Dimension::TIME),
    "day" => def(86400.0, Dimension::TIME),

    "mol" => def(1.0, Dimension::AMOUNT),
    "eq" => def(1.0, Dimension::EQUIVALENT),
    "count" => def(1.0, Dimension::COUNT),

    "mass_conc" => def(1.0, Dimension::NONE),
    "percent" => def(1.0e-2, Dimension::NONE),
    "ppm" => def(1.0e-6, Dimension::NONE),
    "ppb" => def(1.0e-9, Dimension::NONE),
    "ppt" => def(1.0e-12, Dimension::NONE),
    "i131" => def(1.0 / (1.0e6 * I131_SPECIFIC_ACTIVITY), Dimension::NONE),
    "cs137" => def(1.0 / (1.0e6 * CS137_SPECIFIC_ACTIVITY), Dimension::NONE),
    "co58" => def(1.0 / (1.0e6 * CO58_SPECIFIC_ACTIVITY), Dimension::NONE),
    "co60" => def(1.0 / (1.0e6 * CO60_SPECIFIC_ACTIVITY), Dimension::NONE),
};

static ALIASES: Map<&'static str, &'static str> = phf_map! {
    "gram" => "g",
    "kilogram" => "kg",
    "pound" => "lb",
    "l" => "L",
    "liter" => "L",
    "litre" => "L",
    "ml" => "mL",
    "gallon" => "gal",
    "gallons" => "gal",
    "cubic_foot" => "ft3",
    "cubic_feet" => "ft3",
    "cubic_meter" => "m3",
    "second" => "s",
    "sec" => "s",
    "minute" => "min",
    "hour" => "h",
    "days" => "day",
    "mole" => "mol",
    "equivalent" => "eq",
    "equivalents" => "eq",
    "%" => "percent",
};

// Derived definitions, applied in order after the built-in table.
const DERIVED_UNITS: [(&str, &str); 2] = [("gpm", "gal / min"), ("density", "g / gal")];

/// An immutable, explicitly constructed unit registry.
///
/// Holds the built-in table plus any derived definitions. Lookups try the
/// exact name, then a known alias, then the lower-cased name.
#[derive(Debug, Clone)]
pub struct UnitSystem {
    derived: HashMap<String, Unit>,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitSystem {
    pub fn new() -> Self {
        let mut system = Self {
            derived: HashMap::new(),
        };
        for (name, expression) in DERIVED_UNITS {
            // The derived table only references built-in names.
            if let Ok(unit) = system.parse(expression) {
                system.derived.insert(name.to_string(), unit.renamed(name));
            }
        }
        system
    }

    /// Returns a new system with `name` defined as the unit expression `expression`.
    pub fn define(mut self, name: &str, expression: &str) -> Result<Self, UnitError> {
        if self.unit(name).is_ok() {
            return Err(UnitError::Redefinition(name.to_string()));
        }
        let unit = self.parse(expression)?.renamed(name);
        self.derived.insert(name.to_string(), unit);
        Ok(self)
    }

    /// Loads additional definitions from a TOML table of `name = "expression"` pairs.
    pub fn load_definitions(self, path: &Path) -> Result<Self, UnitDefinitionsError> {
        let content = std::fs::read_to_string(path).map_err(|e| UnitDefinitionsError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: DefinitionsFile =
            toml::from_str(&content).map_err(|e| UnitDefinitionsError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        let mut system = self;
        let mut names: Vec<_> = file.units.into_iter().collect();
        names.sort();
        for (name, expression) in names {
            system = system.define(&name, &expression)?;
        }
        Ok(system)
    }

    pub fn unit(&self, name: &str) -> Result<Unit, UnitError> {
        let name = name.trim();
        self.lookup(name)
            .or_else(|| self.lookup(&name.to_lowercase()))
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))
    }

    fn lookup(&self, name: &str) -> Option<Unit> {
        if let Some(unit) = self.derived.get(name) {
            return Some(unit.clone());
        }
        let canonical = ALIASES.get(name).copied().unwrap_or(name);
        BUILTIN_UNITS
            .get_entry(canonical)
            .map(|(symbol, d)| Unit::new(*symbol, d.factor, d.dimension))
    }

    /// Parses a unit expression such as `eq / L`, `gal/min` or `ft3 * eq / mol^2`.
    ///
    /// Terms are unit names with an optional integer exponent (`name^n`) or
    /// plain numeric scale factors, joined left to right by `*` and `/`.
    pub fn parse(&self, expression: &str) -> Result<Unit, UnitError> {
        let parse_error = |reason: &str| UnitError::Parse {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let mut result: Option<Unit> = None;
        let mut pending_op = '*';
        let mut term = String::new();

        let apply = |term: &str, op: char, result: &mut Option<Unit>| -> Result<(), UnitError> {
            let term = term.trim();
            if term.is_empty() {
                return Err(parse_error("empty term"));
            }
            let unit = self.parse_term(term, expression)?;
            let combined = match (result.take(), op) {
                (None, '*') => Some(unit),
                (None, _) => Unit::dimensionless().checked_div(&unit),
                (Some(acc), '*') => acc.checked_mul(&unit),
                (Some(acc), _) => acc.checked_div(&unit),
            };
            *result = Some(combined.ok_or_else(|| parse_error("dimension exponent out of range"))?);
            Ok(())
        };

        for c in expression.chars() {
            match c {
                '*' | '/' => {
                    apply(&term, pending_op, &mut result)?;
                    term.clear();
                    pending_op = c;
                }
                _ => term.push(c),
            }
        }
        apply(&term, pending_op, &mut result)?;

        result.ok_or_else(|| parse_error("no units"))
    }

    fn parse_term(&self, term: &str, expression: &str) -> Result<Unit, UnitError> {
        if let Ok(value) = term.parse::<f64>() {
            return Ok(Unit::new(term, value, Dimension::NONE));
        }
        let (name, exponent) = match term.split_once('^') {
            Some((name, exp)) => {
                let exp: i8 = exp.trim().parse().map_err(|_| UnitError::Parse {
                    expression: expression.to_string(),
                    reason: format!("invalid exponent in '{}'", term),
                })?;
                (name.trim(), exp)
            }
            None => (term, 1),
        };
        self.unit(name)?
            .checked_powi(exponent)
            .ok_or_else(|| UnitError::Parse {
                expression: expression.to_string(),
                reason: format!("dimension exponent out of range in '{}'", term),
            })
    }

    /// Builds a quantity from a magnitude and a unit expression.
    pub fn quantity(&self, magnitude: f64, expression: &str) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(magnitude, self.parse(expression)?))
    }

    pub fn convert(&self, quantity: &Quantity, expression: &str) -> Result<Quantity, UnitError> {
        quantity.to(&self.parse(expression)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionsFile {
    units: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum UnitDefinitionsError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Unit(#[from] UnitError),
}
