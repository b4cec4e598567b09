use super::dimension::Dimension;
use super::error::UnitError;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul, Neg};

/// A named unit: a scale factor onto the base units (gram, liter, second,
/// mole, equivalent, count) together with its dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    symbol: String,
    factor: f64,
    dimension: Dimension,
}

impl Unit {
    pub fn new(symbol: impl Into<String>, factor: f64, dimension: Dimension) -> Self {
        Self {
            symbol: symbol.into(),
            factor,
            dimension,
        }
    }

    pub fn dimensionless() -> Self {
        Self::new("", 1.0, Dimension::NONE)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub fn powi(&self, n: i8) -> Unit {
        Unit::new(self.power_symbol(n), self.factor.powi(n as i32), self.dimension.powi(n))
    }

    /// Like [`powi`](Self::powi), but `None` when an exponent leaves the `i8` range.
    pub fn checked_powi(&self, n: i8) -> Option<Unit> {
        let dimension = self.dimension.checked_powi(n)?;
        Some(Unit::new(self.power_symbol(n), self.factor.powi(n as i32), dimension))
    }

    pub fn checked_mul(&self, rhs: &Unit) -> Option<Unit> {
        let dimension = self.dimension.checked_mul(rhs.dimension)?;
        Some(Unit::new(self.product_symbol(rhs), self.factor * rhs.factor, dimension))
    }

    pub fn checked_div(&self, rhs: &Unit) -> Option<Unit> {
        let dimension = self.dimension.checked_div(rhs.dimension)?;
        Some(Unit::new(self.quotient_symbol(rhs), self.factor / rhs.factor, dimension))
    }

    /// Returns a copy with a new display symbol but the same scale and dimension.
    pub fn renamed(&self, symbol: impl Into<String>) -> Unit {
        Unit::new(symbol, self.factor, self.dimension)
    }

    fn power_symbol(&self, n: i8) -> String {
        match n {
            1 => self.symbol.clone(),
            _ => format!("{}^{}", wrap(&self.symbol), n),
        }
    }

    fn product_symbol(&self, rhs: &Unit) -> String {
        match (self.symbol.is_empty(), rhs.symbol.is_empty()) {
            (true, _) => rhs.symbol.clone(),
            (_, true) => self.symbol.clone(),
            _ => format!("{} * {}", self.symbol, wrap(&rhs.symbol)),
        }
    }

    fn quotient_symbol(&self, rhs: &Unit) -> String {
        match (self.symbol.is_empty(), rhs.symbol.is_empty()) {
            (_, true) => self.symbol.clone(),
            (true, false) => format!("1 / {}", wrap(&rhs.symbol)),
            _ => format!("{} / {}", self.symbol, wrap(&rhs.symbol)),
        }
    }
}

fn wrap(symbol: &str) -> String {
    if symbol.contains([' ', '*', '/']) {
        format!("({})", symbol)
    } else {
        symbol.to_string()
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        Unit::new(
            self.product_symbol(rhs),
            self.factor * rhs.factor,
            self.dimension * rhs.dimension,
        )
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        Unit::new(
            self.quotient_symbol(rhs),
            self.factor / rhs.factor,
            self.dimension / rhs.dimension,
        )
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// A magnitude tagged with its unit.
///
/// Products and quotients always succeed and carry the combined dimension.
/// Sums, differences, comparisons and conversions demand matching dimensions
/// and report [`UnitError::Dimensionality`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    magnitude: f64,
    unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    pub fn dimensionless(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::dimensionless())
    }

    pub fn zero(unit: Unit) -> Self {
        Self::new(0.0, unit)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }

    /// Magnitude expressed in base units.
    pub fn base_magnitude(&self) -> f64 {
        self.magnitude * self.unit.factor
    }

    pub fn to(&self, target: &Unit) -> Result<Quantity, UnitError> {
        self.ensure_compatible("convert", target)?;
        Ok(Quantity::new(
            self.base_magnitude() / target.factor,
            target.clone(),
        ))
    }

    pub fn checked_add(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        self.ensure_compatible("add", &other.unit)?;
        let rhs = other.base_magnitude() / self.unit.factor;
        Ok(Quantity::new(self.magnitude + rhs, self.unit.clone()))
    }

    pub fn checked_sub(&self, other: &Quantity) -> Result<Quantity, UnitError> {
        self.checked_add(&-other)
    }

    pub fn checked_cmp(&self, other: &Quantity) -> Result<Option<Ordering>, UnitError> {
        self.ensure_compatible("compare", &other.unit)?;
        Ok(self.base_magnitude().partial_cmp(&other.base_magnitude()))
    }

    pub fn scale(&self, k: f64) -> Quantity {
        Quantity::new(self.magnitude * k, self.unit.clone())
    }

    /// Sums quantities in the unit of `zero`; an empty iterator yields `zero`.
    pub fn sum<'a, I>(quantities: I, zero: Quantity) -> Result<Quantity, UnitError>
    where
        I: IntoIterator<Item = &'a Quantity>,
    {
        quantities
            .into_iter()
            .try_fold(zero, |acc, q| acc.checked_add(q))
    }

    fn ensure_compatible(&self, operation: &'static str, other: &Unit) -> Result<(), UnitError> {
        if self.unit.is_compatible(other) {
            Ok(())
        } else {
            Err(UnitError::Dimensionality {
                operation,
                left: self.unit.symbol.clone(),
                left_dim: self.unit.dimension,
                right: other.symbol.clone(),
                right_dim: other.dimension,
            })
        }
    }
}

impl Mul for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.magnitude * rhs.magnitude, &self.unit * &rhs.unit)
    }
}

impl Div for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.magnitude / rhs.magnitude, &self.unit / &rhs.unit)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.scale(-1.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.magnitude)?,
            None => write!(f, "{}", self.magnitude)?,
        }
        if !self.unit.symbol.is_empty() {
            write!(f, " {}", self.unit.symbol)?;
        }
        Ok(())
    }
}
