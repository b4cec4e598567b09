use std::fmt;
use std::ops::{Div, Mul};

const BASE_NAMES: [&str; 6] = ["mass", "volume", "time", "amount", "equivalent", "count"];

/// Exponents over the base dimensions {mass, volume, time, amount, equivalent, count}.
///
/// Mass fractions, percent and the radionuclide activity units are all
/// dimensionless scalings, so they share [`Dimension::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension([i8; 6]);

impl Dimension {
    pub const NONE: Self = Self([0, 0, 0, 0, 0, 0]);
    pub const MASS: Self = Self([1, 0, 0, 0, 0, 0]);
    pub const VOLUME: Self = Self([0, 1, 0, 0, 0, 0]);
    pub const TIME: Self = Self([0, 0, 1, 0, 0, 0]);
    pub const AMOUNT: Self = Self([0, 0, 0, 1, 0, 0]);
    pub const EQUIVALENT: Self = Self([0, 0, 0, 0, 1, 0]);
    pub const COUNT: Self = Self([0, 0, 0, 0, 0, 1]);

    pub const fn new(exponents: [i8; 6]) -> Self {
        Self(exponents)
    }

    pub fn exponents(&self) -> [i8; 6] {
        self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }

    /// Raises every exponent to the `n`th power, saturating at the `i8` bounds.
    pub fn powi(self, n: i8) -> Self {
        Self(self.0.map(|e| e.saturating_mul(n)))
    }

    pub fn recip(self) -> Self {
        self.powi(-1)
    }

    /// `None` when an exponent leaves the `i8` range.
    pub fn checked_powi(self, n: i8) -> Option<Self> {
        let mut exponents = self.0;
        for e in exponents.iter_mut() {
            *e = e.checked_mul(n)?;
        }
        Some(Self(exponents))
    }

    pub fn checked_mul(self, rhs: Dimension) -> Option<Self> {
        let mut exponents = self.0;
        for (e, r) in exponents.iter_mut().zip(rhs.0) {
            *e = e.checked_add(r)?;
        }
        Some(Self(exponents))
    }

    pub fn checked_div(self, rhs: Dimension) -> Option<Self> {
        self.checked_mul(rhs.checked_powi(-1)?)
    }
}

/// Saturating; a saturated exponent never matches a real dimension, so the
/// next compatibility check rejects it.
impl Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Dimension) -> Dimension {
        let mut exponents = self.0;
        for (e, r) in exponents.iter_mut().zip(rhs.0) {
            *e = e.saturating_add(r);
        }
        Dimension(exponents)
    }
}

impl Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.recip()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }
        let render = |positive: bool| -> Vec<String> {
            BASE_NAMES
                .iter()
                .zip(self.0)
                .filter(|(_, e)| if positive { *e > 0 } else { *e < 0 })
                .map(|(name, e)| match e.abs() {
                    1 => format!("[{}]", name),
                    n => format!("[{}]^{}", name, n),
                })
                .collect()
        };
        let numerator = render(true);
        let denominator = render(false);
        let numerator = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(" * ")
        };
        if denominator.is_empty() {
            write!(f, "{}", numerator)
        } else {
            write!(f, "{} / {}", numerator, denominator.join(" / "))
        }
    }
}
