use bigdecimal::{BigDecimal, ParseBigDecimalError};
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign};
const SCALE: i64 = 10_000;

#[derive(Debug, Clone, Copy, Default)]
/// A monetary amount stored as an integer count of ten-thousandths.
///
/// Fares, balances and ledger totals all flow through `Money`, so sums never
/// pick up floating-point drift and every amount prints with 4 decimal places.
///
/// # Examples
/// ```
/// use toll_booth::common::money::Money;
///
/// let fare: Money = "10.5".parse().unwrap();
/// assert_eq!(fare.as_i64(), 105_000);
/// assert_eq!(fare.to_string_4dp(), "10.5000");
/// ```
pub struct Money(i64);

impl Money {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// `pct` percent of this amount, truncated to the 4th decimal place.
    pub fn percent(&self, pct: i64) -> Money {
        Money(self.0 * pct / 100)
    }

    pub fn to_bigdecimal(&self) -> BigDecimal {
        BigDecimal::from(self.0) / BigDecimal::from(SCALE)
    }

    pub fn to_string_4dp(&self) -> String {
        format!("{:.4}", self.to_bigdecimal())
    }
}

impl std::str::FromStr for Money {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ParseBigDecimalError::Other("empty amount".into()));
        }

        let bd: BigDecimal = t.parse()?;

        // Scale to 4 decimal places
        let scaled = (bd * BigDecimal::from(SCALE)).round(0);
        let value: i64 = scaled
            .to_i64()
            .ok_or_else(|| ParseBigDecimalError::Other("amount overflow".into()))?;

        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_4dp())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
