use std::collections::HashMap;

use bigdecimal::BigDecimal;

use crate::common::money::Money;

/// Fare charged when demand for a vehicle type is at or below the threshold.
pub const BASE_FARE: Money = Money::new(100_000);
/// Surcharge applied on top of [`BASE_FARE`] once demand exceeds the threshold.
pub const DEMAND_INCREASE_PERCENT: i64 = 5;

/// Demand ratio above which the surcharge kicks in (0.1).
pub fn demand_threshold() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(10)
}

/// What the per-type count is divided by when measuring demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DemandBasis {
    /// `count / toll collected so far`. Matches fares already in existing ledgers.
    #[default]
    TollCollected,
    /// `count / vehicles priced so far`.
    VehicleCount,
}

/// Demand observed within one batch run. Owned by the batch processor and
/// dropped when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingState {
    counts_by_type: HashMap<String, u64>,
    cumulative_toll: Money,
    vehicles_seen: u64,
}

impl PricingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from already observed counts and toll, e.g. to price a
    /// hypothetical next vehicle.
    pub fn from_counts<I, S>(counts: I, cumulative_toll: Money) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let counts_by_type: HashMap<String, u64> =
            counts.into_iter().map(|(t, c)| (t.into(), c)).collect();
        let vehicles_seen = counts_by_type.values().sum();
        Self {
            counts_by_type,
            cumulative_toll,
            vehicles_seen,
        }
    }

    pub fn count_for(&self, vehicle_type: &str) -> u64 {
        self.counts_by_type.get(vehicle_type).copied().unwrap_or(0)
    }

    pub fn counts_by_type(&self) -> &HashMap<String, u64> {
        &self.counts_by_type
    }

    pub fn cumulative_toll(&self) -> Money {
        self.cumulative_toll
    }

    pub fn vehicles_seen(&self) -> u64 {
        self.vehicles_seen
    }

    /// Accounts for a vehicle that has just been charged `fare`. Must run after
    /// [`compute_fare`] so a vehicle never influences its own price.
    pub fn record(&mut self, vehicle_type: &str, fare: Money) {
        *self
            .counts_by_type
            .entry(vehicle_type.to_string())
            .or_insert(0) += 1;
        self.cumulative_toll += fare;
        self.vehicles_seen += 1;
    }
}

/// Prices the next vehicle of `vehicle_type` given the demand seen so far.
///
/// A type not yet seen in the run, or a zero denominator, always pays
/// [`BASE_FARE`]. Otherwise the fare is surcharged by
/// [`DEMAND_INCREASE_PERCENT`] when `count / denominator` exceeds
/// [`demand_threshold`]; the comparison is exact.
///
/// # Examples
///
/// ```
/// use toll_booth::common::money::Money;
/// use toll_booth::domain::pricing::{compute_fare, DemandBasis, PricingState, BASE_FARE};
///
/// let state = PricingState::new();
/// assert_eq!(compute_fare("truck", &state, DemandBasis::TollCollected), BASE_FARE);
///
/// let busy = PricingState::from_counts([("car", 3)], Money::new(200_000));
/// assert_eq!(
///     compute_fare("car", &busy, DemandBasis::TollCollected),
///     Money::new(105_000)
/// );
/// ```
pub fn compute_fare(vehicle_type: &str, state: &PricingState, basis: DemandBasis) -> Money {
    let count = state.count_for(vehicle_type);
    if count == 0 {
        return BASE_FARE;
    }

    let denominator = match basis {
        DemandBasis::TollCollected => state.cumulative_toll().to_bigdecimal(),
        DemandBasis::VehicleCount => BigDecimal::from(state.vehicles_seen()),
    };
    if denominator <= BigDecimal::from(0) {
        return BASE_FARE;
    }

    if BigDecimal::from(count) > demand_threshold() * denominator {
        BASE_FARE + BASE_FARE.percent(DEMAND_INCREASE_PERCENT)
    } else {
        BASE_FARE
    }
}
