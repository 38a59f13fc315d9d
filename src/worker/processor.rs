use std::io::{BufRead, Write};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::{
    common::error::{AppError, LineError},
    domain::{
        pricing::{DemandBasis, PricingState, compute_fare},
        record::ProcessedRecord,
    },
    io::{reader::read_vehicles, writer::LedgerWriter},
};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Records appended to the ledger.
    pub processed: usize,
    /// Input lines that could not be parsed.
    pub skipped: Vec<LineError>,
    /// Vehicles whose declared balance did not cover their fare.
    pub low_balance: Vec<String>,
    /// Demand observed during the run.
    pub state: PricingState,
    /// Set when a ledger write failed and the run ended early. Everything
    /// above still describes the lines handled before the failure.
    pub stopped: Option<AppError>,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug)]
pub struct Processor {
    basis: DemandBasis,
    clock: fn() -> NaiveDateTime,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(DemandBasis::default())
    }
}

impl Processor {
    pub fn new(basis: DemandBasis) -> Self {
        Self {
            basis,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used to stamp ledger records.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Prices every crossing in `input` and appends it to `ledger`.
    ///
    /// Demand is measured from zero for every call. Unparseable lines are
    /// skipped; a vehicle whose balance does not cover the fare is flagged but
    /// still recorded. A failing ledger write ends the run early and is kept in
    /// [`BatchSummary::stopped`] next to what was handled so far.
    pub fn process_batch<R: BufRead, W: Write>(
        &self,
        input: R,
        ledger: &mut LedgerWriter<W>,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for row in read_vehicles(input) {
            let vehicle = match row {
                Ok(vehicle) => vehicle,
                Err(err) => {
                    debug!(%err, "skipping input line");
                    summary.skipped.push(err);
                    continue;
                }
            };

            let fare = compute_fare(&vehicle.vehicle_type, &summary.state, self.basis);
            if !vehicle.can_cover(fare) {
                debug!(
                    vehicle = %vehicle.vehicle_number,
                    balance = %vehicle.declared_balance,
                    %fare,
                    "balance does not cover fare"
                );
                summary.low_balance.push(vehicle.vehicle_number.clone());
            }

            let record = ProcessedRecord::priced(&vehicle, fare, (self.clock)());
            if let Err(err) = ledger.append(&record) {
                debug!(%err, vehicle = %record.vehicle_number, "ledger write failed");
                summary.stopped = Some(err);
                return summary;
            }
            debug!(
                vehicle = %record.vehicle_number,
                vehicle_type = %record.vehicle_type,
                fare = %record.toll_fare,
                "recorded crossing"
            );

            summary.state.record(&vehicle.vehicle_type, fare);
            summary.processed += 1;
        }

        if let Err(err) = ledger.flush() {
            debug!(%err, "ledger flush failed");
            summary.stopped = Some(err);
            return summary;
        }
        info!(
            processed = summary.processed,
            skipped = summary.skipped.len(),
            toll = %summary.state.cumulative_toll(),
            "batch processed"
        );
        summary
    }
}
