use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::{
    common::error::LineError,
    domain::record::ProcessedRecord,
    io::reader::read_ledger,
};

/// Result of one full pass over the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan<T> {
    pub value: T,
    /// Lines that were skipped during the pass.
    pub skipped: Vec<LineError>,
    /// Set when the ledger could not be opened; `value` is then empty/zero.
    pub unreadable: Option<String>,
}

impl<T: Default> Scan<T> {
    fn unreadable(reason: String) -> Self {
        Self {
            value: T::default(),
            skipped: Vec::new(),
            unreadable: Some(reason),
        }
    }
}

// Folds every parsed record into `acc`, setting aside the lines that failed.
fn reduce<I, T, F>(records: I, mut acc: T, mut step: F) -> Scan<T>
where
    I: IntoIterator<Item = Result<ProcessedRecord, LineError>>,
    F: FnMut(&mut T, ProcessedRecord),
{
    let mut skipped = Vec::new();
    for rec in records {
        match rec {
            Ok(rec) => step(&mut acc, rec),
            Err(err) => {
                debug!(%err, "skipping ledger line");
                skipped.push(err);
            }
        }
    }
    Scan {
        value: acc,
        skipped,
        unreadable: None,
    }
}

/// Number of ledger records per vehicle type.
pub fn counts_by_type<I>(records: I) -> Scan<BTreeMap<String, u64>>
where
    I: IntoIterator<Item = Result<ProcessedRecord, LineError>>,
{
    reduce(records, BTreeMap::new(), |counts, rec| {
        *counts.entry(rec.vehicle_type).or_insert(0) += 1;
    })
}

/// Number of fully parsed ledger records. Skipped lines are not counted.
pub fn total_vehicles<I>(records: I) -> Scan<u64>
where
    I: IntoIterator<Item = Result<ProcessedRecord, LineError>>,
{
    reduce(records, 0, |total, _| *total += 1)
}

/// Sum of the toll fares in the ledger.
///
/// A single fare always fits a [`Money`](crate::common::money::Money), but a
/// long ledger can add up past it, so the sum is kept as an exact decimal.
pub fn total_toll_collected<I>(records: I) -> Scan<BigDecimal>
where
    I: IntoIterator<Item = Result<ProcessedRecord, LineError>>,
{
    reduce(records, BigDecimal::from(0), |total, rec| {
        *total += rec.toll_fare.to_bigdecimal()
    })
}

/// Answers report queries against the ledger file at `path`.
///
/// Nothing is cached: each query re-reads the file from the start, so the
/// answers always reflect what is on disk at the time of the call. A missing
/// or unreadable ledger is logged and yields an empty result.
#[derive(Debug, Clone)]
pub struct LedgerAggregator {
    path: PathBuf,
}

impl LedgerAggregator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn counts_by_type(&self) -> Scan<BTreeMap<String, u64>> {
        self.scan(|records| counts_by_type(records))
    }

    pub fn total_vehicles(&self) -> Scan<u64> {
        self.scan(|records| total_vehicles(records))
    }

    pub fn total_toll_collected(&self) -> Scan<BigDecimal> {
        self.scan(|records| total_toll_collected(records))
    }

    fn scan<T, F>(&self, query: F) -> Scan<T>
    where
        T: Default,
        F: FnOnce(&mut dyn Iterator<Item = Result<ProcessedRecord, LineError>>) -> Scan<T>,
    {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "failed to open ledger");
                return Scan::unreadable(err.to_string());
            }
        };
        let mut records = read_ledger(BufReader::new(file));
        query(&mut records)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::common::money::Money;

    fn rec(number: &str, vehicle_type: &str, fare: i64) -> Result<ProcessedRecord, LineError> {
        Ok(ProcessedRecord::new(
            number,
            vehicle_type,
            Money::new(fare),
            "2024-01-02,08:30:00",
        ))
    }

    fn bad(line: u64) -> Result<ProcessedRecord, LineError> {
        Err(LineError::InvalidAmount {
            line,
            field: "toll fare",
            value: "1O.0".into(),
            reason: "invalid digit".into(),
        })
    }

    #[test]
    fn counts_records_per_type() {
        let scan = counts_by_type(vec![
            rec("A", "car", 100_000),
            rec("B", "car", 100_000),
            rec("C", "bus", 100_000),
        ]);

        let expected: BTreeMap<String, u64> =
            [("car".to_string(), 2), ("bus".to_string(), 1)].into_iter().collect();
        assert_eq!(scan.value, expected);
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn total_toll_skips_malformed_fare_rows() {
        let scan = total_toll_collected(vec![rec("A", "car", 100_000), rec("B", "car", 105_000), bad(3)]);

        assert_eq!(scan.value, Money::new(205_000).to_bigdecimal());
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].line(), 3);
    }

    #[test]
    fn total_vehicles_counts_only_parsed_records() {
        let scan = total_vehicles(vec![rec("A", "car", 100_000), bad(2), rec("C", "bus", 100_000), bad(4)]);

        assert_eq!(scan.value, 2);
        assert_eq!(scan.skipped.len(), 2);
    }

    #[test]
    fn empty_ledger_yields_zero_results() {
        assert!(counts_by_type(Vec::new()).value.is_empty());
        assert_eq!(total_vehicles(Vec::new()).value, 0);
        assert_eq!(total_toll_collected(Vec::new()).value, BigDecimal::from(0));
    }

    #[test]
    fn missing_ledger_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let aggregator = LedgerAggregator::new(dir.path().join("missing.txt"));

        let counts = aggregator.counts_by_type();
        assert!(counts.value.is_empty());
        assert!(counts.unreadable.is_some());

        let total = aggregator.total_vehicles();
        assert_eq!(total.value, 0);
        assert!(total.unreadable.is_some());

        let toll = aggregator.total_toll_collected();
        assert_eq!(toll.value, BigDecimal::from(0));
        assert!(toll.unreadable.is_some());
    }

    #[test]
    fn queries_agree_regardless_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(
            &path,
            "A,car,10,2024-01-02,08:30:00\nB,car,10.5,2024-01-02,08:30:01\nC,bus,1O.0,2024-01-02,08:30:02\n",
        )
        .unwrap();
        let aggregator = LedgerAggregator::new(&path);

        let toll_first = aggregator.total_toll_collected();
        let counts = aggregator.counts_by_type();
        let total = aggregator.total_vehicles();
        let toll_last = aggregator.total_toll_collected();

        assert_eq!(toll_first, toll_last);
        assert_eq!(toll_first.value, Money::new(205_000).to_bigdecimal());
        assert_eq!(total.value, 2);
        assert_eq!(counts.value.values().sum::<u64>(), total.value);
        assert_eq!(counts.skipped.len(), 1);
    }

    #[test]
    fn total_toll_does_not_overflow_on_huge_fares() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(
            &path,
            "A,car,900000000000000,2024-01-02,08:30:00\nB,car,900000000000000,2024-01-02,08:30:01\n",
        )
        .unwrap();

        let toll = LedgerAggregator::new(&path).total_toll_collected();

        assert!(toll.skipped.is_empty());
        assert_eq!(toll.value, BigDecimal::from_str("1800000000000000").unwrap());
    }

    #[test]
    fn stray_quote_in_ledger_file_costs_only_that_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(
            &path,
            "A1,car,10,2024-01-02,08:30:00\n\"B2,car,10,2024-01-02,08:30:01\nC3,bus,10,2024-01-02,08:30:02\nD4,car,10,2024-01-02,08:30:03\n",
        )
        .unwrap();

        let total = LedgerAggregator::new(&path).total_vehicles();

        assert_eq!(total.value, 3);
        assert_eq!(total.skipped.len(), 1);
        assert_eq!(total.skipped[0].line(), 2);
    }
}
