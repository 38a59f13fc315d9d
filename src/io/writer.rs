use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

use crate::{common::error::AppError, domain::record::ProcessedRecord};

#[derive(serde::Serialize)]
/// Internal ledger row: `vehicleNumber,vehicleType,tollFare,timestamp`.
/// The fare is written with 4 decimal places.
struct LedgerRow<'a> {
    vehicle_number: &'a str,
    vehicle_type: &'a str,
    toll_fare: String,
    timestamp: &'a str,
}

/// Appends [`ProcessedRecord`]s to the ledger, one line each, no header.
///
/// The timestamp contains a comma, so it comes out quoted
/// (`"2024-01-02,08:30:00"`); the ledger reader accepts that and the older
/// unquoted form alike.
///
/// # Examples
///
/// ```
/// use toll_booth::common::money::Money;
/// use toll_booth::domain::record::ProcessedRecord;
/// use toll_booth::io::writer::LedgerWriter;
///
/// let mut out = Vec::new();
/// {
///     let mut ledger = LedgerWriter::from_writer(&mut out);
///     ledger
///         .append(&ProcessedRecord::new("KA01", "car", Money::new(100_000), "2024-01-02,08:30:00"))
///         .unwrap();
///     ledger.flush().unwrap();
/// }
///
/// assert_eq!(String::from_utf8(out).unwrap(), "KA01,car,10.0000,\"2024-01-02,08:30:00\"\n");
/// ```
pub struct LedgerWriter<W: Write> {
    wtr: csv::Writer<W>,
}

impl LedgerWriter<File> {
    /// Opens `path` for appending, creating it if needed. Existing lines are
    /// never touched.
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> LedgerWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        let wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        Self { wtr }
    }

    pub fn append(&mut self, record: &ProcessedRecord) -> Result<(), AppError> {
        self.wtr.serialize(LedgerRow {
            vehicle_number: &record.vehicle_number,
            vehicle_type: &record.vehicle_type,
            toll_fare: record.toll_fare.to_string_4dp(),
            timestamp: &record.timestamp,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), AppError> {
        self.wtr.flush()?;
        Ok(())
    }
}
