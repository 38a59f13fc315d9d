use crate::{
    common::{error::LineError, money::Money},
    domain::{record::ProcessedRecord, vehicle::VehicleRecord},
};
use std::{io::BufRead, str::FromStr};

const INPUT_FIELDS: usize = 3;
const LEDGER_FIELDS: usize = 4;

/// Splits `rdr` into physical lines and parses each one on its own, so a
/// stray quote can never swallow the lines after it. Blank lines are skipped;
/// every other line yields its 1-based number and its trimmed fields.
fn split_lines<R: BufRead>(
    rdr: R,
) -> impl Iterator<Item = Result<(u64, csv::StringRecord), LineError>> {
    rdr.lines().enumerate().filter_map(|(idx, res)| {
        let line = idx as u64 + 1;
        let text = match res {
            Ok(text) => text,
            Err(e) => {
                return Some(Err(LineError::Unreadable {
                    line,
                    reason: e.to_string(),
                }));
            }
        };
        if text.trim().is_empty() {
            return None;
        }

        let mut fields = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut record = csv::StringRecord::new();
        match fields.read_record(&mut record) {
            Ok(true) => Some(Ok((line, record))),
            Ok(false) => None,
            Err(e) => Some(Err(LineError::Unreadable {
                line,
                reason: e.to_string(),
            })),
        }
    })
}

/// Reads crossings from input lines of the form
/// `vehicleNumber,vehicleType,declaredBalance`.
///
/// Each line yields either a [`VehicleRecord`] or a [`LineError`] naming the
/// line; a bad line never stops the iterator. Blank lines are ignored.
///
/// # Examples
///
/// ```
/// use toll_booth::io::reader::read_vehicles;
///
/// let data = "KA01,car,50\nKA02,bus\nKA03,truck,12.5\n";
/// let vehicles: Vec<_> = read_vehicles(data.as_bytes()).collect();
///
/// assert_eq!(vehicles.len(), 3);
/// assert_eq!(vehicles[0].as_ref().unwrap().vehicle_type, "car");
/// assert!(vehicles[1].is_err());
/// assert_eq!(vehicles[2].as_ref().unwrap().vehicle_number, "KA03");
/// ```
pub fn read_vehicles<R: BufRead>(
    rdr: R,
) -> impl Iterator<Item = Result<VehicleRecord, LineError>> {
    split_lines(rdr).map(|res| {
        let (line, record) = res?;
        if record.len() != INPUT_FIELDS {
            return Err(LineError::FieldCount {
                line,
                expected: INPUT_FIELDS,
                found: record.len(),
            });
        }

        let vehicle_number = required(&record, 0, line, "vehicle number")?;
        let vehicle_type = required(&record, 1, line, "vehicle type")?;
        let declared_balance = amount(&record, 2, line, "balance")?;

        Ok(VehicleRecord {
            vehicle_number,
            vehicle_type,
            declared_balance,
        })
    })
}

/// Reads ledger lines of the form
/// `vehicleNumber,vehicleType,tollFare,YYYY-MM-DD,HH:MM:SS`.
///
/// Everything after the fare is the timestamp, so both the quoted form the
/// writer produces and older unquoted lines (five raw fields) are accepted.
pub fn read_ledger<R: BufRead>(
    rdr: R,
) -> impl Iterator<Item = Result<ProcessedRecord, LineError>> {
    split_lines(rdr).map(|res| {
        let (line, record) = res?;
        if record.len() < LEDGER_FIELDS {
            return Err(LineError::FieldCount {
                line,
                expected: LEDGER_FIELDS,
                found: record.len(),
            });
        }

        let vehicle_number = required(&record, 0, line, "vehicle number")?;
        let vehicle_type = required(&record, 1, line, "vehicle type")?;
        let toll_fare = amount(&record, 2, line, "toll fare")?;
        let timestamp = record.iter().skip(3).collect::<Vec<_>>().join(",");
        if timestamp.is_empty() {
            return Err(LineError::MissingField {
                line,
                field: "timestamp",
            });
        }

        Ok(ProcessedRecord {
            vehicle_number,
            vehicle_type,
            toll_fare,
            timestamp,
        })
    })
}

fn required(
    record: &csv::StringRecord,
    idx: usize,
    line: u64,
    field: &'static str,
) -> Result<String, LineError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(LineError::MissingField { line, field }),
    }
}

fn amount(
    record: &csv::StringRecord,
    idx: usize,
    line: u64,
    field: &'static str,
) -> Result<Money, LineError> {
    let raw = record.get(idx).unwrap_or_default();
    Money::from_str(raw).map_err(|e| LineError::InvalidAmount {
        line,
        field,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
