use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    str::FromStr,
};

use tracing::{error, info};

use crate::{
    common::error::{AppError, LineError},
    config::CliConfig,
    io::writer::LedgerWriter,
    worker::{aggregator::LedgerAggregator, processor::Processor},
};

const RULE: &str = "..................................................................";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ProcessInput,
    ShowDetails,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::ProcessInput),
            "2" => Ok(MenuChoice::ShowDetails),
            "3" => Ok(MenuChoice::Exit),
            other => Err(AppError::InvalidChoice(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailQuery {
    CountsByType,
    TotalVehicles,
    TotalToll,
}

impl FromStr for DetailQuery {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(DetailQuery::CountsByType),
            "2" => Ok(DetailQuery::TotalVehicles),
            "3" => Ok(DetailQuery::TotalToll),
            other => Err(AppError::InvalidChoice(other.to_string())),
        }
    }
}

/// Runs the interactive toll booth session until the user exits or `input`
/// reaches end of file.
///
/// Bad selections and data problems are reported on `out` and never end the
/// session; only a failure to talk to the terminal itself is returned.
pub fn run<R, W>(config: &CliConfig, input: R, out: W) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
{
    Session {
        config,
        processor: Processor::new(config.demand_basis),
        aggregator: LedgerAggregator::new(&config.output_path),
        input,
        out,
    }
    .run()
}

struct Session<'a, R, W> {
    config: &'a CliConfig,
    processor: Processor,
    aggregator: LedgerAggregator,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn run(&mut self) -> Result<(), AppError> {
        loop {
            writeln!(self.out, "=== TOLL BOOTH SIMULATION ===")?;
            writeln!(self.out, "1. Process Input File")?;
            writeln!(self.out, "2. Display Details of the Output File")?;
            writeln!(self.out, "3. Exit")?;
            let Some(answer) = self.prompt()? else {
                return Ok(());
            };

            match answer.parse::<MenuChoice>() {
                Ok(MenuChoice::ProcessInput) => self.process_input()?,
                Ok(MenuChoice::ShowDetails) => {
                    if !self.show_details()? {
                        return Ok(());
                    }
                }
                Ok(MenuChoice::Exit) => return Ok(()),
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
    }

    // `None` once the input is exhausted.
    fn prompt(&mut self) -> Result<Option<String>, AppError> {
        write!(self.out, "Enter your choice: ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn process_input(&mut self) -> Result<(), AppError> {
        let file = match File::open(&self.config.input_path) {
            Ok(file) => file,
            Err(err) => {
                info!(path = %self.config.input_path.display(), %err, "failed to open input file");
                writeln!(self.out, "Failed to open input file: {err}")?;
                return Ok(());
            }
        };
        let mut ledger = match LedgerWriter::append_to(&self.config.output_path) {
            Ok(ledger) => ledger,
            Err(err) => {
                error!(path = %self.config.output_path.display(), %err, "failed to open ledger");
                writeln!(self.out, "Failed to open output file: {err}")?;
                return Ok(());
            }
        };

        let summary = self
            .processor
            .process_batch(BufReader::new(file), &mut ledger);
        for err in &summary.skipped {
            writeln!(self.out, "Error parsing input {err}")?;
        }
        for vehicle in &summary.low_balance {
            writeln!(self.out, "Vehicle number {vehicle}: Please recharge your FastTag.")?;
        }
        if let Some(err) = &summary.stopped {
            info!(%err, processed = summary.processed, "batch processing stopped");
            writeln!(self.out, "Processing stopped: {err}")?;
            return Ok(());
        }
        writeln!(self.out, "Input file processed.")?;
        writeln!(
            self.out,
            "Processed {} vehicle(s), skipped {} line(s).",
            summary.processed,
            summary.skipped.len()
        )?;
        Ok(())
    }

    // Returns `false` when input ran out before a valid query was chosen.
    fn show_details(&mut self) -> Result<bool, AppError> {
        if !self.aggregator.path().exists() {
            info!(path = %self.aggregator.path().display(), "ledger not found");
            writeln!(self.out, "Failed to open output file.")?;
            return Ok(true);
        }

        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "=== Details ===")?;
        writeln!(self.out, "1. Number of vehicles passed of each type")?;
        writeln!(self.out, "2. Total vehicles passed")?;
        writeln!(self.out, "3. Total toll amount collected")?;

        let query = loop {
            let Some(answer) = self.prompt()? else {
                return Ok(false);
            };
            match answer.parse::<DetailQuery>() {
                Ok(query) => break query,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        };

        match query {
            DetailQuery::CountsByType => {
                let scan = self.aggregator.counts_by_type();
                self.report_problems(&scan.skipped, scan.unreadable.as_deref())?;
                writeln!(self.out, "=== Number of vehicles passed of each type ===")?;
                for (vehicle_type, count) in &scan.value {
                    writeln!(self.out, "{vehicle_type}: {count}")?;
                }
            }
            DetailQuery::TotalVehicles => {
                let scan = self.aggregator.total_vehicles();
                self.report_problems(&scan.skipped, scan.unreadable.as_deref())?;
                writeln!(self.out, "=== Total Number of vehicles passed through toll: ===")?;
                writeln!(self.out, "Total vehicles: {}", scan.value)?;
            }
            DetailQuery::TotalToll => {
                let scan = self.aggregator.total_toll_collected();
                self.report_problems(&scan.skipped, scan.unreadable.as_deref())?;
                writeln!(self.out, "=== Total toll amount collected: ===")?;
                writeln!(self.out, "Total toll: {:.4}", scan.value)?;
            }
        }

        writeln!(self.out, "{RULE}")?;
        Ok(true)
    }

    fn report_problems(
        &mut self,
        skipped: &[LineError],
        unreadable: Option<&str>,
    ) -> Result<(), AppError> {
        if let Some(reason) = unreadable {
            writeln!(self.out, "Failed to open output file: {reason}")?;
        }
        for err in skipped {
            writeln!(self.out, "Error parsing {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_choices() {
        assert_eq!("1".parse::<MenuChoice>().unwrap(), MenuChoice::ProcessInput);
        assert_eq!(" 2 ".parse::<MenuChoice>().unwrap(), MenuChoice::ShowDetails);
        assert_eq!("3".parse::<MenuChoice>().unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn rejects_out_of_range_and_non_numeric_choices() {
        for bad in ["0", "4", "5", "x", "", "2abc"] {
            assert!(matches!(
                bad.parse::<MenuChoice>(),
                Err(AppError::InvalidChoice(_))
            ));
            assert!(matches!(
                bad.parse::<DetailQuery>(),
                Err(AppError::InvalidChoice(_))
            ));
        }
    }

    #[test]
    fn parses_detail_queries() {
        assert_eq!("1".parse::<DetailQuery>().unwrap(), DetailQuery::CountsByType);
        assert_eq!("2".parse::<DetailQuery>().unwrap(), DetailQuery::TotalVehicles);
        assert_eq!("3".parse::<DetailQuery>().unwrap(), DetailQuery::TotalToll);
    }

    #[test]
    fn session_ends_cleanly_at_end_of_input() {
        let config = CliConfig::default();
        let mut out = Vec::new();
        run(&config, "".as_bytes(), &mut out).unwrap();

        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("=== TOLL BOOTH SIMULATION ==="));
    }

    #[test]
    fn invalid_main_choice_is_reported_and_reprompted() {
        let config = CliConfig::default();
        let mut out = Vec::new();
        run(&config, "9\n3\n".as_bytes(), &mut out).unwrap();

        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Invalid choice \"9\". Please enter a valid choice."));
        assert_eq!(s.matches("=== TOLL BOOTH SIMULATION ===").count(), 2);
    }
}
