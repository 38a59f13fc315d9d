use std::path::PathBuf;

use clap::Parser;

use crate::domain::pricing::DemandBasis;

pub const DEFAULT_INPUT_PATH: &str = "input.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

#[derive(Debug, Clone, Parser)]
#[command(name = "toll-booth")]
#[command(about = "Toll booth simulation: prices a batch of crossings and reports on the ledger")]
pub struct CliConfig {
    /// Crossings to process, one `number,type,balance` per line
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input_path: PathBuf,

    /// Append-only ledger of processed crossings
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: PathBuf,

    /// Denominator of the demand ratio used for surge pricing
    #[arg(long, value_enum, default_value_t = DemandBasis::TollCollected)]
    pub demand_basis: DemandBasis,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            demand_basis: DemandBasis::default(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fixed_paths() {
        let config = CliConfig::parse_from(["toll-booth"]);
        assert_eq!(config.input_path, PathBuf::from("input.txt"));
        assert_eq!(config.output_path, PathBuf::from("output.txt"));
        assert_eq!(config.demand_basis, DemandBasis::TollCollected);
        assert!(!config.verbose);
    }

    #[test]
    fn flags_override_defaults() {
        let config = CliConfig::parse_from([
            "toll-booth",
            "--input-path",
            "in.csv",
            "--output-path",
            "ledger.csv",
            "--demand-basis",
            "vehicle-count",
            "--verbose",
        ]);
        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.output_path, PathBuf::from("ledger.csv"));
        assert_eq!(config.demand_basis, DemandBasis::VehicleCount);
        assert!(config.verbose);
    }
}
