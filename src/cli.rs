use clap::Parser;
use std::path::PathBuf;

use crate::validate::ValidationMode;

/// Clean the airline flights and big-tech stock price datasets.
#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// Explicit input files; the dataset is detected from each header.
    /// Without any, the built-in datasets are read from `--input-dir`.
    pub files: Vec<PathBuf>,

    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML file replacing the built-in dataset profiles.
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    /// Refuse to write a dataset that has validation violations.
    #[arg(long)]
    pub strict: bool,

    /// Run the datasets concurrently.
    #[arg(long)]
    pub parallel: bool,

    /// Write the clean/validation reports as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl CliArgs {
    pub fn validation_mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Advisory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_needed() {
        let args = CliArgs::parse_from(["tabclean"]);
        assert_eq!(
            args,
            CliArgs {
                files: vec![],
                input_dir: PathBuf::from("."),
                output_dir: PathBuf::from("."),
                profiles: None,
                strict: false,
                parallel: false,
                report: None,
            }
        );
        assert_eq!(args.validation_mode(), ValidationMode::Advisory);
    }

    #[test]
    fn test_args_parsing() {
        let args = CliArgs::parse_from([
            "tabclean",
            "--output-dir",
            "out",
            "--strict",
            "--report",
            "report.json",
            "a.csv",
            "b.txt",
        ]);
        assert_eq!(args.files, vec![PathBuf::from("a.csv"), PathBuf::from("b.txt")]);
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.report, Some(PathBuf::from("report.json")));
        assert_eq!(args.validation_mode(), ValidationMode::Strict);
    }
}
