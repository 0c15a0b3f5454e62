use crate::parser::percentile::{Percentile, PercentileRow};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found before any record is processed. All of them abort the run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("data file not found: {}", .0.display())]
    MissingDataFile(PathBuf),
    #[error("percentile file not found: {}", .0.display())]
    MissingPercentileFile(PathBuf),
    #[error("output directory not found: {}", .0.display())]
    MissingOutputDir(PathBuf),
    #[error("percentile file is empty")]
    EmptyPercentile,
    #[error("invalid percentile: {0}")]
    InvalidPercentile(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Paths of a run, checked to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub percentile_file: PathBuf,
    pub output_file: PathBuf,
}

impl Config {
    /// Checks that both input files exist and that the output file can be created
    /// in an existing directory. The output file itself may or may not exist.
    pub fn from_paths(
        data_file: PathBuf,
        percentile_file: PathBuf,
        output_file: PathBuf,
    ) -> Result<Self, ConfigError> {
        if !data_file.is_file() {
            return Err(ConfigError::MissingDataFile(data_file));
        }
        if !percentile_file.is_file() {
            return Err(ConfigError::MissingPercentileFile(percentile_file));
        }
        match output_file.parent() {
            // a bare file name lives in the current directory
            Some(dir) if dir.as_os_str().is_empty() => {}
            Some(dir) if dir.is_dir() => {}
            Some(dir) => return Err(ConfigError::MissingOutputDir(dir.to_path_buf())),
            None => return Err(ConfigError::MissingOutputDir(output_file)),
        }
        Ok(Config {
            data_file,
            percentile_file,
            output_file,
        })
    }

    /// reads the percentile from the percentile file
    pub fn load_percentile(&self) -> Result<Percentile, ConfigError> {
        read_percentile(File::open(&self.percentile_file)?)
    }
}

/// Reads a percentile in `[0, 100]` from the first line of `input`.
pub fn read_percentile(input: impl Read) -> Result<Percentile, ConfigError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);
    match rdr.deserialize::<PercentileRow>().next() {
        Some(row) => Ok(row?.percentile),
        None => Err(ConfigError::EmptyPercentile),
    }
}
