//! CSV export of sweep results
//!
//! CSV (Comma-Separated Values) is readable by spreadsheets, pandas, MATLAB
//! and most analysis tools.
//!
//! # Delay table
//!
//! One row per grid point, in visiting order. A run that never ignites has
//! empty delay cells and `false` in the `ignited` column:
//!
//! ```csv
//! pressure (atm),Ignition delay (s),Ignition delay (ms),ignited
//! 1.000000,0.032600,32.600000,true
//! 1.500000,,,false
//! ```
//!
//! # Trajectory
//!
//! Time, temperature, pressure and one mole-fraction column per species:
//!
//! ```csv
//! # Ignition Delay Study Data
//! # Generated: 2026-02-11T15:30:00Z
//! # Simulator: Global methane kinetics
//! # Reactor Mode: constant-pressure
//! #
//! Time (s),Time (ms),Temperature (K),Pressure (Pa),X_CH4,X_CO2,...
//! 0.000000,0.000000,1250.000000,101325.000000,0.095057,0.000000,...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{StudyError, StudyResult};
use crate::output::export::{downsample_indices, Exporter};
use crate::sweep::{SweepRecord, SweepSettings, SweepTable};

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use ignite_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(10).max_points(500);
/// assert_eq!(config.delimiter, ';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Write one mole-fraction column per species in trajectories (default: true)
    pub include_species: bool,

    /// Downsample trajectories to at most this many rows (default: all rows)
    pub max_points: Option<usize>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            include_species: true,
            max_points: None,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: cap trajectory rows
    pub fn max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional. Only non-None fields will be included in the CSV header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    pub study_name: Option<String>,

    pub simulator_name: Option<String>,

    /// e.g. "constant-pressure"
    pub reactor_mode: Option<String>,

    /// e.g. "cumulative-rise"
    pub detection_rule: Option<String>,

    /// Ignition threshold (K)
    pub threshold: Option<f64>,

    /// Simulated horizon (seconds)
    pub total_time: Option<f64>,

    /// Sampling step (seconds)
    pub time_step: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing how a sweep was run
    pub fn from_sweep(study: &str, simulator: &str, settings: &SweepSettings) -> Self {
        Self {
            study_name: Some(study.to_string()),
            simulator_name: Some(simulator.to_string()),
            detection_rule: Some(settings.detector.rule().to_string()),
            threshold: Some(settings.detector.threshold()),
            total_time: Some(settings.horizon.total_time()),
            time_step: Some(settings.horizon.time_step()),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header(out: &mut impl Write, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# Ignition Delay Study Data")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(study) = &metadata.study_name {
        writeln!(out, "# Study: {}", study)?;
    }
    if let Some(simulator) = &metadata.simulator_name {
        writeln!(out, "# Simulator: {}", simulator)?;
    }
    if let Some(mode) = &metadata.reactor_mode {
        writeln!(out, "# Reactor Mode: {}", mode)?;
    }
    if let Some(rule) = &metadata.detection_rule {
        writeln!(out, "# Detection Rule: {}", rule)?;
    }
    if let Some(threshold) = metadata.threshold {
        writeln!(out, "# Threshold: {} K", threshold)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(out, "# Total Time: {} s", total_time)?;
    }
    if let Some(time_step) = metadata.time_step {
        writeln!(out, "# Time Step: {} s", time_step)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;

    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

fn format_optional(value: Option<f64>, config: &CsvConfig) -> String {
    value.map(|v| format_number(v, config)).unwrap_or_default()
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn open(&self, path: &Path) -> StudyResult<BufWriter<File>> {
        let mut out = BufWriter::new(File::create(path)?);
        if self.config.include_metadata
            && let Some(metadata) = &self.config.metadata
        {
            write_metadata_header(&mut out, metadata)?;
        }
        Ok(out)
    }
}

impl Exporter for CsvExporter {
    type Error = StudyError;

    fn export_table(&self, table: &SweepTable, path: &Path) -> StudyResult<()> {
        if table.is_empty() {
            return Err(StudyError::config("cannot export an empty sweep table"));
        }

        let config = &self.config;
        let d = config.delimiter;
        let mut out = self.open(path)?;

        // ============================= Write Header ===========================

        for axis in table.grid().axes() {
            write!(out, "{} ({}){}", axis.parameter, axis.parameter.unit(), d)?;
        }
        writeln!(out, "Ignition delay (s){}Ignition delay (ms){}ignited", d, d)?;

        // ============================= Write Data =============================

        for record in table.records() {
            for (_, value) in &record.point.values {
                write!(out, "{}{}", format_number(*value, config), d)?;
            }
            writeln!(
                out,
                "{}{}{}{}{}",
                format_optional(record.ignition.delay, config),
                d,
                format_optional(record.ignition.delay_ms(), config),
                d,
                record.ignition.ignited()
            )?;
        }

        out.flush()?;
        Ok(())
    }

    fn export_trajectory(&self, record: &SweepRecord, path: &Path) -> StudyResult<()> {
        let trajectory = &record.trajectory;
        if trajectory.is_empty() {
            return Err(StudyError::config(format!(
                "trajectory at [{}] has no samples",
                record.point
            )));
        }

        let config = &self.config;
        let d = config.delimiter;

        let mut metadata = config.metadata.clone().unwrap_or_default();
        metadata.reactor_mode = Some(record.run.reactor_mode().to_string());
        metadata.add_custom("Grid Point".to_string(), record.point.to_string());
        metadata.add_custom("Ignition".to_string(), record.ignition.to_string());

        let mut out = BufWriter::new(File::create(path)?);
        if config.include_metadata {
            write_metadata_header(&mut out, &metadata)?;
        }

        // ============================= Write Header ===========================

        write!(out, "Time (s){}Time (ms){}Temperature (K){}Pressure (Pa)", d, d, d)?;
        if config.include_species {
            for species in trajectory.species() {
                write!(out, "{}X_{}", d, species)?;
            }
        }
        writeln!(out)?;

        // ============================= Write Data =============================

        let samples = trajectory.samples();
        for i in downsample_indices(samples.len(), config.max_points) {
            let sample = &samples[i];
            write!(
                out,
                "{}{}{}{}{}{}{}",
                format_number(sample.time, config),
                d,
                format_number(sample.time * 1e3, config),
                d,
                format_number(sample.state.temperature, config),
                d,
                format_number(sample.state.pressure, config)
            )?;
            if config.include_species {
                for x in sample.state.mole_fractions.iter() {
                    write!(out, "{}{}", d, format_number(*x, config))?;
                }
            }
            writeln!(out)?;
        }

        out.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;
    use std::fs;

    #[test]
    fn test_table_one_row_per_point() {
        let table = fixtures::pressure_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.csv");

        CsvExporter::default().export_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "pressure (atm),Ignition delay (s),Ignition delay (ms),ignited");
        assert_eq!(lines[1], "1.000000,0.003000,3.000000,true");
        assert_eq!(lines[3], "3.000000,,,false");
    }

    #[test]
    fn test_two_axis_table_has_both_coordinates() {
        let table = fixtures::fuel_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuel.csv");

        CsvExporter::new(CsvConfig::default().precision(2)).export_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("pressure (atm),amount:CH4 (mol),"));
        assert!(lines[2].starts_with("1.00,0.20,"));
    }

    #[test]
    fn test_trajectory_export_with_metadata() {
        let table = fixtures::pressure_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");

        let metadata = CsvMetadata::from_sweep("pressure", "Mock", &fixtures::settings());
        let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
        exporter.export_trajectory(&table.records()[0], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Ignition Delay Study Data"));
        assert!(content.contains("# Simulator: Mock"));
        assert!(content.contains("# Reactor Mode: constant-pressure"));
        assert!(content.contains("Time (s),Time (ms),Temperature (K),Pressure (Pa),X_N2"));

        let data_rows = content.lines().filter(|l| !l.starts_with('#')).count() - 1;
        assert_eq!(data_rows, table.records()[0].trajectory.len());
    }

    #[test]
    fn test_european_format() {
        let table = fixtures::pressure_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eu.csv");

        CsvExporter::new(CsvConfig::european()).export_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("1,000000;0,003000;3,000000;true"));
    }

    #[test]
    fn test_tab_delimited_table() {
        let table = fixtures::pressure_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delays.tsv");

        CsvExporter::new(CsvConfig::default().delimiter('\t'))
            .export_table(&table, &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "pressure (atm)\tIgnition delay (s)\tIgnition delay (ms)\tignited");
        assert_eq!(lines[1], "1.000000\t0.003000\t3.000000\ttrue");
        assert!(!content.contains(','));
    }

    #[test]
    fn test_downsampled_trajectory() {
        let table = fixtures::pressure_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("light.csv");

        CsvExporter::new(CsvConfig::default().max_points(2))
            .export_trajectory(&table.records()[0], &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let table = fixtures::pressure_table();
        let error = CsvExporter::default()
            .export_table(&table, Path::new("/nonexistent/dir/out.csv"))
            .unwrap_err();
        assert!(matches!(error, StudyError::Io(_)));
    }
}
