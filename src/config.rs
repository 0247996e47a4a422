//! Study documents
//!
//! A study is one sweep: a run template, one or two axes, a horizon and a
//! detection rule. Studies are read from TOML:
//!
//! ```toml
//! [[studies]]
//! name = "pressure"
//! title = "Ignition delay vs pressure"
//! detection = "cumulative-rise"
//! threshold = 400.0
//! stop_at_ignition = true
//!
//! [studies.template]
//! temperature = 1250.0
//! pressure = 1.0
//! reactor = "constant temperature"
//! composition = { CH4 = 1.0, O2 = 2.0, N2 = 7.52 }
//!
//! [studies.horizon]
//! kind = "duration"
//! total_time = 10.0
//! time_step = 2e-4
//!
//! [[studies.axes]]
//! parameter = "pressure"
//! start = 1.0
//! stop = 5.0
//! count = 9
//! ```
//!
//! Axes take either an explicit `values = [...]` list or a
//! `start`/`stop`/`count` range (both ends included).

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::{StudyError, StudyResult};
use crate::ignition::{DetectionRule, IGNITION_THRESHOLD};
use crate::physics::{Composition, ReactorSimulator};
use crate::solver::SimulationHorizon;
use crate::sweep::{Parameter, RunTemplate, SweepAxis, SweepGrid, SweepOrchestrator, SweepSettings, SweepTable};

// =============================================================================
// Root document
// =============================================================================

/// A set of studies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    pub studies: Vec<Study>,
}

impl StudyConfig {
    /// Load a study document from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> StudyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    pub fn to_toml(&self) -> StudyResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every study and that study names are unique
    pub fn validate(&self) -> StudyResult<()> {
        if self.studies.is_empty() {
            return Err(StudyError::config("study document contains no studies"));
        }

        let mut names = BTreeSet::new();
        for study in &self.studies {
            if !names.insert(study.name.as_str()) {
                return Err(StudyError::config(format!("duplicate study name '{}'", study.name)));
            }
            study.validate()?;
        }

        Ok(())
    }

    pub fn study(&self, name: &str) -> Option<&Study> {
        self.studies.iter().find(|s| s.name == name)
    }

    /// Studies with the given names, in document order; all studies when `names` is empty
    pub fn select(&self, names: &[String]) -> StudyResult<Vec<&Study>> {
        if let Some(unknown) = names.iter().find(|n| self.study(n).is_none()) {
            return Err(StudyError::config(format!("no study named '{}'", unknown)));
        }
        Ok(self
            .studies
            .iter()
            .filter(|s| names.is_empty() || names.contains(&s.name))
            .collect())
    }

    /// Methane auto-ignition: delay vs pressure, vs temperature, and vs fuel
    /// amount at several pressures
    pub fn methane_autoignition() -> Self {
        let air = |fuel: f64, oxygen: f64, nitrogen: f64| {
            Composition::from_pairs([("CH4", fuel), ("O2", oxygen), ("N2", nitrogen)]).unwrap_or_default()
        };

        let pressure = Study {
            name: "pressure".to_string(),
            title: Some("Ignition delay vs initial pressure (rigid vessel, 1250 K)".to_string()),
            detection: DetectionRule::CumulativeRise,
            threshold: IGNITION_THRESHOLD,
            stop_at_ignition: true,
            template: RunTemplate::new(1250.0, 1.0, air(1.0, 2.0, 7.52), "constant temperature"),
            horizon: SimulationHorizon::duration(10.0, 2e-4),
            axes: vec![AxisConfig::Range {
                parameter: Parameter::Pressure,
                start: 1.0,
                stop: 5.0,
                count: 9,
            }],
        };

        let temperature = Study {
            name: "temperature".to_string(),
            title: Some("Ignition delay vs initial temperature (constant pressure, 5 atm)".to_string()),
            detection: DetectionRule::CumulativeRise,
            threshold: IGNITION_THRESHOLD,
            stop_at_ignition: true,
            template: RunTemplate::new(950.0, 5.0, air(1.0, 2.0, 7.52), "constant pressure"),
            horizon: SimulationHorizon::duration(10.0, 5e-4),
            axes: vec![AxisConfig::Range {
                parameter: Parameter::Temperature,
                start: 950.0,
                stop: 1450.0,
                count: 9,
            }],
        };

        let fuel = Study {
            name: "fuel".to_string(),
            title: Some("Ignition delay vs CH4 amount at several pressures (rigid vessel, 1250 K)".to_string()),
            detection: DetectionRule::ConsecutiveDelta,
            threshold: IGNITION_THRESHOLD,
            stop_at_ignition: false,
            template: RunTemplate::new(1250.0, 1.0, air(0.1, 1.0, 3.76), "constant temperature"),
            horizon: SimulationHorizon::steps(10_000, 5e-4),
            axes: vec![
                AxisConfig::Range {
                    parameter: Parameter::Pressure,
                    start: 1.0,
                    stop: 5.0,
                    count: 9,
                },
                AxisConfig::Values {
                    parameter: Parameter::SpeciesAmount("CH4".to_string()),
                    values: vec![0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
                },
            ],
        };

        Self {
            studies: vec![pressure, temperature, fuel],
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self::methane_autoignition()
    }
}

impl FromStr for StudyConfig {
    type Err = StudyError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: StudyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Study
// =============================================================================

/// One sweep with everything needed to run it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub detection: DetectionRule,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub stop_at_ignition: bool,

    pub template: RunTemplate,

    pub horizon: SimulationHorizon,

    /// Outer axis first
    pub axes: Vec<AxisConfig>,
}

fn default_threshold() -> f64 {
    IGNITION_THRESHOLD
}

impl Study {
    /// Title for reports and charts, the name when no title is set
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn grid(&self) -> StudyResult<SweepGrid> {
        let mut axes = self.axes.iter().map(AxisConfig::to_axis);
        let grid = match (axes.next(), axes.next(), axes.next()) {
            (Some(outer), None, None) => SweepGrid::one_axis(outer),
            (Some(outer), Some(inner), None) => SweepGrid::two_axis(outer, inner),
            _ => {
                return Err(StudyError::config(format!(
                    "study '{}' must have one or two axes, found {}",
                    self.name,
                    self.axes.len()
                )));
            }
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn settings(&self, parallel: bool) -> SweepSettings {
        SweepSettings::new(self.horizon)
            .detection(self.detection)
            .threshold(self.threshold)
            .stop_at_ignition(self.stop_at_ignition)
            .parallel(parallel)
    }

    pub fn validate(&self) -> StudyResult<()> {
        if self.name.trim().is_empty() {
            return Err(StudyError::config("study name is empty"));
        }
        self.template.reactor_mode()?;
        self.grid()?;
        self.settings(false).validate()?;
        self.template.composition.validate()?;
        Ok(())
    }

    /// Run the study's sweep with `simulator`
    pub fn run(&self, simulator: &dyn ReactorSimulator, parallel: bool) -> StudyResult<SweepTable> {
        info!("study '{}': {}", self.name, self.display_title());
        let grid = self.grid()?;
        SweepOrchestrator::new(simulator, self.settings(parallel)).run(&grid, &self.template)
    }
}

// =============================================================================
// Axis
// =============================================================================

/// Axis as written in a study document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisConfig {
    Values {
        parameter: Parameter,
        values: Vec<f64>,
    },
    Range {
        parameter: Parameter,
        start: f64,
        stop: f64,
        count: usize,
    },
}

impl AxisConfig {
    pub fn parameter(&self) -> &Parameter {
        match self {
            AxisConfig::Values { parameter, .. } | AxisConfig::Range { parameter, .. } => parameter,
        }
    }

    pub fn to_axis(&self) -> SweepAxis {
        match self {
            AxisConfig::Values { parameter, values } => SweepAxis::new(parameter.clone(), values.clone()),
            AxisConfig::Range {
                parameter,
                start,
                stop,
                count,
            } => SweepAxis::linspace(parameter.clone(), *start, *stop, *count),
        }
    }
}
