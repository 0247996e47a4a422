//! Simulation run definition
//!
//! A run combines an initial gas state with the thermodynamic constraint the
//! reactor is held under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StudyError, StudyResult};
use crate::physics::{Composition, ONE_ATMOSPHERE};

/// Thermodynamic constraint of the reactor
///
/// Parsed from the mode strings used in study documents:
///
/// | String | Mode |
/// |---|---|
/// | `constant temperature`, `constant-temperature` | [`ReactorMode::ConstantTemperature`] |
/// | `constant pressure`, `constant-pressure` | [`ReactorMode::ConstantPressure`] |
///
/// Any other string is a configuration error naming the offending string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactorMode {
    /// Rigid adiabatic vessel referenced to its initial temperature
    ///
    /// Volume is fixed; pressure follows the gas.
    ConstantTemperature,

    /// Adiabatic reactor held at its initial pressure
    ///
    /// Volume follows the gas.
    ConstantPressure,
}

impl ReactorMode {
    pub fn name(&self) -> &'static str {
        match self {
            ReactorMode::ConstantTemperature => "constant-temperature",
            ReactorMode::ConstantPressure => "constant-pressure",
        }
    }
}

impl FromStr for ReactorMode {
    type Err = StudyError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim().replace(['-', '_'], " ").as_str() {
            "constant temperature" => Ok(ReactorMode::ConstantTemperature),
            "constant pressure" => Ok(ReactorMode::ConstantPressure),
            _ => Err(StudyError::UnknownReactorMode(mode.to_string())),
        }
    }
}

impl fmt::Display for ReactorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete simulator invocation
///
/// Immutable once built: fields are only readable through accessors.
///
/// # Examples
///
/// ```rust
/// use ignite_rs::physics::{Composition, ONE_ATMOSPHERE};
/// use ignite_rs::solver::{ReactorMode, SimulationRun};
///
/// let run = SimulationRun::new(
///     1250.0,
///     2.0 * ONE_ATMOSPHERE,
///     "CH4:1, O2:2, N2:7.52".parse::<Composition>().unwrap(),
///     ReactorMode::ConstantTemperature,
/// ).unwrap();
///
/// assert_eq!(run.initial_pressure_atm(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    initial_temperature: f64,
    initial_pressure: f64,
    composition: Composition,
    reactor_mode: ReactorMode,
}

impl SimulationRun {
    /// Create a run
    ///
    /// * `initial_temperature` - \[K\], finite and positive
    /// * `initial_pressure` - \[Pa\], finite and positive
    pub fn new(
        initial_temperature: f64,
        initial_pressure: f64,
        composition: Composition,
        reactor_mode: ReactorMode,
    ) -> StudyResult<Self> {
        if !initial_temperature.is_finite() || initial_temperature <= 0.0 {
            return Err(StudyError::config(format!(
                "initial temperature must be positive, got {} K",
                initial_temperature
            )));
        }
        if !initial_pressure.is_finite() || initial_pressure <= 0.0 {
            return Err(StudyError::config(format!(
                "initial pressure must be positive, got {} Pa",
                initial_pressure
            )));
        }
        composition.validate()?;

        Ok(Self {
            initial_temperature,
            initial_pressure,
            composition,
            reactor_mode,
        })
    }

    /// Initial temperature \[K\]
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    /// Initial pressure \[Pa\]
    pub fn initial_pressure(&self) -> f64 {
        self.initial_pressure
    }

    /// Initial pressure \[atm\]
    pub fn initial_pressure_atm(&self) -> f64 {
        self.initial_pressure / ONE_ATMOSPHERE
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn reactor_mode(&self) -> ReactorMode {
        self.reactor_mode
    }
}

impl fmt::Display for SimulationRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} K, {:.4} atm, [{}], {}",
            self.initial_temperature,
            self.initial_pressure_atm(),
            self.composition,
            self.reactor_mode
        )
    }
}

// ================================================================================================
// Tests
// ================================================================================================
