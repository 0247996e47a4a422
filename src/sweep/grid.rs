//! Sweep axes, grids and run templates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StudyError, StudyResult};
use crate::physics::{Composition, ONE_ATMOSPHERE};
use crate::solver::{ReactorMode, SimulationRun};

// =================================================================================================
// Parameter
// =================================================================================================

/// Run parameter an axis can vary
///
/// Written in study documents as `"temperature"`, `"pressure"` or
/// `"amount:<species>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Parameter {
    /// Initial temperature \[K\]
    Temperature,

    /// Initial pressure \[atm\]
    Pressure,

    /// Initial amount of one species in the composition
    SpeciesAmount(String),
}

impl Parameter {
    /// Short label used in reports and chart axes
    pub fn label(&self) -> String {
        match self {
            Parameter::Temperature => "temperature".to_string(),
            Parameter::Pressure => "pressure".to_string(),
            Parameter::SpeciesAmount(species) => format!("{} amount", species),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "K",
            Parameter::Pressure => "atm",
            Parameter::SpeciesAmount(_) => "mol",
        }
    }

    /// Apply a value of this parameter to a template
    fn apply(&self, template: &mut RunTemplate, value: f64) {
        match self {
            Parameter::Temperature => template.temperature = value,
            Parameter::Pressure => template.pressure = value,
            Parameter::SpeciesAmount(species) => template.composition.set_amount(species, value),
        }
    }
}

impl FromStr for Parameter {
    type Err = StudyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        match text {
            "temperature" => Ok(Parameter::Temperature),
            "pressure" => Ok(Parameter::Pressure),
            _ => match text.split_once(':') {
                Some(("amount", species)) if !species.trim().is_empty() => {
                    Ok(Parameter::SpeciesAmount(species.trim().to_string()))
                }
                _ => Err(StudyError::config(format!(
                    "unknown sweep parameter '{}' (expected temperature, pressure or amount:<species>)",
                    text
                ))),
            },
        }
    }
}

impl TryFrom<String> for Parameter {
    type Error = StudyError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<Parameter> for String {
    fn from(parameter: Parameter) -> Self {
        parameter.to_string()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Temperature => f.write_str("temperature"),
            Parameter::Pressure => f.write_str("pressure"),
            Parameter::SpeciesAmount(species) => write!(f, "amount:{}", species),
        }
    }
}

// =================================================================================================
// Axis and grid
// =================================================================================================

/// Ordered values of one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepAxis {
    pub parameter: Parameter,
    pub values: Vec<f64>,
}

impl SweepAxis {
    pub fn new(parameter: Parameter, values: Vec<f64>) -> Self {
        Self { parameter, values }
    }

    /// `count` evenly spaced values from `start` to `stop`, both included
    ///
    /// ```rust
    /// use ignite_rs::sweep::{Parameter, SweepAxis};
    ///
    /// let axis = SweepAxis::linspace(Parameter::Pressure, 1.0, 5.0, 9);
    /// assert_eq!(axis.values[1], 1.5);
    /// assert_eq!(axis.values[8], 5.0);
    /// ```
    pub fn linspace(parameter: Parameter, start: f64, stop: f64, count: usize) -> Self {
        let values = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f64;
                (0..count)
                    .map(|i| if i == count - 1 { stop } else { start + step * i as f64 })
                    .collect()
            }
        };
        Self { parameter, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn validate(&self) -> StudyResult<()> {
        if self.values.is_empty() {
            return Err(StudyError::config(format!("{} axis has no values", self.parameter)));
        }
        if let Some(value) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(StudyError::config(format!(
                "{} axis contains a non-finite value ({})",
                self.parameter, value
            )));
        }
        Ok(())
    }
}

/// One or two sweep axes
///
/// Grid points are visited outer axis first, then inner axis: for outer
/// values `[a, b]` and inner values `[x, y]` the order is
/// `(a, x), (a, y), (b, x), (b, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub outer: SweepAxis,
    pub inner: Option<SweepAxis>,
}

impl SweepGrid {
    pub fn one_axis(axis: SweepAxis) -> Self {
        Self { outer: axis, inner: None }
    }

    pub fn two_axis(outer: SweepAxis, inner: SweepAxis) -> Self {
        Self {
            outer,
            inner: Some(inner),
        }
    }

    /// Axes in visiting order (outer first)
    pub fn axes(&self) -> Vec<&SweepAxis> {
        std::iter::once(&self.outer).chain(self.inner.as_ref()).collect()
    }

    /// (outer length, inner length); a one-axis grid has inner length 1
    pub fn shape(&self) -> (usize, usize) {
        (self.outer.len(), self.inner.as_ref().map_or(1, SweepAxis::len))
    }

    pub fn len(&self) -> usize {
        let (outer, inner) = self.shape();
        outer * inner
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> StudyResult<()> {
        self.outer.validate()?;
        if let Some(inner) = &self.inner {
            inner.validate()?;
            if inner.parameter == self.outer.parameter {
                return Err(StudyError::config(format!(
                    "both sweep axes vary the same parameter ({})",
                    inner.parameter
                )));
            }
        }
        Ok(())
    }

    /// All grid points, in visiting order
    pub fn points(&self) -> Vec<GridPoint> {
        let mut points = Vec::with_capacity(self.len());

        for (i, &outer) in self.outer.values.iter().enumerate() {
            match &self.inner {
                None => points.push(GridPoint {
                    index: vec![i],
                    values: vec![(self.outer.parameter.clone(), outer)],
                }),
                Some(inner_axis) => {
                    for (j, &inner) in inner_axis.values.iter().enumerate() {
                        points.push(GridPoint {
                            index: vec![i, j],
                            values: vec![
                                (self.outer.parameter.clone(), outer),
                                (inner_axis.parameter.clone(), inner),
                            ],
                        });
                    }
                }
            }
        }

        points
    }
}

/// One concrete combination of swept values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPoint {
    /// Position along each axis, outer first
    pub index: Vec<usize>,

    /// Parameter values at this point, outer first
    pub values: Vec<(Parameter, f64)>,
}

impl GridPoint {
    /// Value of `parameter` at this point, if it is swept
    pub fn value(&self, parameter: &Parameter) -> Option<f64> {
        self.values.iter().find(|(p, _)| p == parameter).map(|(_, v)| *v)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|(parameter, value)| format!("{} = {} {}", parameter, value, parameter.unit()))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

// =================================================================================================
// Run template
// =================================================================================================

/// Fixed part of every run in a sweep
///
/// Swept parameters override the matching template field at each grid point.
/// The reactor mode is kept as written in the study document and parsed once,
/// before any run is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTemplate {
    /// Initial temperature \[K\]
    pub temperature: f64,

    /// Initial pressure \[atm\]
    pub pressure: f64,

    /// Reactor mode string, e.g. `"constant pressure"`
    pub reactor: String,

    pub composition: Composition,
}

impl RunTemplate {
    pub fn new(temperature: f64, pressure: f64, composition: Composition, reactor: impl Into<String>) -> Self {
        Self {
            temperature,
            pressure,
            composition,
            reactor: reactor.into(),
        }
    }

    pub fn reactor_mode(&self) -> StudyResult<ReactorMode> {
        self.reactor.parse()
    }

    /// Build the run for one grid point
    pub fn instantiate(&self, mode: ReactorMode, point: &GridPoint) -> StudyResult<SimulationRun> {
        let mut template = self.clone();
        for (parameter, value) in &point.values {
            parameter.apply(&mut template, *value);
        }
        SimulationRun::new(
            template.temperature,
            template.pressure * ONE_ATMOSPHERE,
            template.composition,
            mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> RunTemplate {
        RunTemplate::new(1250.0, 1.0, "CH4:1, O2:2, N2:7.52".parse().unwrap(), "constant pressure")
    }

    #[test]
    fn test_parameter_strings() {
        assert_eq!("temperature".parse::<Parameter>().unwrap(), Parameter::Temperature);
        assert_eq!(
            "amount:CH4".parse::<Parameter>().unwrap(),
            Parameter::SpeciesAmount("CH4".to_string())
        );
        assert_eq!(Parameter::SpeciesAmount("CH4".to_string()).to_string(), "amount:CH4");
        assert!("fraction".parse::<Parameter>().is_err());
        assert!("amount:".parse::<Parameter>().is_err());
    }

    #[test]
    fn test_linspace_is_inclusive() {
        let axis = SweepAxis::linspace(Parameter::Temperature, 950.0, 1450.0, 9);
        assert_eq!(axis.len(), 9);
        assert_eq!(axis.values[0], 950.0);
        assert_eq!(axis.values[4], 1200.0);
        assert_eq!(axis.values[8], 1450.0);

        assert_eq!(SweepAxis::linspace(Parameter::Pressure, 2.0, 5.0, 1).values, vec![2.0]);
        assert!(SweepAxis::linspace(Parameter::Pressure, 2.0, 5.0, 0).is_empty());
    }

    #[test]
    fn test_two_axis_order_is_outer_then_inner() {
        let grid = SweepGrid::two_axis(
            SweepAxis::new(Parameter::Pressure, vec![1.0, 2.0]),
            SweepAxis::new(Parameter::SpeciesAmount("CH4".to_string()), vec![0.1, 0.2, 0.3]),
        );

        let points = grid.points();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(points.len(), 6);

        let indices: Vec<Vec<usize>> = points.iter().map(|p| p.index.clone()).collect();
        assert_eq!(
            indices,
            vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 1], vec![1, 2]]
        );
        assert_eq!(points[4].value(&Parameter::Pressure), Some(2.0));
        assert_eq!(points[4].value(&Parameter::SpeciesAmount("CH4".to_string())), Some(0.2));
        assert_eq!(points[4].value(&Parameter::Temperature), None);
    }

    #[test]
    fn test_grid_validation() {
        let empty = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![]));
        assert!(empty.validate().is_err());

        let nan = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![1.0, f64::NAN]));
        assert!(nan.validate().is_err());

        let same = SweepGrid::two_axis(
            SweepAxis::new(Parameter::Pressure, vec![1.0]),
            SweepAxis::new(Parameter::Pressure, vec![2.0]),
        );
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_instantiate_overrides_swept_fields() {
        let grid = SweepGrid::two_axis(
            SweepAxis::new(Parameter::Pressure, vec![3.0]),
            SweepAxis::new(Parameter::SpeciesAmount("CH4".to_string()), vec![0.5]),
        );
        let point = &grid.points()[0];

        let run = template().instantiate(ReactorMode::ConstantPressure, point).unwrap();
        assert_eq!(run.initial_pressure(), 3.0 * ONE_ATMOSPHERE);
        assert_eq!(run.initial_temperature(), 1250.0);
        assert_eq!(run.composition().amount("CH4"), 0.5);
        assert_eq!(run.composition().amount("O2"), 2.0);
    }

    #[test]
    fn test_instantiate_rejects_non_physical_value() {
        let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![-1.0]));
        let error = template()
            .instantiate(ReactorMode::ConstantPressure, &grid.points()[0])
            .unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_point_display() {
        let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Temperature, vec![1250.0]));
        assert_eq!(grid.points()[0].to_string(), "temperature = 1250 K");
    }
}
