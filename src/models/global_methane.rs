//! Single-step global methane oxidation
//!
//! A homogeneous adiabatic reactor with one irreversible global reaction
//!
//! ```text
//! CH4 + 2 O2 → CO2 + 2 H2O
//! ```
//!
//! # Rate Law
//!
//! ```text
//! ω = A · exp(-Eₐ / R T) · [CH4]^a · [O2]^b        [mol/(m³·s)]
//! ```
//!
//! with concentrations in mol/m³. The default parameters give ignition delays
//! of tens of milliseconds for stoichiometric methane/air at 1250 K and 1 atm,
//! shrinking roughly as P^(-1/2) with pressure (total order a + b = 1.5).
//!
//! # Energy Equation
//!
//! Heat capacities are constant per species. With r = ω·V the reaction rate in
//! mol/s and Δν = Σνᵢ:
//!
//! ```text
//! constant pressure:  Σ nᵢ c_p,i · dT/dt = -ΔH · r
//! rigid vessel:       Σ nᵢ c_v,i · dT/dt = -(ΔH - Δν R T) · r
//! ```
//!
//! # Integration
//!
//! Between two output times the reactor takes classical RK4 sub-steps. Each
//! sub-step is bounded so that it converts at most a fraction of the limiting
//! reactant and raises the temperature by at most a few kelvin, which keeps the
//! explicit scheme stable through the thermal runaway.
//!
//! # Example
//!
//! ```rust
//! use ignite_rs::models::GlobalMethaneKinetics;
//! use ignite_rs::physics::{ReactorSimulator, ONE_ATMOSPHERE};
//! use ignite_rs::solver::{ReactorMode, SimulationRun};
//!
//! let run = SimulationRun::new(
//!     1250.0,
//!     ONE_ATMOSPHERE,
//!     "CH4:1, O2:2, N2:7.52".parse().unwrap(),
//!     ReactorMode::ConstantPressure,
//! ).unwrap();
//!
//! let mut reactor = GlobalMethaneKinetics::default().reactor(&run).unwrap();
//! let state = reactor.advance(1e-3).unwrap();
//! assert!(state.temperature >= 1250.0);
//! ```

use log::trace;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;
use crate::physics::{Reactor, ReactorSimulator, ThermoState, GAS_CONSTANT};
use crate::solver::{ReactorMode, SimulationRun};

// =================================================================================================
// Species
// =================================================================================================

/// Species known to the global mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Methane,
    Oxygen,
    Nitrogen,
    CarbonDioxide,
    Water,
}

impl Species {
    /// All species, in state-vector order
    pub const ALL: [Species; 5] = [
        Species::Methane,
        Species::Oxygen,
        Species::Nitrogen,
        Species::CarbonDioxide,
        Species::Water,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Species::Methane => "CH4",
            Species::Oxygen => "O2",
            Species::Nitrogen => "N2",
            Species::CarbonDioxide => "CO2",
            Species::Water => "H2O",
        }
    }

    /// Position in the amount vector
    pub fn index(&self) -> usize {
        match self {
            Species::Methane => 0,
            Species::Oxygen => 1,
            Species::Nitrogen => 2,
            Species::CarbonDioxide => 3,
            Species::Water => 4,
        }
    }

    /// Molar heat capacity at constant pressure, c_p / R
    ///
    /// Mid-range values for 1000–2500 K.
    pub fn heat_capacity_r(&self) -> f64 {
        match self {
            Species::Methane => 8.9,
            Species::Oxygen => 4.3,
            Species::Nitrogen => 4.1,
            Species::CarbonDioxide => 6.6,
            Species::Water => 5.3,
        }
    }

    /// Stoichiometric coefficient in CH4 + 2 O2 → CO2 + 2 H2O
    pub fn stoichiometry(&self) -> f64 {
        match self {
            Species::Methane => -1.0,
            Species::Oxygen => -2.0,
            Species::Nitrogen => 0.0,
            Species::CarbonDioxide => 1.0,
            Species::Water => 2.0,
        }
    }
}

impl FromStr for Species {
    type Err = SimulationError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|s| s.symbol() == symbol.trim())
            .ok_or_else(|| SimulationError::UnknownSpecies(symbol.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =================================================================================================
// Rate parameters
// =================================================================================================

/// Global rate and heat-release parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    /// Pre-exponential factor A \[(m³/mol)^(a+b-1)/s\]
    pub pre_exponential: f64,

    /// Reaction order in CH4
    pub fuel_order: f64,

    /// Reaction order in O2
    pub oxidizer_order: f64,

    /// Activation energy Eₐ \[J/mol\]
    pub activation_energy: f64,

    /// Heat of reaction ΔH per mole of CH4 \[J/mol\] (negative: exothermic)
    pub heat_of_reaction: f64,
}

impl Default for RateParameters {
    fn default() -> Self {
        Self {
            pre_exponential: 2.0e8,
            fuel_order: 0.7,
            oxidizer_order: 0.8,
            activation_energy: 202.5e3,
            heat_of_reaction: -802.3e3,
        }
    }
}

impl RateParameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.pre_exponential.is_finite() || self.pre_exponential < 0.0 {
            return Err(SimulationError::InvalidState(format!(
                "pre-exponential factor must be non-negative, got {}",
                self.pre_exponential
            )));
        }
        if self.fuel_order <= 0.0 || self.oxidizer_order <= 0.0 {
            return Err(SimulationError::InvalidState(
                "reaction orders must be positive".to_string(),
            ));
        }
        if !self.activation_energy.is_finite() || !self.heat_of_reaction.is_finite() {
            return Err(SimulationError::InvalidState(
                "activation energy and heat of reaction must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Rate ω \[mol/(m³·s)\] at temperature \[K\] and concentrations \[mol/m³\]
    #[inline]
    pub fn rate(&self, temperature: f64, fuel: f64, oxidizer: f64) -> f64 {
        if temperature <= 0.0 || fuel <= 0.0 || oxidizer <= 0.0 {
            return 0.0;
        }
        self.pre_exponential
            * (-self.activation_energy / (GAS_CONSTANT * temperature)).exp()
            * fuel.powf(self.fuel_order)
            * oxidizer.powf(self.oxidizer_order)
    }
}

// =================================================================================================
// Simulator
// =================================================================================================

/// Reactor simulator for single-step global methane oxidation
///
/// Stateless: can build any number of independent reactors, from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalMethaneKinetics {
    rates: RateParameters,

    /// Largest fraction of the limiting reactant one sub-step may convert
    max_conversion: f64,

    /// Largest temperature change one sub-step may produce \[K\]
    max_temperature_step: f64,

    /// Sub-step budget per call to `advance`
    max_substeps: usize,
}

impl Default for GlobalMethaneKinetics {
    fn default() -> Self {
        Self {
            rates: RateParameters::default(),
            max_conversion: 0.02,
            max_temperature_step: 5.0,
            max_substeps: 100_000,
        }
    }
}

impl GlobalMethaneKinetics {
    pub fn new(rates: RateParameters) -> Self {
        Self {
            rates,
            ..Default::default()
        }
    }

    pub fn rates(&self) -> &RateParameters {
        &self.rates
    }

    /// Builder pattern: set the sub-step budget per output step
    pub fn max_substeps(mut self, max_substeps: usize) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Builder pattern: set the per-sub-step conversion and temperature bounds
    pub fn step_control(mut self, max_conversion: f64, max_temperature_step: f64) -> Self {
        self.max_conversion = max_conversion;
        self.max_temperature_step = max_temperature_step;
        self
    }

    fn initial_amounts(run: &SimulationRun, total_amount: f64) -> Result<DVector<f64>, SimulationError> {
        let mut amounts = DVector::zeros(Species::ALL.len());
        let composition = run.composition();
        let total = composition.total();

        for (symbol, amount) in composition.iter() {
            let species: Species = symbol.parse()?;
            amounts[species.index()] = total_amount * amount / total;
        }

        Ok(amounts)
    }
}

impl ReactorSimulator for GlobalMethaneKinetics {
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
        self.rates.validate()?;
        if !(self.max_conversion > 0.0 && self.max_conversion < 1.0) || self.max_temperature_step <= 0.0 {
            return Err(SimulationError::InvalidState(
                "sub-step bounds must be positive (conversion below 1)".to_string(),
            ));
        }

        // 1 m³ of gas at the initial state; results are intensive so the size is arbitrary
        let volume = 1.0;
        let temperature = run.initial_temperature();
        let pressure = run.initial_pressure();
        let total_amount = pressure * volume / (GAS_CONSTANT * temperature);

        let amounts = Self::initial_amounts(run, total_amount)?;

        let mut state = DVector::zeros(Species::ALL.len() + 1);
        state[0] = temperature;
        state.rows_mut(1, Species::ALL.len()).copy_from(&amounts);

        Ok(Box::new(GlobalMethaneReactor {
            kinetics: self.clone(),
            mode: run.reactor_mode(),
            pressure,
            volume,
            state,
            time: 0.0,
        }))
    }

    fn name(&self) -> &str {
        "Global methane kinetics"
    }
}

// =================================================================================================
// Reactor
// =================================================================================================

/// One adiabatic reactor advanced by [`GlobalMethaneKinetics`]
///
/// State vector: `[T, n_CH4, n_O2, n_N2, n_CO2, n_H2O]` (K, mol).
#[derive(Debug, Clone)]
pub struct GlobalMethaneReactor {
    kinetics: GlobalMethaneKinetics,
    mode: ReactorMode,
    /// Held pressure in constant-pressure mode \[Pa\]
    pressure: f64,
    /// Held volume in rigid-vessel mode \[m³\]
    volume: f64,
    state: DVector<f64>,
    time: f64,
}

impl GlobalMethaneReactor {
    fn total_amount(state: &DVector<f64>) -> f64 {
        state.rows(1, Species::ALL.len()).iter().map(|n| n.max(0.0)).sum()
    }

    fn volume_of(&self, state: &DVector<f64>) -> f64 {
        match self.mode {
            ReactorMode::ConstantPressure => {
                Self::total_amount(state) * GAS_CONSTANT * state[0] / self.pressure
            }
            ReactorMode::ConstantTemperature => self.volume,
        }
    }

    fn pressure_of(&self, state: &DVector<f64>) -> f64 {
        match self.mode {
            ReactorMode::ConstantPressure => self.pressure,
            ReactorMode::ConstantTemperature => {
                Self::total_amount(state) * GAS_CONSTANT * state[0] / self.volume
            }
        }
    }

    /// Reaction rate r = ω·V \[mol/s\]
    fn reaction_rate(&self, state: &DVector<f64>) -> f64 {
        let volume = self.volume_of(state);
        if volume <= 0.0 {
            return 0.0;
        }
        let fuel = state[1 + Species::Methane.index()].max(0.0) / volume;
        let oxidizer = state[1 + Species::Oxygen.index()].max(0.0) / volume;
        self.kinetics.rates.rate(state[0], fuel, oxidizer) * volume
    }

    /// Right-hand side of d[T, n]/dt, and the reaction rate it used
    fn derivative(&self, state: &DVector<f64>) -> (DVector<f64>, f64) {
        let rate = self.reaction_rate(state);
        let mut derivative = DVector::zeros(state.len());

        if rate == 0.0 {
            return (derivative, 0.0);
        }

        let temperature = state[0];
        let rates = &self.kinetics.rates;

        let mut heat_capacity = 0.0;
        let mut delta_nu = 0.0;
        for species in Species::ALL {
            let amount = state[1 + species.index()].max(0.0);
            let cp = species.heat_capacity_r() * GAS_CONSTANT;
            heat_capacity += match self.mode {
                ReactorMode::ConstantPressure => amount * cp,
                ReactorMode::ConstantTemperature => amount * (cp - GAS_CONSTANT),
            };
            delta_nu += species.stoichiometry();
            derivative[1 + species.index()] = species.stoichiometry() * rate;
        }

        let heat_release = match self.mode {
            ReactorMode::ConstantPressure => -rates.heat_of_reaction * rate,
            ReactorMode::ConstantTemperature => {
                -(rates.heat_of_reaction - delta_nu * GAS_CONSTANT * temperature) * rate
            }
        };

        derivative[0] = if heat_capacity > 0.0 { heat_release / heat_capacity } else { 0.0 };

        (derivative, rate)
    }

    /// Amount of limiting reactant, in moles of reaction
    fn limiting_extent(state: &DVector<f64>) -> f64 {
        Species::ALL
            .iter()
            .filter(|s| s.stoichiometry() < 0.0)
            .map(|s| state[1 + s.index()].max(0.0) / -s.stoichiometry())
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest stable sub-step from the current derivative
    fn substep_limit(&self, state: &DVector<f64>, derivative: &DVector<f64>, rate: f64) -> f64 {
        let mut limit = f64::INFINITY;

        if rate > 0.0 {
            let floor = 1e-9 * Self::total_amount(state);
            let extent = Self::limiting_extent(state).max(floor);
            limit = limit.min(self.kinetics.max_conversion * extent / rate);
        }

        let heating = derivative[0].abs();
        if heating > 0.0 {
            limit = limit.min(self.kinetics.max_temperature_step / heating);
        }

        limit
    }

    /// One classical RK4 sub-step of size h
    fn rk4_step(&self, state: &DVector<f64>, k1: &DVector<f64>, h: f64) -> DVector<f64> {
        let (k2, _) = self.derivative(&(state + k1 * (h / 2.0)));
        let (k3, _) = self.derivative(&(state + &k2 * (h / 2.0)));
        let (k4, _) = self.derivative(&(state + &k3 * h));

        let mut next = state + (k1 + &k2 * 2.0 + &k3 * 2.0 + &k4) * (h / 6.0);

        // Overshoot past exhaustion of a reactant is clipped
        for amount in next.rows_mut(1, Species::ALL.len()).iter_mut() {
            if *amount < 0.0 {
                *amount = 0.0;
            }
        }

        next
    }
}

impl Reactor for GlobalMethaneReactor {
    fn species_names(&self) -> Vec<String> {
        Species::ALL.iter().map(|s| s.symbol().to_string()).collect()
    }

    fn state(&self) -> ThermoState {
        let amounts = self.state.rows(1, Species::ALL.len()).map(|n| n.max(0.0));
        let total = amounts.sum();
        let mole_fractions = if total > 0.0 { amounts / total } else { amounts };

        ThermoState::new(
            self.state[0],
            self.pressure_of(&self.state),
            self.volume_of(&self.state),
            mole_fractions,
        )
    }

    fn advance(&mut self, time: f64) -> Result<ThermoState, SimulationError> {
        if time <= self.time {
            return Err(SimulationError::Engine(format!(
                "cannot advance backwards from t = {} s to t = {} s",
                self.time, time
            )));
        }

        let mut substeps = 0;

        while self.time < time {
            if substeps == self.kinetics.max_substeps {
                return Err(SimulationError::Convergence {
                    time: self.time,
                    message: format!(
                        "{} sub-steps were not enough to reach t = {} s",
                        substeps, time
                    ),
                });
            }

            let remaining = time - self.time;
            let (k1, rate) = self.derivative(&self.state);
            let limit = self.substep_limit(&self.state, &k1, rate);
            let h = remaining.min(limit);

            let next = self.rk4_step(&self.state, &k1, h);
            if next.iter().any(|x| !x.is_finite()) {
                return Err(SimulationError::NonFinite {
                    quantity: "reactor state",
                    time: self.time + h,
                });
            }

            self.state = next;
            self.time = if h >= remaining { time } else { self.time + h };
            substeps += 1;
        }

        trace!("advanced to t = {} s in {} sub-steps", time, substeps);

        Ok(self.state())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Composition, ONE_ATMOSPHERE};
    use approx::assert_relative_eq;

    fn run(composition: &str, mode: ReactorMode) -> SimulationRun {
        SimulationRun::new(
            1250.0,
            ONE_ATMOSPHERE,
            composition.parse::<Composition>().unwrap(),
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_species_symbols_round_trip_through_parse() {
        for species in Species::ALL {
            assert_eq!(species.symbol().parse::<Species>().unwrap(), species);
        }
    }

    #[test]
    fn test_stoichiometry_conserves_moles() {
        let delta_nu: f64 = Species::ALL.iter().map(Species::stoichiometry).sum();
        assert_eq!(delta_nu, 0.0);
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let kinetics = GlobalMethaneKinetics::default();
        let error = kinetics
            .reactor(&run("CH4:1, AR:1", ReactorMode::ConstantPressure))
            .err()
            .unwrap();
        assert_eq!(error, SimulationError::UnknownSpecies("AR".to_string()));
    }

    #[test]
    fn test_initial_state_matches_run() {
        let kinetics = GlobalMethaneKinetics::default();
        let reactor = kinetics
            .reactor(&run("CH4:1, O2:2, N2:7.52", ReactorMode::ConstantPressure))
            .unwrap();

        let state = reactor.state();
        assert_eq!(state.temperature, 1250.0);
        assert_relative_eq!(state.pressure, ONE_ATMOSPHERE, max_relative = 1e-12);
        assert_relative_eq!(state.mole_fractions[0], 1.0 / 10.52, max_relative = 1e-12);
        assert_relative_eq!(state.mole_fractions.sum(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_inert_gas_keeps_its_temperature() {
        let kinetics = GlobalMethaneKinetics::default();
        let mut reactor = kinetics.reactor(&run("N2:1", ReactorMode::ConstantPressure)).unwrap();

        let state = reactor.advance(0.01).unwrap();
        assert_eq!(state.temperature, 1250.0);
    }

    #[test]
    fn test_cannot_advance_backwards() {
        let kinetics = GlobalMethaneKinetics::default();
        let mut reactor = kinetics.reactor(&run("N2:1", ReactorMode::ConstantPressure)).unwrap();
        reactor.advance(0.01).unwrap();
        assert!(matches!(reactor.advance(0.005), Err(SimulationError::Engine(_))));
    }

    #[test]
    fn test_stoichiometric_mixture_burns_out() {
        let kinetics = GlobalMethaneKinetics::default();
        let mut reactor = kinetics
            .reactor(&run("CH4:1, O2:2, N2:7.52", ReactorMode::ConstantPressure))
            .unwrap();

        let state = reactor.advance(1.0).unwrap();

        assert!(state.temperature > 1250.0 + 1500.0, "final T = {}", state.temperature);
        assert!(state.mole_fractions[Species::Methane.index()] < 1e-3);
        assert_relative_eq!(state.pressure, ONE_ATMOSPHERE, max_relative = 1e-12);
    }

    #[test]
    fn test_rigid_vessel_pressure_follows_temperature() {
        // Δν = 0: the amount of gas is constant, so P/T is constant too
        let kinetics = GlobalMethaneKinetics::default();
        let mut reactor = kinetics
            .reactor(&run("CH4:1, O2:2, N2:7.52", ReactorMode::ConstantTemperature))
            .unwrap();

        let state = reactor.advance(1.0).unwrap();

        assert!(state.temperature > 1650.0);
        assert_relative_eq!(
            state.pressure / state.temperature,
            ONE_ATMOSPHERE / 1250.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(state.volume, 1.0);
    }

    #[test]
    fn test_substep_budget_is_enforced() {
        let kinetics = GlobalMethaneKinetics::default().max_substeps(3);
        let mut reactor = kinetics
            .reactor(&run("CH4:1, O2:2, N2:7.52", ReactorMode::ConstantPressure))
            .unwrap();

        assert!(matches!(reactor.advance(1.0), Err(SimulationError::Convergence { .. })));
    }

    #[test]
    fn test_invalid_rate_parameters_are_rejected() {
        let rates = RateParameters {
            fuel_order: 0.0,
            ..RateParameters::default()
        };
        let kinetics = GlobalMethaneKinetics::new(rates);
        assert!(kinetics.reactor(&run("CH4:1, O2:2", ReactorMode::ConstantPressure)).is_err());
    }

    #[test]
    fn test_invalid_step_control_is_rejected() {
        let run = run("CH4:1, O2:2", ReactorMode::ConstantPressure);
        for (conversion, temperature_step) in [(1.5, 5.0), (0.0, 5.0), (0.02, 0.0)] {
            let kinetics = GlobalMethaneKinetics::default().step_control(conversion, temperature_step);
            assert!(
                matches!(kinetics.reactor(&run), Err(SimulationError::InvalidState(_))),
                "({}, {})",
                conversion,
                temperature_step
            );
        }
    }
}
