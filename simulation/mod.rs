/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Hydraulic solver contract and playback over its results.
//!
//! No hydraulic engine ships with the crate. [`StubSolver`] produces the
//! period axis only, so every per-element lookup reports "no data".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowUnits {
    #[default]
    Lps,
    Lpm,
    Cmh,
    Cmd,
    Gpm,
    Cfs,
    Afd,
    Mgd,
    Imgd,
    Mld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HeadlossFormula {
    /// Hazen-Williams
    #[default]
    #[serde(rename = "HW")]
    HazenWilliams,
    /// Darcy-Weisbach
    #[serde(rename = "DW")]
    DarcyWeisbach,
    /// Chezy-Manning
    #[serde(rename = "CM")]
    ChezyManning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DemandModel {
    /// Demand driven
    #[default]
    #[serde(rename = "DDA")]
    DemandDriven,
    /// Pressure driven
    #[serde(rename = "PDA")]
    PressureDriven,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Statistic {
    #[default]
    None,
    Average,
    Minimum,
    Maximum,
    Range,
}

/// Longest run accepted, ten years of hourly periods.
pub const MAX_DURATION_HOURS: u32 = 10 * 8784;

/// Run parameters. Times are in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub duration: u32,
    pub hydraulic_timestep: f64,
    pub quality_timestep: f64,
    pub pattern_timestep: f64,
    pub pattern_start: f64,
    pub report_timestep: f64,
    pub report_start: f64,
    pub start_clock_time: f64,
    pub statistic: Statistic,
    pub check_freq: u32,
    pub max_check: u32,
    pub damping_limit: f64,
    pub specific_gravity: f64,
    pub relative_viscosity: f64,
    pub trials: u32,
    pub accuracy: f64,
    pub tolerance: f64,
    pub emitter_exponent: f64,
    pub demand_model: DemandModel,
    pub minimum_pressure: f64,
    pub required_pressure: f64,
    pub pressure_exponent: f64,
    pub flow_units: FlowUnits,
    pub headloss_formula: HeadlossFormula,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            duration: 24,
            hydraulic_timestep: 1.0,
            quality_timestep: 0.25,
            pattern_timestep: 1.0,
            pattern_start: 0.0,
            report_timestep: 1.0,
            report_start: 0.0,
            start_clock_time: 0.0,
            statistic: Statistic::None,
            check_freq: 2,
            max_check: 10,
            damping_limit: 0.0,
            specific_gravity: 1.0,
            relative_viscosity: 1.0,
            trials: 40,
            accuracy: 0.001,
            tolerance: 0.01,
            emitter_exponent: 0.5,
            demand_model: DemandModel::DemandDriven,
            minimum_pressure: 0.0,
            required_pressure: 0.1,
            pressure_exponent: 0.5,
            flow_units: FlowUnits::Lps,
            headloss_formula: HeadlossFormula::HazenWilliams,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSeries {
    pub pressure: Vec<f64>,
    pub head: Vec<f64>,
    pub demand: Vec<f64>,
    pub quality: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Open,
    Closed,
    Active,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkSeries {
    pub flow: Vec<f64>,
    pub velocity: Vec<f64>,
    pub headloss: Vec<f64>,
    pub status: Vec<LinkState>,
}

/// Per-period values keyed by element id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResults {
    pub time_periods: Vec<u32>,
    pub node_series: HashMap<String, NodeSeries>,
    pub link_series: HashMap<String, LinkSeries>,
}

impl SimulationResults {
    pub fn period_count(&self) -> usize {
        self.time_periods.len()
    }

    pub fn node(&self, id: &str) -> Option<&NodeSeries> {
        self.node_series.get(id)
    }

    pub fn link(&self, id: &str) -> Option<&LinkSeries> {
        self.link_series.get(id)
    }

    pub fn pressure_at(&self, node: &str, period: usize) -> Option<f64> {
        self.node(node)?.pressure.get(period).copied()
    }

    pub fn flow_at(&self, link: &str, period: usize) -> Option<f64> {
        self.link(link)?.flow.get(period).copied()
    }

    /// Smallest and largest pressure over every node and period.
    pub fn pressure_range(&self) -> Option<(f64, f64)> {
        self.node_series
            .values()
            .flat_map(|series| series.pressure.iter().copied())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    InvalidOptions(String),
    Failed(String),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::InvalidOptions(reason) => write!(f, "Invalid simulation options: {reason}"),
            SolverError::Failed(reason) => write!(f, "Simulation failed: {reason}"),
        }
    }
}

impl std::error::Error for SolverError {}

pub trait Solver {
    fn solve(
        &self,
        network: &Graph,
        options: &SimulationOptions,
    ) -> Result<SimulationResults, SolverError>;
}

/// Produces `duration + 1` hourly periods and no series.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSolver;

impl Solver for StubSolver {
    fn solve(
        &self,
        network: &Graph,
        options: &SimulationOptions,
    ) -> Result<SimulationResults, SolverError> {
        if options.hydraulic_timestep <= 0.0 {
            return Err(SolverError::InvalidOptions(format!(
                "hydraulic timestep must be positive, got {}",
                options.hydraulic_timestep
            )));
        }
        if options.duration > MAX_DURATION_HOURS {
            return Err(SolverError::InvalidOptions(format!(
                "duration {} h exceeds the {MAX_DURATION_HOURS} h limit",
                options.duration
            )));
        }
        log::debug!(
            "stub solve: {} nodes, {} links, {} periods",
            network.node_count(),
            network.link_count(),
            options.duration.saturating_add(1)
        );
        Ok(SimulationResults {
            time_periods: (0..=options.duration).collect(),
            ..SimulationResults::default()
        })
    }
}

/// Options, the latest results and a playback cursor over them.
#[derive(Debug, Clone, Default)]
pub struct SimulationSession {
    pub options: SimulationOptions,
    results: Option<SimulationResults>,
    current_time: usize,
    playing: bool,
}

impl SimulationSession {
    pub fn new(options: SimulationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn results(&self) -> Option<&SimulationResults> {
        self.results.as_ref()
    }

    pub fn current_time(&self) -> usize {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Replace the results with a fresh run. On failure the previous
    /// results are discarded as well.
    pub fn run(
        &mut self,
        solver: &dyn Solver,
        network: &Graph,
    ) -> Result<&SimulationResults, SolverError> {
        self.results = None;
        self.current_time = 0;
        self.playing = false;
        match solver.solve(network, &self.options) {
            Ok(results) => {
                log::info!("simulation finished with {} periods", results.period_count());
                Ok(self.results.insert(results))
            },
            Err(error) => {
                log::warn!("{error}");
                Err(error)
            },
        }
    }

    /// Clamped to the period range; ignored without results.
    pub fn set_current_time(&mut self, time: usize) {
        if let Some(results) = &self.results {
            let last = results.period_count().saturating_sub(1);
            self.current_time = time.min(last);
        }
    }

    pub fn play(&mut self) -> bool {
        self.playing = self.results.is_some();
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// One playback step. Past the last period the cursor returns to 0 and
    /// playback stops. Returns whether playback continues.
    pub fn advance(&mut self) -> bool {
        let Some(results) = &self.results else {
            return false;
        };
        if !self.playing {
            return false;
        }
        let next = self.current_time + 1;
        if next >= results.period_count() {
            self.current_time = 0;
            self.playing = false;
            return false;
        }
        self.current_time = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_periods(duration: u32) -> SimulationSession {
        let mut session = SimulationSession::new(SimulationOptions {
            duration,
            ..SimulationOptions::default()
        });
        session.run(&StubSolver, &Graph::new()).unwrap();
        session
    }

    #[test]
    fn test_stub_solver_period_axis() {
        let results = StubSolver
            .solve(&Graph::new(), &SimulationOptions::default())
            .unwrap();
        assert_eq!(results.period_count(), 25);
        assert_eq!(results.time_periods.first(), Some(&0));
        assert_eq!(results.time_periods.last(), Some(&24));
        assert!(results.node("J1").is_none());
        assert_eq!(results.pressure_at("J1", 0), None);
        assert_eq!(results.pressure_range(), None);
    }

    #[test]
    fn test_stub_solver_rejects_zero_timestep() {
        let options = SimulationOptions {
            hydraulic_timestep: 0.0,
            ..SimulationOptions::default()
        };
        let err = StubSolver.solve(&Graph::new(), &options).unwrap_err();
        assert!(matches!(err, SolverError::InvalidOptions(_)));
    }

    #[test]
    fn test_stub_solver_rejects_excessive_duration() {
        let options = SimulationOptions {
            duration: u32::MAX,
            ..SimulationOptions::default()
        };
        let err = StubSolver.solve(&Graph::new(), &options).unwrap_err();
        assert!(matches!(err, SolverError::InvalidOptions(_)));

        let options = SimulationOptions {
            duration: MAX_DURATION_HOURS,
            ..SimulationOptions::default()
        };
        let results = StubSolver.solve(&Graph::new(), &options).unwrap();
        assert_eq!(results.period_count(), MAX_DURATION_HOURS as usize + 1);
    }

    #[test]
    fn test_pressure_range_spans_all_nodes() {
        let mut results = SimulationResults::default();
        results.node_series.insert(
            "J1".to_string(),
            NodeSeries {
                pressure: vec![30.0, 12.5],
                ..NodeSeries::default()
            },
        );
        results.node_series.insert(
            "J2".to_string(),
            NodeSeries {
                pressure: vec![44.0],
                ..NodeSeries::default()
            },
        );
        assert_eq!(results.pressure_range(), Some((12.5, 44.0)));
        assert_eq!(results.pressure_at("J1", 1), Some(12.5));
        assert_eq!(results.pressure_at("J1", 2), None);
    }

    #[test]
    fn test_set_current_time_clamps() {
        let mut session = session_with_periods(3);
        session.set_current_time(10);
        assert_eq!(session.current_time(), 3);
        session.set_current_time(1);
        assert_eq!(session.current_time(), 1);
    }

    #[test]
    fn test_set_current_time_without_results_is_ignored() {
        let mut session = SimulationSession::default();
        session.set_current_time(4);
        assert_eq!(session.current_time(), 0);
    }

    #[test]
    fn test_advance_wraps_and_stops() {
        let mut session = session_with_periods(2);
        assert!(session.play());
        assert!(session.advance());
        assert!(session.advance());
        assert_eq!(session.current_time(), 2);
        assert!(!session.advance());
        assert_eq!(session.current_time(), 0);
        assert!(!session.is_playing());
    }

    #[test]
    fn test_options_toml_keywords() {
        let options: SimulationOptions =
            toml::from_str("flow_units = \"GPM\"\nheadloss_formula = \"DW\"\nduration = 6\n")
                .unwrap();
        assert_eq!(options.flow_units, FlowUnits::Gpm);
        assert_eq!(options.headloss_formula, HeadlossFormula::DarcyWeisbach);
        assert_eq!(options.duration, 6);
        assert_eq!(options.trials, 40);
    }
}
