//! Fire growth driver: integrates the Huygens front forward in time and
//! emits time-stamped frames.
//!
//! One `Simulation` owns its perimeter exclusively and runs single-threaded;
//! the frame sequence is lazy, finite, and not restartable. Dropping the
//! iterator cancels the run.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::core_types::config::{SimulationConfig, DEFAULT_FMC};
use crate::core_types::frame::Frame;
use crate::core_types::geom::{LocalFrame, Vec2};
use crate::error::FireSimError;
use crate::fbp::calculator::{self, FbpOptions, FbpResult};
use crate::fbp::fwi::{FwiCalculator, FwiState};
use crate::spread::ellipse::Wavelet;
use crate::spread::perimeter::{FirePerimeter, EDGE_MAX_M};
use crate::spread::slope;

/// Hard floor on the adaptive step (minutes): one second.
const MIN_STEP_MIN: f64 = 1.0 / 60.0;

/// Per-step displacement target: half the resampling edge maximum, so a
/// single step cannot fold the front over itself.
const MAX_STEP_DISPLACEMENT_M: f64 = EDGE_MAX_M / 2.0;

/// Head spread rates below this are treated as a stalled front (m/min).
const STALL_ROS_M_MIN: f64 = 1e-6;

/// Run a fire spread simulation.
///
/// Validates the configuration, evaluates the FWI/FBP stack once (weather
/// is held constant over the run), and returns the lazy frame sequence.
/// Configuration and calculator failures surface here as `InvalidConfig`;
/// no frames are produced.
pub fn simulate(config: SimulationConfig) -> Result<Simulation, FireSimError> {
    Simulation::new(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Initializing,
    Running,
    Completed,
    Failed,
}

/// A running simulation: a lazy iterator of frames.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    projection: LocalFrame,
    fwi: FwiState,
    fbp: FbpResult,
    perimeter: FirePerimeter,
    state: DriverState,
    /// Compass azimuth the head fire travels toward.
    spread_azimuth: f64,
    elapsed_min: f64,
    duration_min: f64,
    snapshot_min: f64,
    next_snapshot_min: f64,
    /// Largest effective (slope-adjusted) head ROS seen since the last
    /// emitted frame.
    peak_head_ros: f64,
}

impl Simulation {
    fn new(config: SimulationConfig) -> Result<Self, FireSimError> {
        config.validate()?;

        let mut fwi_calc = FwiCalculator::new();
        let fwi = fwi_calc
            .calculate_with_overrides(&config.weather, config.month(), &config.fwi_overrides)
            .map_err(FireSimError::into_config_error)?;

        let fmc = match config.ignition_date {
            Some(date) => {
                calculator::foliar_moisture(config.ignition_lat, config.ignition_lng, date)
            }
            None => DEFAULT_FMC,
        };

        let options = FbpOptions {
            fmc,
            percent_conifer: config.percent_conifer(),
            percent_dead_fir: config.percent_dead_fir(),
            grass_curing: config.grass_curing(),
            cbh_override: config.cbh_override,
            // Slope enters per vertex, directionally, during integration.
            slope_pct: 0.0,
        };
        let fbp = calculator::calculate(config.fuel_type, &fwi, config.weather.wind_speed, &options)
            .map_err(FireSimError::into_config_error)?;

        let projection = LocalFrame::new(config.ignition_lat, config.ignition_lng);
        let spread_azimuth = (config.weather.wind_direction + 180.0).rem_euclid(360.0);

        let peak_factor = if config.slope_pct() >= 1.0 {
            slope::max_upslope_factor(config.slope_pct())
        } else {
            1.0
        };
        let peak_head_ros = fbp.ros_head * peak_factor;

        // Seed the front with a polygon one adaptive step wide.
        let dt_init = adaptive_step(peak_head_ros, config.snapshot_interval_minutes);
        let perimeter = FirePerimeter::ignition_circle(fbp.ros_head * dt_init);

        info!(
            fuel = %config.fuel_type,
            isi = fwi.isi,
            bui = fwi.bui,
            ros_head = fbp.ros_head,
            hfi = fbp.hfi,
            duration_hours = config.duration_hours,
            "starting fire spread simulation at ({}, {})",
            config.ignition_lat,
            config.ignition_lng,
        );

        Ok(Self {
            duration_min: config.duration_hours * 60.0,
            snapshot_min: config.snapshot_interval_minutes,
            next_snapshot_min: config.snapshot_interval_minutes,
            config,
            projection,
            fwi,
            fbp,
            perimeter,
            state: DriverState::Initializing,
            spread_azimuth,
            elapsed_min: 0.0,
            peak_head_ros,
        })
    }

    /// FWI components in effect for the run.
    pub fn fwi(&self) -> &FwiState {
        &self.fwi
    }

    /// FBP evaluation in effect for the run (flat-ground, head-fire values).
    pub fn fbp(&self) -> &FbpResult {
        &self.fbp
    }

    /// Advance the front by one adaptive step toward `target_min`.
    /// Returns the step actually taken (minutes).
    fn step(&mut self, target_min: f64) -> Result<f64, FireSimError> {
        let slope_pct = self.config.slope_pct();
        let aspect = self.config.aspect_deg();
        let wind = self.config.weather.wind_speed;

        let normals = self.perimeter.outward_normals();

        // Effective head rates per vertex set the stable step size.
        let mut head_rates = Vec::with_capacity(normals.len());
        let mut fastest: f64 = 0.0;
        for &normal in &normals {
            let factor = slope::directional_slope_factor(slope_pct, aspect, normal);
            let head = self.fbp.ros_head * factor;
            fastest = fastest.max(head);
            head_rates.push(head);
        }
        self.peak_head_ros = self.peak_head_ros.max(fastest);

        let dt = adaptive_step(fastest, self.snapshot_min).min(target_min - self.elapsed_min);
        let dt = dt.max(0.0);

        let mut displacements = Vec::with_capacity(normals.len());
        for (&normal, &head) in normals.iter().zip(&head_rates) {
            if head < STALL_ROS_M_MIN {
                displacements.push(Vec2::zeros());
                continue;
            }
            let back = calculator::back_ros(head, wind);
            let flank = calculator::flank_ros(head, back, self.fbp.lbr);
            let wavelet = Wavelet::new(head, back, flank, self.spread_azimuth, dt);
            displacements.push(wavelet.displacement(normal));
        }

        self.perimeter.advance(&displacements);
        self.perimeter.resample();
        let crossings = self.perimeter.remove_self_intersections();
        if crossings > 0 {
            debug!(crossings, "rubber-banded front crossings");
        }
        self.perimeter.enforce_ccw();

        if self.perimeter.has_non_finite() {
            return Err(FireSimError::NumericError(
                "front vertex position went non-finite".to_string(),
            ));
        }
        if self.perimeter.is_degenerate() {
            // Recoverable: the ring collapsed below three distinct
            // vertices. Frames report zero area until it regrows.
            warn!(
                time_min = self.elapsed_min,
                "fire perimeter collapsed to a degenerate ring"
            );
        }

        self.elapsed_min += dt;
        self.perimeter.step_time_min = self.elapsed_min;
        Ok(dt)
    }

    /// Build the frame for the current front state.
    fn frame(&mut self) -> Frame {
        let head_ros = self.peak_head_ros;
        let hfi = 300.0 * self.fbp.tfc * head_ros;
        // Reset the peak tracker for the next inter-frame window.
        self.peak_head_ros = 0.0;

        let mut fuel_breakdown = BTreeMap::new();
        fuel_breakdown.insert(self.config.fuel_type.to_string(), 1.0);

        Frame {
            time_hours: self.elapsed_min / 60.0,
            perimeter: self.perimeter.to_geographic(&self.projection),
            area_ha: self.perimeter.area_ha(),
            head_ros_m_min: head_ros,
            max_hfi_kw_m: hfi,
            fire_type: self.fbp.fire_type,
            flame_length_m: calculator::flame_length(hfi),
            fuel_breakdown,
        }
    }
}

/// Adaptive step size (minutes): the largest step whose fastest vertex
/// stays under half the resampling edge maximum, clamped to
/// [1 s, snapshot interval].
fn adaptive_step(fastest_ros_m_min: f64, snapshot_min: f64) -> f64 {
    if fastest_ros_m_min <= STALL_ROS_M_MIN {
        return snapshot_min.max(MIN_STEP_MIN);
    }
    (MAX_STEP_DISPLACEMENT_M / fastest_ros_m_min).clamp(MIN_STEP_MIN, snapshot_min)
}

impl Iterator for Simulation {
    type Item = Result<Frame, FireSimError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            DriverState::Completed | DriverState::Failed => return None,
            DriverState::Initializing => {
                self.state = DriverState::Running;
                return Some(Ok(self.frame()));
            }
            DriverState::Running => {}
        }

        let target = self.next_snapshot_min.min(self.duration_min);

        while self.elapsed_min < target {
            match self.step(target) {
                // Sub-nanosecond residuals cannot advance the clock.
                Ok(dt) => {
                    if dt <= 1e-9 {
                        break;
                    }
                }
                Err(err) => {
                    self.state = DriverState::Failed;
                    return Some(Err(err));
                }
            }
        }

        if target >= self.duration_min {
            self.state = DriverState::Completed;
            info!(
                area_ha = self.perimeter.area_ha(),
                vertices = self.perimeter.len(),
                "simulation complete after {} hours",
                self.duration_min / 60.0
            );
        } else {
            self.next_snapshot_min += self.snapshot_min;
        }

        Some(Ok(self.frame()))
    }
}
