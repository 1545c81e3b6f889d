//! Scenario suite: representative fuel/weather combinations at a common
//! ignition point (51.0 N, 114.0 W), checking fire-type classification,
//! spread metrics, and cross-scenario ordering.

use firesim_core::{simulate, FireType, Frame, FuelCode, FwiOverrides, SimulationConfig, Weather};

fn base_config(fuel: FuelCode) -> SimulationConfig {
    SimulationConfig {
        ignition_lat: 51.0,
        ignition_lng: -114.0,
        weather: Weather {
            wind_speed: 20.0,
            wind_direction: 270.0,
            temperature: 25.0,
            relative_humidity: 30.0,
            precipitation_24h: 0.0,
        },
        fwi_overrides: FwiOverrides {
            ffmc: Some(90.0),
            dmc: Some(45.0),
            dc: Some(300.0),
            ..Default::default()
        },
        fuel_type: fuel,
        duration_hours: 4.0,
        snapshot_interval_minutes: 30.0,
        slope_pct: None,
        aspect_deg: None,
        ignition_date: None,
        cbh_override: None,
        percent_conifer: None,
        percent_dead_fir: None,
        grass_curing: None,
    }
}

fn run_full(config: SimulationConfig) -> Vec<Frame> {
    simulate(config)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Boreal spruce in a moderate west wind: the benchmark crowning run.
#[test]
fn boreal_spruce_west_wind() {
    let config = base_config(FuelCode::C2);
    let sim = simulate(config).unwrap();
    let fbp = *sim.fbp();
    let frames: Vec<Frame> = sim.collect::<Result<_, _>>().unwrap();

    // 4 hours at 30-minute snapshots: t = 0 plus 8 boundaries.
    assert_eq!(frames.len(), 9, "frame cadence broke");

    // C2 under these indices crowns hard.
    assert_ne!(fbp.fire_type, FireType::Surface, "C2 should crown");
    assert!(fbp.cfb > 0.0);
    assert!(
        fbp.ros_head > fbp.ros_surface,
        "crown contribution missing: head {} vs surface {}",
        fbp.ros_head,
        fbp.ros_surface
    );

    // Fire grows monotonically and ends with substantial area.
    let mut previous = -1.0;
    for frame in &frames {
        assert!(frame.area_ha >= previous, "area shrank at {}", frame.time_hours);
        previous = frame.area_ha;
    }
    assert!(frames.last().unwrap().area_ha > 1.0);

    // Head runs downwind of a 270-degree wind: the perimeter should
    // extend much farther east of the ignition than west.
    let last = frames.last().unwrap();
    let east = last
        .perimeter
        .iter()
        .map(|p| p[1] - -114.0)
        .fold(f64::MIN, f64::max);
    let west = last
        .perimeter
        .iter()
        .map(|p| -114.0 - p[1])
        .fold(f64::MIN, f64::max);
    assert!(
        east > 2.0 * west,
        "head should outrun the back: east extent {east}, west extent {west}"
    );
}

/// Calm air: the fire stays essentially circular.
#[test]
fn calm_wind_stays_circular() {
    let mut config = base_config(FuelCode::C2);
    config.weather.wind_speed = 0.0;
    config.duration_hours = 1.0;

    let frames = run_full(config);
    let last = frames.last().unwrap();
    assert!(last.area_ha > 0.0);

    // Measure radial spread about the ignition point.
    let m_per_deg_lat = 6_378_137.0 * std::f64::consts::PI / 180.0;
    let m_per_deg_lng = m_per_deg_lat * 51.0f64.to_radians().cos();
    let (mut min_r, mut max_r) = (f64::INFINITY, 0.0f64);
    for p in &last.perimeter {
        let y = (p[0] - 51.0) * m_per_deg_lat;
        let x = (p[1] - -114.0) * m_per_deg_lng;
        let r = x.hypot(y);
        min_r = min_r.min(r);
        max_r = max_r.max(r);
    }
    assert!(
        max_r / min_r <= 1.15,
        "calm-wind front should be near-circular: {min_r:.1} - {max_r:.1} m"
    );
}

/// Cured standing grass in a strong wind: fast surface fire, strongly
/// elongated ellipse.
#[test]
fn standing_grass_strong_wind() {
    let mut config = base_config(FuelCode::O1b);
    config.weather.wind_speed = 40.0;
    config.weather.relative_humidity = 20.0;
    config.fwi_overrides.ffmc = Some(92.0);
    config.fwi_overrides.dmc = Some(50.0);
    config.grass_curing = Some(80.0);

    let mut sim = simulate(config).unwrap();
    let fbp = *sim.fbp();

    assert_eq!(fbp.fire_type, FireType::Surface, "grass cannot crown");
    assert!(
        (fbp.lbr - 5.03).abs() < 0.1,
        "LBR at 40 km/h should be ~5.03, got {}",
        fbp.lbr
    );
    assert!(fbp.ros_head > 20.0, "cured grass in wind is fast: {}", fbp.ros_head);

    // Driver wiring: the first frames stream without error.
    let first = sim.next().unwrap().unwrap();
    assert_eq!(first.time_hours, 0.0);
    let second = sim.next().unwrap().unwrap();
    assert!(second.area_ha > first.area_ha);
}

/// Leafless aspen burns far cooler than spruce under identical weather.
#[test]
fn leafless_aspen_vs_spruce_intensity() {
    let aspen = simulate(base_config(FuelCode::D1)).unwrap();
    let spruce = simulate(base_config(FuelCode::C2)).unwrap();
    let aspen_fbp = *aspen.fbp();
    let spruce_fbp = *spruce.fbp();

    assert_eq!(aspen_fbp.fire_type, FireType::Surface);
    assert!(
        aspen_fbp.hfi < spruce_fbp.hfi,
        "D1 HFI {} should trail C2 HFI {}",
        aspen_fbp.hfi,
        spruce_fbp.hfi
    );

    // The ordering also shows up in the emitted frames.
    let aspen_frame = aspen.last().unwrap().unwrap();
    let spruce_frame = spruce.last().unwrap().unwrap();
    assert!(aspen_frame.max_hfi_kw_m < spruce_frame.max_hfi_kw_m);
}

/// Conifer plantation in severe weather: active crown fire outrunning
/// its own surface spread.
#[test]
fn plantation_goes_active_crown() {
    let mut config = base_config(FuelCode::C6);
    config.weather.wind_speed = 30.0;
    config.weather.relative_humidity = 25.0;
    config.fwi_overrides.ffmc = Some(92.0);
    config.fwi_overrides.dmc = Some(60.0);
    config.fwi_overrides.dc = Some(400.0);
    config.cbh_override = Some(7.0);

    let mut sim = simulate(config).unwrap();
    let fbp = *sim.fbp();

    assert_eq!(fbp.fire_type, FireType::ActiveCrown);
    assert!(fbp.cfb >= 0.9, "active crown needs CFB >= 0.9, got {}", fbp.cfb);
    assert!(
        fbp.ros_head > fbp.ros_surface,
        "crown run {} should outpace surface-only {}",
        fbp.ros_head,
        fbp.ros_surface
    );

    let first = sim.next().unwrap().unwrap();
    assert_eq!(first.fire_type, FireType::ActiveCrown);
    assert!(first.flame_length_m > 1.0);
}

/// A 30% grade accelerates the upslope flank beyond anything the flat
/// run produces, within the Butler cap.
#[test]
fn upslope_run_outpaces_flat_run() {
    let flat = run_full(base_config(FuelCode::C2));

    let mut sloped_config = base_config(FuelCode::C2);
    sloped_config.slope_pct = Some(30.0);
    sloped_config.aspect_deg = Some(270.0);
    sloped_config.duration_hours = 1.0;
    let sloped = run_full(sloped_config);

    let flat_head = flat.last().unwrap().head_ros_m_min;
    let sloped_head = sloped.last().unwrap().head_ros_m_min;
    assert!(
        sloped_head > flat_head,
        "slope-adjusted head {sloped_head} should exceed flat head {flat_head}"
    );
    assert!(
        sloped_head <= flat_head * 5.0 + 1e-9,
        "slope effect must respect the 5x cap: {sloped_head} vs {flat_head}"
    );
}
