//! # Synchronisation Executable
//!
//! This executable drives one steering axis through the path planner in
//! closed loop with a simulated actuator pair:
//! - a slow eccentric actuator commanded in degrees, used as the reference
//! - a fast linear actuator commanded in millimeters through the calibration map
//!
//! It is used to tune the planner and check the synchronisation behaviour
//! before running on the vehicle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{Result, eyre::WrapErr};
use log::{info, trace};
use std::time::{Duration, Instant};

// Internal
use sync_lib::{
    calib::{self, AngleToLinear, Calib},
    params::SyncExecParams,
    path_planner::PathPlanner,
    sim::SyncRig,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new(
        "sync_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Synchronisation Executable\n");
    info!("Running on: {}", host::get_host_info());
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let params: SyncExecParams = util::params::load("sync_exec.toml")
        .wrap_err("Failed to load the executable parameters")?;

    let calib_params: calib::Params = util::params::load(&params.calib_params_file)
        .wrap_err("Failed to load the calibration parameters")?;

    info!("Parameters loaded");

    // ---- MODULE INITIALISATION ----

    let calib = Calib::new(&calib_params)
        .wrap_err("Failed to build the calibration maps")?;

    let mut planner = PathPlanner::from_param_file(&params.planner_params_file)
        .wrap_err("Failed to initialise the path planner")?;

    let mut rig = SyncRig::new(
        params.family,
        &calib,
        params.slow_time_const_s,
        params.fast_time_const_s
    );

    info!("Modules initialised");

    // ---- MAIN LOOP ----

    let period = Duration::from_secs_f64(planner.params().sample_period_s);
    let log_interval = params.log_interval.max(1);

    let mut max_delay = 0f64;
    let mut num_accel_limited = 0usize;
    let mut num_vel_limited = 0usize;

    info!("Initialisation complete, running {} cycles", params.num_ticks);

    for tick in 0..params.num_ticks {
        let cycle_start = Instant::now();
        let time_s = tick as f64 * planner.params().sample_period_s;

        let sample = rig.step(&mut planner, &calib, params.target_at(time_s))
            .wrap_err_with(|| format!("Path planner failed on cycle {}", tick))?;

        max_delay = max_delay.max(sample.delay);
        if sample.report.accel_limited {
            num_accel_limited += 1;
        }
        if sample.report.vel_limited {
            num_vel_limited += 1;
        }

        trace!("{:#?}", sample);

        if tick % log_interval == 0 {
            info!(
                "[{:8.3} s] target {:8.3} deg, cmd {:8.3} deg, slow {:8.3} deg, fast {:7.4} mm, delay {:.4}",
                time_s,
                sample.target_deg,
                sample.command_deg,
                sample.slow_deg,
                sample.fast_mm,
                sample.delay
            );
        }

        if params.realtime {
            if let Some(remaining) = period.checked_sub(cycle_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    // ---- SUMMARY ----

    let final_target = params.target_at(
        params.num_ticks as f64 * planner.params().sample_period_s
    );

    info!("Run complete");
    info!("    Final slow actuator error: {:.6} deg", final_target - rig.slow.position);
    info!(
        "    Final fast actuator error: {:.6} mm",
        calib.map(params.family).angle_to_linear(final_target) - rig.fast.position
    );
    info!("    Max synchronisation delay: {:.4}", max_delay);
    info!("    Acceleration limited cycles: {}", num_accel_limited);
    info!("    Velocity limited cycles: {}", num_vel_limited);

    Ok(())
}
