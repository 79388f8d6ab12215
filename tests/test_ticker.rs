use std::path::Path;
use std::time::Duration;

use ascii_man::logging::init_file_logging;
use ascii_man::ticker::*;
use ascii_man::GameError;

#[test]
fn one_frame_unit_is_a_sixtieth_of_a_second() {
    assert!((millis_to_dt(MS_PER_FRAME) - 1.0).abs() < 1e-6);
    assert!((dt_to_millis(3.0) - 50.0).abs() < 1e-9);
}

#[test]
fn slower_hosts_step_further() {
    // A 30 FPS host advances two frame units per render.
    let dt = millis_to_dt(1000.0 / 30.0);
    assert!((dt - 2.0).abs() < 1e-5);
}

#[test]
fn frame_duration_matches_fps() {
    let clock = FrameClock::new(50);
    assert!((clock.frame_duration().as_secs_f64() - 0.020).abs() < 1e-6);
}

#[test]
fn zero_fps_does_not_divide_by_zero() {
    let clock = FrameClock::new(0);
    assert_eq!(clock.frame_duration(), Duration::from_secs(1));
}

#[test]
fn tick_is_capped_after_a_stall() {
    let mut clock = FrameClock::new(30);
    std::thread::sleep(Duration::from_millis(120));
    let dt = clock.tick();
    assert!(dt <= MAX_DT);
    assert!(dt > 0.0);
}

#[test]
fn reset_forgets_idle_time() {
    let mut clock = FrameClock::new(30);
    std::thread::sleep(Duration::from_millis(40));
    clock.reset();
    assert!(clock.tick() < 1.0);
}

#[test]
fn unwritable_log_path_is_reported() {
    let path = Path::new("/nonexistent-ascii-man-dir/sub/game.log");
    let err = init_file_logging(path).unwrap_err();
    assert!(matches!(err, GameError::LogFile { .. }));
    assert!(err.to_string().contains("game.log"));
}

#[test]
fn substeps_split_long_frames() {
    let steps: Vec<f32> = substeps(2.5).collect();
    assert_eq!(steps, [1.0, 1.0, 0.5]);

    let steps: Vec<f32> = substeps(0.4).collect();
    assert_eq!(steps, [0.4]);
}

#[test]
fn substeps_cover_the_whole_frame() {
    for dt in [0.3f32, 1.0, 1.75, 2.0, MAX_DT] {
        let steps: Vec<f32> = substeps(dt).collect();
        assert!(steps.iter().all(|s| *s > 0.0 && *s <= MAX_STEP));
        let total: f32 = steps.iter().sum();
        assert!((total - dt).abs() < 1e-5, "{dt}");
    }
}

#[test]
fn substeps_of_nothing_is_empty() {
    assert_eq!(substeps(0.0).count(), 0);
    assert_eq!(substeps(-1.0).count(), 0);
    assert_eq!(substeps(f32::NAN).count(), 0);
}
