//! Tests for configuration loading and validation

use person_height_estimation::{
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("person_height_{}_{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("round_trip.yaml");

    let mut config = Config::default();
    config.camera.height = 2.25;
    config.detection.every_n_frames = 3;
    config.tracking.count_detection_misses = true;
    config.models.facemark = Some(PathBuf::from("assets/lbfmodel.yaml"));
    config.models.pose = Some(PathBuf::from("assets/pose_coco.onnx"));

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
    assert_eq!(config.detection.every_n_frames, 5);
    assert_eq!(config.tracking.retirement_threshold, 30);
    assert_eq!(config.smoothing.window, 10);
    assert_eq!(config.models.pose, None);
    assert_eq!(config, Config::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does_not_exist.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let result = Config::from_yaml("camera: [1, 2");
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = Config::from_yaml("camera:\n  height: tall\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_validation_ranges() {
    let cases: Vec<fn(&mut Config)> = vec![
        |c: &mut Config| c.detection.min_detection_confidence = 1.5,
        |c: &mut Config| c.detection.nms_threshold = -0.1,
        |c: &mut Config| c.verification.score_threshold = 2.0,
        |c: &mut Config| c.verification.min_face_size = -1,
        |c: &mut Config| c.verification.roi_padding = 1.5,
        |c: &mut Config| c.tracking.iou_threshold = 1.0,
        |c: &mut Config| c.display.fps_log_interval = 0,
        |c: &mut Config| c.camera.fx = 0.0,
        |c: &mut Config| c.models.pose_threshold = 1.5,
    ];

    for (i, mutate) in cases.into_iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(Error::ConfigError(_))),
            "case {i} should be rejected"
        );
    }
}
