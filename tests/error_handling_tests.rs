//! Error handling and edge case tests across modules

use image::RgbImage;
use person_height_estimation::{
    bbox::BBox,
    frame::Frame,
    geometry::Indeterminate,
    smoothing::HeightHistory,
    utils::{expand_clip_roi, safe_cast::*},
    Error,
};

#[test]
fn test_safe_cast_errors() {
    assert!(u32_to_i32(u32::MAX).is_err());
    match u32_to_i32(u32::MAX) {
        Err(Error::InvalidInput(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }

    assert_eq!(f64_to_i32_clamp(f64::INFINITY, 0, 100), 0);
    assert_eq!(f64_to_i32_clamp(1e12, 0, 100), 100);
}

#[test]
fn test_degenerate_boxes() {
    let frame = RgbImage::new(64, 48);

    assert!(frame.crop(&BBox::new(0, 0, -5, 10)).is_none());
    assert!(frame.crop(&BBox::new(-100, -100, 50, 50)).is_none());

    let roi = expand_clip_roi(&BBox::new(i32::MAX - 10, 0, 20, 20), 64, 48, 0.15);
    assert!(roi.is_empty());
}

#[test]
fn test_huge_boxes_do_not_overflow() {
    let a = BBox::new(i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX);
    let b = BBox::new(0, 0, i32::MAX, i32::MAX);

    assert!(a.area() > 0);
    assert!(a.intersection_area(&b) > 0);
    let clipped = a.clip_to(1280, 720);
    assert!(clipped.is_empty());
}

#[test]
#[should_panic(expected = "Window size must be greater than 0")]
fn test_zero_history_panics() {
    let _ = HeightHistory::new(0);
}

#[test]
fn test_history_eviction() {
    let mut history = HeightHistory::new(10);
    for i in 0..11_i32 {
        history.push(1.0 + f64::from(i) * 0.01);
    }

    assert_eq!(history.len(), 10);
    let oldest = history.iter().next().copied().unwrap();
    assert!((oldest - 1.01).abs() < 1e-12);
    let expected = (1..=10_i32).map(|i| 1.0 + f64::from(i) * 0.01).sum::<f64>() / 10.0;
    assert!((history.mean().unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_indeterminate_messages() {
    assert_eq!(
        Indeterminate::BehindCamera.to_string(),
        "ray meets the ground plane behind the camera"
    );
    let err = Error::Tracker("lost".to_string());
    assert_eq!(err.to_string(), "Tracker error: lost");
}

#[test]
fn test_error_conversions() {
    fn read_missing() -> person_height_estimation::Result<String> {
        Ok(std::fs::read_to_string("/nonexistent/person_height/config.yaml")?)
    }
    assert!(matches!(read_missing(), Err(Error::Io(_))));

    // Cropping reports an empty region as absent, never as an error
    let frame = RgbImage::new(64, 48);
    assert!(frame.crop(&BBox::new(100, 100, 10, 10)).is_none());
    assert_eq!(
        Error::Capture("end of stream".to_string()).to_string(),
        "Capture error: end of stream"
    );
}
