//! Build script for detecting system dependencies and providing installation guidance.
//!
//! OpenCV is only needed with the `opencv` feature, so nothing is checked
//! without it.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_OPENCV").is_none() {
        return;
    }

    check_pkg_config();
    check_opencv();
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    // opencv4 first, then the legacy package name
    for package in ["opencv4", "opencv"] {
        let output = Command::new("pkg-config").args(["--modversion", package]).output();
        if let Ok(output) = output {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout);
                println!("cargo:warning=Found OpenCV version: {}", version.trim());
                return;
            }
        }
    }

    println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed with the contrib modules (tracking, face).");
    println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev libopencv-contrib-dev");
    println!("cargo:warning=On macOS: brew install opencv");
}

fn check_pkg_config() {
    let output = Command::new("pkg-config").arg("--version").output();

    match output {
        Ok(output) if output.status.success() => {}
        _ => {
            println!("cargo:warning=pkg-config not found. This is required to find system libraries.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
            println!("cargo:warning=On macOS: brew install pkg-config");
        }
    }
}
