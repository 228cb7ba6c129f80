//! Person height estimation application for real-time camera streams.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use person_height_estimation::{
    app::HeightApp,
    capture::{CameraSource, VideoSource},
    config::Config,
    face_detection::YuNetFaceDetector,
    mark_detection::FacemarkMesh,
    overlay::{LogOverlay, OverlaySink, WindowOverlay},
    pipeline::HeightPipeline,
    pose_estimation::OpenPoseEstimator,
    visual_tracker::CsrtTrackerFactory,
};
use opencv::core::Mat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Camera height above the ground in metres
    #[arg(long)]
    camera_height: Option<f64>,

    /// Run face detection on every Nth frame
    #[arg(long)]
    detect_every: Option<u64>,

    /// Do not open a window
    #[arg(long)]
    headless: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path}");
            Config::from_file(path).with_context(|| format!("Failed to load config {path}"))?
        }
        None => Config::default(),
    };

    if let Some(height) = args.camera_height {
        config.camera.height = height;
    }
    if let Some(every) = args.detect_every {
        config.detection.every_n_frames = every;
    }
    if args.headless {
        config.display.show_window = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = load_config(&args)?;

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    info!("Person Height Estimation");
    info!(
        "Camera: fx={} fy={} cx={} cy={} height={} m",
        config.camera.fx, config.camera.fy, config.camera.cx, config.camera.cy, config.camera.height
    );

    let source = match &args.video {
        Some(path) => VideoSource::File(path.clone()),
        None => VideoSource::Camera(args.cam),
    };
    let capture = CameraSource::open(&source).context("Failed to open video source")?;

    let detector = YuNetFaceDetector::new(&config.models.face_detector, &config.detection)
        .context("Failed to load face detector")?;
    let mut pipeline =
        HeightPipeline::new(&config, Box::new(detector), Box::new(CsrtTrackerFactory))?;

    match (&config.models.facemark, config.verification.mesh_enabled) {
        (Some(path), true) => {
            let mesh = FacemarkMesh::new(path).context("Failed to load facemark model")?;
            pipeline = pipeline.with_landmark_mesh(Box::new(mesh));
        }
        (None, true) => info!("No facemark model configured, mesh verification off"),
        _ => {}
    }

    match &config.models.pose {
        Some(path) => {
            let pose = OpenPoseEstimator::new(
                path,
                config.models.pose_config.as_deref(),
                config.models.pose_threshold,
            )
            .context("Failed to load pose model")?;
            pipeline = pipeline.with_pose_estimator(Box::new(pose));
        }
        None => info!("No pose model configured, feet from box bottoms"),
    }

    let sink: Box<dyn OverlaySink<Mat>> = if config.display.show_window {
        Box::new(WindowOverlay::new(&config.display.window_title)?)
    } else {
        Box::new(LogOverlay)
    };

    let mut app = HeightApp::new(
        pipeline,
        Box::new(capture),
        sink,
        config.display.fps_log_interval,
    );
    let summary = app.run()?;
    info!(
        "Processed {} frames, {} people seen",
        summary.frames, summary.tracks_created
    );

    Ok(())
}
