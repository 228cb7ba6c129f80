//! Main application loop for person height estimation.

use crate::{
    capture::FrameSource,
    error::Result,
    frame::Frame,
    overlay::{OverlaySink, Presented},
    pipeline::HeightPipeline,
};
use log::info;
use std::time::Instant;

/// Totals reported when the loop ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames processed
    pub frames: u64,
    /// Tracks created over the whole run
    pub tracks_created: u64,
}

/// Main application struct
pub struct HeightApp<F: Frame> {
    pipeline: HeightPipeline<F>,
    source: Box<dyn FrameSource<F>>,
    sink: Box<dyn OverlaySink<F>>,
    fps_log_interval: u64,
}

impl<F: Frame> HeightApp<F> {
    #[must_use]
    pub fn new(
        pipeline: HeightPipeline<F>,
        source: Box<dyn FrameSource<F>>,
        sink: Box<dyn OverlaySink<F>>,
        fps_log_interval: u64,
    ) -> Self {
        Self {
            pipeline,
            source,
            sink,
            fps_log_interval: fps_log_interval.max(1),
        }
    }

    #[must_use]
    pub fn pipeline(&self) -> &HeightPipeline<F> {
        &self.pipeline
    }

    /// Run until the source ends or the sink asks to stop
    ///
    /// # Errors
    ///
    /// Returns an error if the frame source or the overlay sink fails.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!("Starting main application loop");

        let mut frames = 0u64;
        let mut fps_time = Instant::now();

        while let Some(frame) = self.source.next_frame()? {
            let report = self.pipeline.process_frame(&frame);
            frames += 1;

            if frames % self.fps_log_interval == 0 {
                let elapsed = fps_time.elapsed().as_secs_f64();
                let fps = if elapsed > 1e-6 {
                    self.fps_log_interval as f64 / elapsed
                } else {
                    0.0
                };
                info!(
                    "Frame {}: {:.1} FPS, {} live tracks",
                    report.frame_index,
                    fps,
                    report.tracks.len()
                );
                fps_time = Instant::now();
            }

            if self.sink.present(&frame, &report)? == Presented::Stop {
                break;
            }
        }

        let summary = RunSummary {
            frames,
            tracks_created: self.pipeline.tracks().tracks_created(),
        };
        info!(
            "Application shutting down after {} frames, {} tracks created",
            summary.frames, summary.tracks_created
        );
        Ok(summary)
    }
}
