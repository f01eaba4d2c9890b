use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use smileblink_core::pipeline::capture_loop::CaptureLoop;
use smileblink_core::pipeline::detect_and_annotate_use_case::{
    DetectAndAnnotateUseCase, FrameReport,
};
use smileblink_core::pipeline::infrastructure::use_case_factory::create_use_case;
use smileblink_core::pipeline::session_logger::{SessionLogger, StdoutSessionLogger};
use smileblink_core::pipeline::stop_signal::StopSignal;
use smileblink_core::shared::constants::{DEFAULT_CAMERA_INDEX, IMAGE_EXTENSIONS};
use smileblink_core::shared::detection_mode::DetectionMode;
use smileblink_core::shared::frame::Frame;
use smileblink_core::video::domain::frame_source::FrameSource;
use smileblink_core::video::domain::image_writer::ImageWriter;
use smileblink_core::video::infrastructure::image_file_source::ImageFileSource;
use smileblink_core::video::infrastructure::image_file_writer::ImageFileWriter;
use smileblink_core::video::infrastructure::opencv_camera::OpencvCamera;

/// Face, smile and blink detection on a webcam feed or a still image.
#[derive(Parser)]
#[command(name = "smileblink")]
struct Cli {
    /// Detection mode: face, smile, eyes-in-face or face-and-smile.
    #[arg(long)]
    mode: DetectionMode,

    /// Run once over this image instead of the camera.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: i32,

    /// Stop the camera after this many annotated frames.
    #[arg(long)]
    frames: Option<usize>,

    /// Write the (last) annotated frame to this image file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding the Haar-cascade XML files.
    #[arg(long)]
    cascade_dir: Option<PathBuf>,

    /// Milliseconds between camera grabs.
    #[arg(long, default_value = "33")]
    interval_ms: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut use_case = create_use_case(cli.mode, cli.cascade_dir.as_deref())?;

    if let Some(ref image) = cli.image {
        run_image(image, cli.output.as_deref(), &mut use_case)
    } else {
        run_camera(&cli, &mut use_case)
    }
}

fn run_image(
    input: &Path,
    output: Option<&Path>,
    use_case: &mut DetectAndAnnotateUseCase,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = ImageFileSource::new(input);
    source.open()?;
    let mut frame = source.read()?.ok_or("No frames in image")?;
    source.close();

    let report = use_case.execute(&mut frame)?;
    println!("{}", describe(&report));

    if let Some(path) = output {
        write_frame(path, &frame)?;
    }
    Ok(())
}

fn run_camera(
    cli: &Cli,
    use_case: &mut DetectAndAnnotateUseCase,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut camera = OpencvCamera::new(cli.camera);
    let mut logger = StdoutSessionLogger::default();
    let capture = CaptureLoop::new(Duration::from_millis(cli.interval_ms))
        .with_max_frames(cli.frames);
    let stop = StopSignal::new();

    let mut last_frame: Option<Frame> = None;
    let processed = capture.run(
        &mut camera,
        use_case,
        &mut logger,
        &stop,
        |frame, _report| {
            last_frame = Some(frame);
            true
        },
    )?;
    logger.summary();
    log::info!("Processed {processed} frames from camera {}", cli.camera);

    match (cli.output.as_deref(), last_frame) {
        (Some(path), Some(frame)) => write_frame(path, &frame)?,
        (Some(_), None) => log::warn!("No frame captured, nothing written"),
        _ => {}
    }
    Ok(())
}

fn write_frame(path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    ImageFileWriter::new().write(path, frame)?;
    log::info!("Output written to {}", path.display());
    Ok(())
}

fn describe(report: &FrameReport) -> String {
    let mut line = [
        count(report.faces.len(), "face"),
        count(report.smiles.len(), "smile"),
        count(report.eyes.len(), "eye"),
    ]
    .join(", ");
    if report.smile_in_face {
        line.push_str(", smiling");
    }
    if report.blink {
        line.push_str(", blink");
    }
    line
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref image) = cli.image {
        if !image.exists() {
            return Err(format!("Input file not found: {}", image.display()).into());
        }
    }
    if cli.interval_ms == 0 {
        return Err("Interval must be at least 1 ms".into());
    }
    if cli.frames == Some(0) {
        return Err("--frames must be greater than 0".into());
    }
    if let Some(ref output) = cli.output {
        if !is_image(output) {
            return Err(format!(
                "Output must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                output.display()
            )
            .into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
