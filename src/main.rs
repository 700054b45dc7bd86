use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use tracing::{Level, info};

use digitpad::logging::init_logging;
use digitpad::{Recognizer, RtenClassifier, server};

#[derive(Parser)]
#[command(name = "digitpad", version)]
#[command(about = "Recognize hand-drawn digits with a pre-trained classifier")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: Level,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ModelArgs {
    /// Path to the .rten classifier model
    #[arg(short, long, env = "DIGITPAD_MODEL", default_value = "bestmodel.rten")]
    model: PathBuf,

    /// Save every normalization stage to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web drawing page and the /predict endpoint
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Address to listen on
        #[arg(short, long, env = "DIGITPAD_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },

    /// Open the desktop drawing window
    #[cfg(feature = "gui")]
    Draw {
        #[command(flatten)]
        model: ModelArgs,

        /// Write every classified crop to DIR/image_<n>.png
        #[arg(long, value_name = "DIR")]
        save_crops: Option<PathBuf>,
    },

    /// Recognize the digit in an image file
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
    },
}

/// Load the classifier; the process cannot continue without it
fn load_recognizer(args: &ModelArgs) -> anyhow::Result<Arc<Recognizer>> {
    let classifier = RtenClassifier::load(&args.model)?;
    let mut recognizer = Recognizer::new(Arc::new(classifier));
    if let Some(dir) = &args.debug_out {
        recognizer = recognizer.with_debug(dir)?;
        info!("saving normalization stages to {}", dir.display());
    }
    Ok(Arc::new(recognizer))
}

fn predict_file(recognizer: &Recognizer, image_path: &Path) -> anyhow::Result<()> {
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!("image loaded: {}x{}", img.width(), img.height());

    let recognition = recognizer
        .recognize_buffer(&img.to_luma8())
        .with_context(|| format!("Failed to recognize {}", image_path.display()))?;

    let report = recognition.prediction.report();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Serve { model, bind } => {
            let recognizer = load_recognizer(&model)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(recognizer, bind))
        }
        #[cfg(feature = "gui")]
        Command::Draw { model, save_crops } => {
            let recognizer = load_recognizer(&model)?;
            let crops = save_crops
                .map(digitpad::crops::CropSaver::new)
                .transpose()?;
            digitpad::gui::run(recognizer, crops)
        }
        Command::Predict { model, image_path } => {
            let recognizer = load_recognizer(&model)?;
            predict_file(&recognizer, &image_path)
        }
    }
}
