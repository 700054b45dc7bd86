use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use image::GrayImage;
use tracing::debug;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Directory for one stage, e.g. `02_pad`
    fn stage_dir(&self, index: usize, name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{:02}_{}", index, name.to_lowercase().replace(' ', "_")))
    }

    /// Save one stage output as `<stage_dir>/<run>.png`
    pub fn save(&self, index: usize, name: &str, run: usize, image: &GrayImage) -> Result<()> {
        let dir = self.stage_dir(index, name);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{:04}.png", run));
        image
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        debug!("saved debug image {}", path.display());
        Ok(())
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// A single image transformation in the normalizer
pub trait PipelineStep: Send + Sync {
    fn process(&self, image: GrayImage, context: &PipelineContext) -> Result<GrayImage>;

    /// Human-readable name, also used for debug directories
    fn name(&self) -> &str;
}

/// Ordered chain of steps run on one grayscale image
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
    runs: AtomicUsize,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
            runs: AtomicUsize::new(0),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Run every step in order. In debug mode the input is stored as stage 00
    /// and each step output under its own numbered directory.
    pub fn run(&self, input: GrayImage) -> Result<GrayImage> {
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(debug_config) = &self.context.debug {
            debug_config.save(0, "input", run, &input)?;
        }

        let mut image = input;
        for (idx, step) in self.steps.iter().enumerate() {
            image = step.process(image, &self.context)?;
            debug!(step = step.name(), width = image.width(), height = image.height(), "step done");

            if let Some(debug_config) = &self.context.debug {
                debug_config.save(idx + 1, step.name(), run, &image)?;
            }
        }

        Ok(image)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
