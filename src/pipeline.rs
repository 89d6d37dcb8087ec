use image::DynamicImage;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::error::ExtractError;

/// Image flowing through the preprocessing pipeline
#[derive(Clone)]
pub struct PipelineData<'a> {
    /// Current image (borrowed caller input on entry, owned after the first step)
    pub image: Cow<'a, DynamicImage>,

    /// Width and height of the image the pipeline was started with
    pub source_dimensions: (u32, u32),
}

impl<'a> PipelineData<'a> {
    pub fn from_image(image: &'a DynamicImage) -> Self {
        Self {
            image: Cow::Borrowed(image),
            source_dimensions: (image.width(), image.height()),
        }
    }

    /// Replace the image, keeping the rest of the item
    pub fn with_image(self, image: DynamicImage) -> Self {
        Self {
            image: Cow::Owned(image),
            ..self
        }
    }

    pub fn into_image(self) -> DynamicImage {
        self.image.into_owned()
    }
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Transform one image
    fn process<'a>(&self, data: PipelineData<'a>) -> Result<PipelineData<'a>, ExtractError>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Composable preprocessing pipeline
#[derive(Clone)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    /// Root directory for per-step debug images
    debug_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            debug_dir: None,
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, ExtractError> {
        let io_err = |e: std::io::Error| ExtractError::DebugOutput {
            path: output_dir.clone(),
            message: e.to_string(),
        };

        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir).map_err(io_err)?;
            if entries.next().is_some() {
                return Err(ExtractError::DebugOutput {
                    path: output_dir.clone(),
                    message: "debug directory is not empty".into(),
                });
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(io_err)?;
        }

        self.debug_dir = Some(output_dir);

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order on `input`
    pub fn run<'a>(&self, input: &'a DynamicImage) -> Result<PipelineData<'a>, ExtractError> {
        if let Some(dir) = &self.debug_dir {
            save_debug_image(dir, "00_input", input)?;
        }

        let mut data = PipelineData::from_image(input);

        for (step_idx, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            debug!(
                "Running step: {} ({}x{})",
                step_name,
                data.image.width(),
                data.image.height()
            );

            data = step.process(data)?;

            if let Some(dir) = &self.debug_dir {
                let step_dir_name = format!(
                    "{:02}_{}",
                    step_idx + 1,
                    step_name.to_lowercase().replace(' ', "_")
                );
                save_debug_image(dir, &step_dir_name, &data.image)?;
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn save_debug_image(root: &Path, step_dir_name: &str, image: &DynamicImage) -> Result<(), ExtractError> {
    let step_dir = root.join(step_dir_name);
    std::fs::create_dir_all(&step_dir).map_err(|e| ExtractError::DebugOutput {
        path: step_dir.clone(),
        message: e.to_string(),
    })?;

    let output_path = step_dir.join("01.png");
    image.save(&output_path).map_err(|e| ExtractError::DebugOutput {
        path: output_path.clone(),
        message: e.to_string(),
    })?;

    debug!("Debug: saved {}/01.png", step_dir_name);
    Ok(())
}
