use crate::pipeline::{PipelineContext, PipelineStep};
use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

/// Resize to a fixed size, ignoring aspect ratio
pub struct ResizeStep {
    pub width: u32,
    pub height: u32,
    pub filter: FilterType,
}

impl PipelineStep for ResizeStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        if image.width() == 0 || image.height() == 0 {
            anyhow::bail!("cannot resize an empty {}x{} image", image.width(), image.height());
        }
        Ok(imageops::resize(&image, self.width, self.height, self.filter))
    }

    fn name(&self) -> &str {
        "Resize"
    }
}

/// Surround the image with a constant border
pub struct PadStep {
    pub border: u32,
    pub value: u8,
}

impl PipelineStep for PadStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        let mut canvas = GrayImage::from_pixel(
            width + 2 * self.border,
            height + 2 * self.border,
            Luma([self.value]),
        );
        imageops::overlay(&mut canvas, &image, self.border.into(), self.border.into());
        Ok(canvas)
    }

    fn name(&self) -> &str {
        "Pad"
    }
}
