use std::path::{Path, PathBuf};

use anyhow::Result;
use image::GrayImage;

/// Writes each classified crop to `image_<n>.png`, counting from 1
#[derive(Debug, Clone)]
pub struct CropSaver {
    dir: PathBuf,
    next: usize,
}

impl CropSaver {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, next: 1 })
    }

    /// Save `crop` and return the path it was written to
    pub fn save(&mut self, crop: &GrayImage) -> Result<PathBuf> {
        let path = self.dir.join(format!("image_{}.png", self.next));
        crop.save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save crop {}: {}", path.display(), e))?;
        self.next += 1;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_files_sequentially() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut saver = CropSaver::new(dir.path().join("crops")).unwrap();

        let first = saver.save(&GrayImage::new(5, 5)).unwrap();
        let second = saver.save(&GrayImage::new(7, 3)).unwrap();

        assert_eq!(first.file_name().unwrap(), "image_1.png");
        assert_eq!(second.file_name().unwrap(), "image_2.png");
        assert_eq!(image::open(&second).unwrap().width(), 7);
    }
}
