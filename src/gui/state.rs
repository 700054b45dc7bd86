use crate::canvas::Canvas;
use crate::models::BoundingBox;

/// Window size of the drawing surface
pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;

/// A prediction painted next to the stroke it belongs to
#[derive(Debug, Clone)]
pub struct ShownLabel {
    pub bbox: BoundingBox,
    pub text: String,
}

#[derive(Debug)]
pub struct AppState {
    pub canvas: Canvas,
    pub labels: Vec<ShownLabel>,
    pub status: String,
}

impl AppState {
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.labels.clear();
        self.status.clear();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            canvas: Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            labels: Vec::new(),
            status: String::new(),
        }
    }
}
