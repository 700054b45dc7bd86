use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

use crate::models::Point;

/// Radius of the disc stamped at every pointer position
pub const BRUSH_RADIUS: i32 = 4;

const INK: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Idle,
    Drawing,
}

/// Drawing surface of the desktop front-end.
///
/// Keeps the grayscale buffer handed to the recognizer, the stroke in progress
/// and every finished stroke so the UI can repaint them.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: GrayImage,
    pen: PenState,
    current: Vec<Point>,
    strokes: Vec<Vec<Point>>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: GrayImage::new(width, height),
            pen: PenState::Idle,
            current: Vec::new(),
            strokes: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &GrayImage {
        &self.buffer
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Finished strokes followed by the one in progress
    pub fn strokes(&self) -> impl Iterator<Item = &[Point]> {
        self.strokes
            .iter()
            .map(Vec::as_slice)
            .chain(std::iter::once(self.current.as_slice()))
    }

    pub fn pen_down(&mut self) {
        self.pen = PenState::Drawing;
    }

    /// Ink `point` if the pen is down. Returns whether anything was drawn.
    pub fn pen_moved(&mut self, point: Point) -> bool {
        if self.pen != PenState::Drawing {
            return false;
        }
        draw_filled_circle_mut(&mut self.buffer, (point.x, point.y), BRUSH_RADIUS, INK);
        self.current.push(point);
        true
    }

    /// Lift the pen and hand back the finished stroke, if it touched anything
    pub fn pen_up(&mut self) -> Option<Vec<Point>> {
        self.pen = PenState::Idle;
        if self.current.is_empty() {
            return None;
        }
        let stroke = std::mem::take(&mut self.current);
        self.strokes.push(stroke.clone());
        Some(stroke)
    }

    /// Blank the buffer and forget every stroke
    pub fn clear(&mut self) {
        self.buffer.pixels_mut().for_each(|p| *p = Luma([0]));
        self.current.clear();
        self.strokes.clear();
    }
}
