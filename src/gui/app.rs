use std::sync::Arc;

use iced::widget::canvas::{Cache, Canvas as CanvasWidget};
use iced::widget::{button, column, row, text};
use iced::{Element, Length, Size};
use tracing::{error, info, warn};

use super::board::Board;
use super::state::{CANVAS_HEIGHT, CANVAS_WIDTH, ShownLabel};
use super::{AppState, Message};
use crate::crops::CropSaver;
use crate::error::RecognizeError;
use crate::recognition::Recognizer;

pub struct DigitPadApp {
    state: AppState,
    recognizer: Arc<Recognizer>,
    crops: Option<CropSaver>,
    cache: Cache,
}

impl DigitPadApp {
    pub fn new(recognizer: Arc<Recognizer>, crops: Option<CropSaver>) -> Self {
        Self {
            state: AppState::default(),
            recognizer,
            crops,
            cache: Cache::new(),
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::PenDown => self.state.canvas.pen_down(),
            Message::PenMoved(point) => {
                if self.state.canvas.pen_moved(point) {
                    self.cache.clear();
                }
            }
            Message::PenUp => {
                if let Some(stroke) = self.state.canvas.pen_up() {
                    self.recognize(&stroke);
                }
                self.cache.clear();
            }
            Message::Clear => {
                self.state.clear();
                self.cache.clear();
            }
        }
    }

    /// Classify the region of the stroke that was just finished
    fn recognize(&mut self, stroke: &[crate::models::Point]) {
        let result = self
            .recognizer
            .recognize_stroke(self.state.canvas.buffer(), stroke);

        match result {
            Ok(recognition) => {
                if let Some(crops) = &mut self.crops {
                    match crops.save(&recognition.crop) {
                        Ok(path) => info!("saved crop {}", path.display()),
                        Err(e) => warn!("{}", e),
                    }
                }

                let prediction = &recognition.prediction;
                info!(
                    "predicted {} ({:.2}%)",
                    prediction.label(),
                    prediction.confidence * 100.0
                );
                self.state.status = format!(
                    "{} - {:.2}%",
                    prediction.label(),
                    prediction.confidence * 100.0
                );
                self.state.labels.push(ShownLabel {
                    bbox: recognition.bbox,
                    text: prediction.label().to_string(),
                });
            }
            Err(RecognizeError::NoDigit) => {}
            Err(e) => {
                error!("recognition failed: {}", e);
                self.state.status = e.to_string();
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let board = CanvasWidget::new(Board {
            state: &self.state,
            cache: &self.cache,
        })
        .width(Length::Fixed(CANVAS_WIDTH as f32))
        .height(Length::Fixed(CANVAS_HEIGHT as f32));

        let controls = row![
            button("Clear").on_press(Message::Clear),
            text(&self.state.status).size(20),
        ]
        .spacing(20)
        .padding(5);

        column![board, controls].into()
    }
}

/// Open the drawing window and block until it is closed
pub fn run(recognizer: Arc<Recognizer>, crops: Option<CropSaver>) -> anyhow::Result<()> {
    iced::application(
        move || DigitPadApp::new(recognizer.clone(), crops.clone()),
        DigitPadApp::update,
        DigitPadApp::view,
    )
    .title("Digit Recognition")
    .window_size(Size::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32 + 50.0))
    .run()
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, NormalizedTensor, Point};
    use crate::recognition::classifier::Classifier;

    struct Fixed(usize);

    impl Classifier for Fixed {
        fn predict(&self, _input: &NormalizedTensor) -> anyhow::Result<[f32; 10]> {
            let mut probs = [0.0; 10];
            probs[self.0] = 1.0;
            Ok(probs)
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _input: &NormalizedTensor) -> anyhow::Result<[f32; 10]> {
            anyhow::bail!("model exploded")
        }
    }

    fn app(classifier: Arc<dyn Classifier>, crops: Option<CropSaver>) -> DigitPadApp {
        DigitPadApp::new(Arc::new(Recognizer::new(classifier)), crops)
    }

    fn draw_line(app: &mut DigitPadApp) {
        app.update(Message::PenDown);
        for x in (100..=120).step_by(4) {
            app.update(Message::PenMoved(Point::new(x, 200)));
        }
        app.update(Message::PenUp);
    }

    #[test]
    fn finished_stroke_shows_a_label() {
        let mut app = app(Arc::new(Fixed(3)), None);
        draw_line(&mut app);

        assert_eq!(app.state.labels.len(), 1);
        let label = &app.state.labels[0];
        assert_eq!(label.text, "Three");
        assert_eq!(
            label.bbox,
            BoundingBox { min_x: 95, min_y: 195, max_x: 126, max_y: 206 }
        );
        assert_eq!(app.state.status, "Three - 100.00%");
    }

    #[test]
    fn click_without_moving_is_ignored() {
        let mut app = app(Arc::new(Fixed(3)), None);
        app.update(Message::PenDown);
        app.update(Message::PenUp);

        assert!(app.state.labels.is_empty());
        assert!(app.state.status.is_empty());
    }

    #[test]
    fn moves_with_pen_up_do_not_draw() {
        let mut app = app(Arc::new(Fixed(3)), None);
        app.update(Message::PenMoved(Point::new(50, 50)));
        app.update(Message::PenUp);

        assert!(app.state.canvas.buffer().pixels().all(|p| p[0] == 0));
        assert!(app.state.labels.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut app = app(Arc::new(Fixed(3)), None);
        draw_line(&mut app);
        app.update(Message::Clear);

        assert!(app.state.labels.is_empty());
        assert!(app.state.status.is_empty());
        assert!(app.state.canvas.buffer().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn classifier_failure_is_shown_in_status() {
        let mut app = app(Arc::new(Broken), None);
        draw_line(&mut app);

        assert!(app.state.labels.is_empty());
        assert!(app.state.status.contains("model exploded"));
    }

    #[test]
    fn crops_are_saved_per_stroke() {
        let dir = tempfile::TempDir::new().unwrap();
        let crops_dir = dir.path().join("crops");
        let mut app = app(Arc::new(Fixed(1)), Some(CropSaver::new(&crops_dir).unwrap()));

        draw_line(&mut app);
        draw_line(&mut app);

        assert!(crops_dir.join("image_1.png").exists());
        assert!(crops_dir.join("image_2.png").exists());
        assert_eq!(app.state.labels.len(), 2);
    }

    #[test]
    fn failed_crop_save_still_shows_label() {
        let dir = tempfile::TempDir::new().unwrap();
        let crops_dir = dir.path().join("crops");
        let saver = CropSaver::new(&crops_dir).unwrap();
        std::fs::remove_dir_all(&crops_dir).unwrap();

        let mut app = app(Arc::new(Fixed(4)), Some(saver));
        draw_line(&mut app);

        assert!(!crops_dir.join("image_1.png").exists());
        assert_eq!(app.state.labels.len(), 1);
        assert_eq!(app.state.labels[0].text, "Four");
        assert_eq!(app.state.status, "Four - 100.00%");
    }
}
