use iced::mouse;
use iced::widget::canvas::{self, Action, Cache, Frame, Geometry, Path, Text};
use iced::{Color, Pixels, Rectangle, Renderer, Size, Theme, keyboard};

use super::{AppState, Message};
use crate::canvas::{BRUSH_RADIUS, PenState};
use crate::models::Point;

const LABEL_SIZE: f32 = 28.0;
const LABEL_COLOR: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };

/// Key that wipes the canvas
const CLEAR_KEY: &str = "n";

/// Canvas program that turns pointer input into messages and paints the strokes
pub struct Board<'a> {
    pub state: &'a AppState,
    pub cache: &'a Cache,
}

fn to_point(position: iced::Point) -> Point {
    Point::new(position.x.round() as i32, position.y.round() as i32)
}

impl canvas::Program<Message> for Board<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let drawing = self.state.canvas.pen() == PenState::Drawing;

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                cursor.position_in(bounds)?;
                Some(Action::publish(Message::PenDown).and_capture())
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) if drawing => {
                let position = cursor.position_from(bounds.position())?;
                Some(Action::publish(Message::PenMoved(to_point(position))).and_capture())
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) if drawing => {
                Some(Action::publish(Message::PenUp).and_capture())
            }
            canvas::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Character(c),
                ..
            }) if c.as_str() == CLEAR_KEY => Some(Action::publish(Message::Clear)),
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame: &mut Frame| {
            frame.fill_rectangle(iced::Point::ORIGIN, frame.size(), Color::BLACK);

            for stroke in self.state.canvas.strokes() {
                for p in stroke {
                    let center = iced::Point::new(p.x as f32, p.y as f32);
                    frame.fill(&Path::circle(center, BRUSH_RADIUS as f32), Color::WHITE);
                }
            }

            // label sits on the bottom-left corner of its box
            for label in &self.state.labels {
                let top = label.bbox.max_y as f32 - LABEL_SIZE;
                let position = iced::Point::new(label.bbox.min_x as f32, top);
                let width = LABEL_SIZE * 0.6 * label.text.len() as f32;
                frame.fill_rectangle(position, Size::new(width, LABEL_SIZE), Color::WHITE);
                frame.fill_text(Text {
                    content: label.text.clone(),
                    position,
                    color: LABEL_COLOR,
                    size: Pixels(LABEL_SIZE),
                    ..Text::default()
                });
            }
        });

        vec![geometry]
    }
}
