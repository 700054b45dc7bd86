use crate::models::Point;

#[derive(Debug, Clone)]
pub enum Message {
    PenDown,
    PenMoved(Point),
    PenUp,
    Clear,
}
