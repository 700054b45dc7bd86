mod app;
mod board;
mod message;
mod state;

pub use app::{DigitPadApp, run};
pub use message::Message;
pub use state::{AppState, ShownLabel};
