pub mod app;
pub mod components;
pub mod dialog_layer;
pub mod terminal_guard;

pub use app::{App, AppEvent};
pub use dialog_layer::DialogLayer;
