pub mod config;
pub mod controller;
pub mod hit;
pub mod store;

pub use config::EditorConfig;
pub use controller::{CanvasController, Gesture};
pub use hit::{handle_at, hit_test};
pub use store::{FieldPatch, FieldStore, Listener, StoreEvent};
