//! The mind-map canvas engine: graph model, coordinate transform and the
//! interactive editor components built on top of them.

pub mod component;
mod connections;
pub mod editor;
pub mod linking;
mod links;
pub mod markup;
pub mod model;
mod node;
pub mod session;
pub mod viewport;
pub mod wire;

pub use component::MindmapEditor;
pub use session::{EditorContext, MapTitle, Session};
pub use wire::MapDoc;
