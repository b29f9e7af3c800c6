pub mod actions;
pub mod blend;
pub mod checksum;
pub mod color;
pub mod history;
pub mod id;
pub mod io;
pub mod mesh;
pub mod state;

pub use actions::{Action, ActionError, Target};
pub use id::{EntityID, LayerID};
pub use state::{Document, DocumentError};
