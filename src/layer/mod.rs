mod layer;
mod session;
mod set;

pub use layer::{DataLayer, LayerId};
pub use session::MapSession;
pub use set::LayerSet;
