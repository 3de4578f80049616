//! Native uMap map documents: several layers plus map-level options.

mod read;
mod write;

pub(crate) use read::*;
