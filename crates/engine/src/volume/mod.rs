pub mod area;
pub mod position;
pub mod selection;

pub use area::AreaVolume;
pub use position::{BlockPos, Location, WorldCatalog, WorldId};
pub use selection::Selection;
