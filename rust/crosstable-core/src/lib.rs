pub mod artifact;
pub mod builder;
pub mod chunk;
pub mod distance;
pub mod graph;
pub mod mask;
pub mod progress;
pub mod table;

pub use artifact::{write_cross_table, ArtifactError, CrossTable, FORMAT_VERSION};
pub use builder::{build_cross_table, BuildError, BuildOutput};
pub use graph::{LevelGraph, MemoryLevelGraph, MemoryWaypointGraph, NodeId, WaypointGraph, INVALID_NODE};
pub use progress::{LogProgress, NullProgress, Progress};
pub use table::{AnchorConflict, CrossTableCell, CrossTableHeader, NO_WAYPOINT};
