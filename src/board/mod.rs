//! The weekly scheduling board: cell addressing, grid layout, drag handling
//! and assignment commits.

pub mod cell;
pub mod commit;
pub mod drag;
pub mod grid;

pub use cell::{CellKey, CellKeyError};
pub use commit::{AssignmentCommitter, DropOutcome, JobUpdater};
pub use drag::{DragController, DragPayload, DragState, PayloadError, Release};
pub use grid::{JobsByCell, Week, WeekGrid, WeekOutOfRange};
