//! The object memory: identity allocation, snapshot lifecycle, frame
//! transactions, undo/redo history, and frame acceptance (which runs the
//! constraint checker from `stratum-metamodel` inline as its last pass).

mod accept;
mod diff;
mod error;
mod foreign;
mod frame;
mod history;
mod id_alloc;
mod memory;
mod mutate;
mod snapshot;
mod view_impl;

pub use diff::FrameDiff;
pub use error::{CoreError, FrameValidationError, TypeError, TypeErrorKind};
pub use foreign::{ForeignError, ForeignInfo, ForeignRecord, ForeignStructure};
pub use frame::{FrameEntry, FrameState, MutableFrame, Ownership, StableFrame};
pub use memory::Memory;
pub use snapshot::{ObjectSnapshot, SnapshotState, StructuralComponent};
pub use view_impl::{MutableFrameView, StableFrameView};
