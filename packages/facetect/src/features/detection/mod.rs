//! Detection manager: orchestrates detectors, the index and the queue.

mod events;
mod manager;
mod ports;
mod worker;


pub use events::{StructuralEvent, StructuralNode};
pub use manager::DetectionManager;
pub use ports::{
    AdditionPolicy, FileHandle, ImplicitFacetListener, ModuleModel, ProjectContext,
    ProjectFileIndex,
};
pub use worker::RedetectionWorker;
