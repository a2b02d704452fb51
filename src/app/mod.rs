pub mod render;
pub mod runner;

pub use render::render;
pub use runner::{NetworkReport, NetworkRunner, OperationOutcome};
