//! Agromanagement calendar generation and crop rotation scheduling for the
//! WOFOST/PCSE crop-growth simulation engine.
//!
//! The core is pure in-memory data transformation: declarative crop
//! configurations become date-keyed campaign calendars, chained into
//! rotations and serialized to the engine's fixed YAML schema. All I/O lives
//! in the CLI binary.

pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod plan;

pub use config::CropParameters;
pub use error::{CropCalError, Result};
pub use logic::rotation::CropRotation;
pub use logic::single_rotation::SingleRotationCalendar;
pub use models::calendar::AgroManagement;
pub use models::crop::{Crop, CropSpec, Season};
pub use plan::RotationPlan;
