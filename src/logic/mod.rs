pub mod calculations;
pub mod rotation;
pub mod search;
pub mod single_rotation;

pub use rotation::CropRotation;
pub use single_rotation::SingleRotationCalendar;
