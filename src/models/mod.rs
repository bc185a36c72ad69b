pub mod calendar;
pub mod crop;
pub mod event;

pub use calendar::*;
pub use crop::*;
pub use event::*;
