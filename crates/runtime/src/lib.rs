pub mod clock;
pub mod event_bus;
pub mod frame;
pub mod timer;

pub use clock::*;
pub use event_bus::*;
pub use frame::*;
pub use timer::*;
