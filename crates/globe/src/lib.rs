//! Interactive orthographic globe: projection state, render pass, identity-keyed
//! markers, pointer interaction, autopilot/transition animation and the
//! overlay badge anchored to the active destination.

pub mod animation;
pub mod clip;
pub mod config;
pub mod destination;
pub mod input;
pub mod interaction;
pub mod markers;
pub mod overlay;
pub mod projection;
pub mod render;
pub mod widget;

pub use config::{GlobeConfig, Viewport};
pub use destination::{Destination, DestinationId};
pub use input::{Cursor, GlobeInput};
pub use projection::{Projection, Rotation, ScreenPoint};
pub use widget::{Globe, GlobeEvent, GlobeFrame};
