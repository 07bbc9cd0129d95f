//! Domain types for the journey planner.
//!
//! Identifiers are validated at construction time, so code that receives
//! a `StopId` or `LineId` can trust it is well-formed.

mod coord;
mod ids;
mod journey;
mod mode;
mod stop;

pub use coord::{Coordinate, densify, interpolate_line, travel_minutes};
pub use ids::{InvalidId, LineId, RouteId, StopId};
pub use journey::{Journey, JourneySegment, SegmentKind};
pub use mode::{TransportMode, UnknownMode};
pub use stop::{Correspondence, Line, Stop};
