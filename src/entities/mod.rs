mod feedback;
mod location;
mod route;
mod segment;

pub use feedback::Feedback;
pub use location::{Coordinates, Place};
pub use route::Route;
pub use segment::{RiskInputs, Segment, SegmentDraft};
