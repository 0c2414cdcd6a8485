//! Dual-axis response chart: temperature and setpoints on the left axis, PWM
//! duty on the right axis, one vertical marker per curve change.
pub mod model;
pub mod render;

pub use model::{ChartModel, SetpointLine, TransitionMarker};
pub use render::render;
