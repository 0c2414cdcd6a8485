//! Interactive viewer for the response chart.
pub mod plots;
pub mod window;

pub use window::show;
