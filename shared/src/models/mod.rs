//! Domain models for the AgroSense platform

mod crop;
mod field;
mod gdd;
mod irrigation;
mod reading;
mod recommendation;
mod soil;
mod weather;

pub use crop::*;
pub use field::*;
pub use gdd::*;
pub use irrigation::*;
pub use reading::*;
pub use recommendation::*;
pub use soil::*;
pub use weather::*;
