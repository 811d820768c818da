//! HTTP handlers for the AgroSense API

pub mod fields;
pub mod gdd;
pub mod health;
pub mod irrigation;
pub mod readings;
pub mod recommendations;
pub mod weather;

pub use fields::*;
pub use gdd::*;
pub use health::*;
pub use irrigation::*;
pub use readings::*;
pub use recommendations::*;
pub use weather::*;
