//! Foundation utilities shared by all engine modules

pub mod logging;
pub mod math;
