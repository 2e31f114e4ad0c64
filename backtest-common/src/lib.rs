//! Market data vocabulary shared by the simulation and metrics layers.

pub mod data;
