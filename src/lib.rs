//! Ambulance Logistics - emergency response simulator
//!
//! Six fixed ambulance stations, one active emergency at a time, routing over
//! a road network with simulated damage, and an HTML map of the current state.

pub mod city;
pub mod core;
pub mod dispatch;
pub mod emergency;
pub mod network;
pub mod render;
pub mod routing;
