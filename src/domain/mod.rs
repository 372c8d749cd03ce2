// Domain layer: the particle data model and the ports the engine depends on.

pub mod model;
pub mod ports;
