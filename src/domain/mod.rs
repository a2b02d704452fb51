// Domain layer: the section topology, its models, and the ports it needs from the outside.
// No I/O happens here.

pub mod dto;
pub mod model;
pub mod ports;
pub mod sections;
