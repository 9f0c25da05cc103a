// Domain layer: value objects embedded in requests and the ports the core talks through.

pub mod items;
pub mod model;
pub mod ports;
