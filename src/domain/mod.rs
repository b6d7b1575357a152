// Domain layer: records, derived report views and the ports the core talks through.

pub mod model;
pub mod ports;
