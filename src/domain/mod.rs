// Domain layer: page/catalog models and the ports the export pipeline plugs into.

pub mod model;
pub mod ports;
