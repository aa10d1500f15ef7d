// Domain layer: request/rate models, the vendor wire types, the product table
// and the ports the core depends on.

pub mod model;
pub mod offer;
pub mod ports;
pub mod product;
