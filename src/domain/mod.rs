// Domain layer: comment models, page layout constants and ports (interfaces).

pub mod layout;
pub mod model;
pub mod ports;
