// Domain layer: complaint models, the model output schema and ports (interfaces).

pub mod model;
pub mod ports;
pub mod schema;
