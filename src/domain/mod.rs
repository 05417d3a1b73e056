// Domain layer: models, ports and the pure search services (analysis, keywords, scoring, bucketing).
// No I/O happens here.

pub mod model;
pub mod ports;

pub mod services;
