// Domain layer: request/response DTOs, reference tables and ports (interfaces).

pub mod catalog;
pub mod model;
pub mod ports;
