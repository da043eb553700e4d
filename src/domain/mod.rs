// Domain layer: lead records, outbound message shapes and the mailer port.

pub mod model;
pub mod ports;
