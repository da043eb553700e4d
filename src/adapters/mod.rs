// Adapters layer: concrete implementations for external systems (email provider, http server).

pub mod http;
pub mod resend;
