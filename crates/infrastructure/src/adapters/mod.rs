//! Port adapters.

mod reqwest_probe;
mod static_resolver;

pub use reqwest_probe::ReqwestProbe;
pub use static_resolver::StaticIngressResolver;
