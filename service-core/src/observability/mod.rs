pub mod logging;

pub use logging::{init_tracing, shutdown_tracing};
