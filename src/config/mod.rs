//! Configuration for sandbox-probe.
//!
//! TOML files are optional and only override defaults. They are merged in
//! order (system, user, `--config`, CLI flags), then resolved together with a
//! one-time [`EnvSnapshot`] into a [`HarnessConfig`]. The harness config is the
//! only place the probes and the egress check get their paths, endpoints and
//! credentials from.
//!
//! ```toml
//! [boundary]
//! user_home = "/home/builder"
//!
//! [egress]
//! api_key_var = "PAYMENTS_TEST_KEY"
//! timeout_secs = 5
//! ```

mod env;
mod error;
mod harness;
mod loader;
mod schema;

pub use env::{EnvSnapshot, PROXY_VARS};
pub use error::ConfigError;
pub use harness::{
    BoundaryTargets, DEFAULT_API_KEY_VAR, DEFAULT_LIMIT, DEFAULT_ORIGIN, DEFAULT_TIMEOUT_SECS,
    EgressSettings, HarnessConfig,
};
pub use loader::ConfigLoader;
pub use schema::{BoundaryConfig, Config, EgressConfig};
