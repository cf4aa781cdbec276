//! Settings bundle
//!
//! Wires the layered configuration object into an application: a default
//! option set, a `--config` flag, and a two-stage resolution that reads the
//! config file from the application path.

pub mod bundle;
pub mod context;
pub mod flags;

pub use bundle::{Bundle, BUNDLE_NAME};
pub use context::AppContext;
pub use flags::{ConfigFlags, FlagSet};
