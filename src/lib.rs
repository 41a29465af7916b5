//! # Overview
//!
//! ssq simulates a single-server, first-come-first-served queue with exponentially distributed interarrival and
//! service times (an M/M/1 queue), one customer at a time. It is small by design: a [`QueueEngine`] turns a
//! [`SimulationConfig`] and a source of random variates into [`CustomerRecord`]s, appending them to a
//! [`SimulationState`] that the caller owns.
//!
//! * Each customer arrives one interarrival time after the previous one (the first at time zero) and begins service
//!   at the later of its arrival and the moment the server frees up. The difference is its queue wait.
//! * The [`SimulationState`] is an explicit value rather than hidden session storage. A command-line tool, a web
//!   handler, or a test can create it, step it with [`QueueEngine::advance_one()`], finish it with
//!   [`QueueEngine::advance_to_completion()`], persist it between interactions, and reset it.
//! * Randomness is injected through the [`VariateSource`] trait. [`RngSource`] samples [`rand_distr::Exp`] from any
//!   [`rand`] generator, while [`ScriptedSource`] replays fixed sequences for deterministic tests.
//! * [`Statistics`] are derived on demand from the records, never stored alongside them.
//!
//! ```
//! use ssq::{QueueEngine, RngSource, SimulationConfig, SimulationState};
//!
//! let config = SimulationConfig::new(10, 1.0, 2.5).unwrap();
//! let mut engine = QueueEngine::new(config, RngSource::seeded(7));
//! let mut state = SimulationState::new();
//!
//! engine.advance_one(&mut state);
//! let records = engine.advance_to_completion(&mut state);
//! assert_eq!(10, records.len());
//!
//! let stats = state.statistics().unwrap();
//! assert_eq!(10, stats.departures_count);
//! ```
//!
//! # Logging
//!
//! The engine emits [`tracing`] events: `trace` for every simulated customer and `debug` for completions, resets, and
//! ignored advance requests. ssq never installs a subscriber; that is left to the application.
//!
//! # Features
//!
//! ssq offers one feature, `serde`, which derives [`serde`]'s `Serialize` and `Deserialize` for the configuration,
//! records, state, and statistics so that a driver can persist a session between interactions. Deserialized
//! configurations are validated exactly as [`SimulationConfig::new()`] validates them. By default this feature is
//! disabled to avoid a potentially unnecessary dependency.
//!
//! [`serde`]: https://docs.rs/serde/1

mod config;
mod engine;
mod error;
pub mod random;
mod record;
mod state;
mod stats;

pub use config::{SimulationConfig, RATE_FLOOR};
pub use engine::QueueEngine;
pub use error::{Error, Result};
pub use random::{Draw, RngSource, ScriptedSource, VariateSource};
pub use record::CustomerRecord;
pub use state::SimulationState;
pub use stats::Statistics;
