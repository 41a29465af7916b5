use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;

use std::collections::VecDeque;

/// The sampling site a variate is drawn for.
///
/// Passing the site alongside each request lets a [`VariateSource`] keep separate streams per site (as
/// [`ScriptedSource`] does) or simply ignore it and draw everything from one generator (as [`RngSource`] does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Draw {
    /// Time between the previous arrival and this one. Never requested for the first customer.
    Interarrival,
    /// Length of one customer's service.
    Service,
    /// Diagnostic look-ahead to the successor's arrival. Not part of the simulated sequence.
    ProjectedArrival,
}

impl Draw {
    fn index(self) -> usize {
        match self {
            Self::Interarrival => 0,
            Self::Service => 1,
            Self::ProjectedArrival => 2,
        }
    }
}

/// Source of exponentially distributed variates consumed by a [`QueueEngine`].
///
/// Implement this trait to substitute deterministic sequences in tests, to replay a recorded run, or to apply a
/// variance-reduction scheme such as common random numbers across several configurations.
///
/// The engine only ever passes positive, finite rates, validated when the [`SimulationConfig`] was built. Callers
/// drawing directly must do the same: the provided sources check this with a debug assertion and, in release builds,
/// return `1 / rate` for a rate that is not positive and finite, which is not a meaningful variate.
///
/// [`QueueEngine`]: crate::QueueEngine
/// [`SimulationConfig`]: crate::SimulationConfig
pub trait VariateSource {
    /// Draw one variate from an exponential distribution with the given rate (mean `1 / rate`).
    fn exponential(&mut self, draw: Draw, rate: f64) -> f64;
}

impl<Source> VariateSource for &mut Source
where
    Source: VariateSource + ?Sized,
{
    fn exponential(&mut self, draw: Draw, rate: f64) -> f64 {
        (**self).exponential(draw, rate)
    }
}

impl<Source> VariateSource for Box<Source>
where
    Source: VariateSource + ?Sized,
{
    fn exponential(&mut self, draw: Draw, rate: f64) -> f64 {
        (**self).exponential(draw, rate)
    }
}

/// A [`VariateSource`] backed by any [`rand`] generator, sampling through [`rand_distr::Exp`].
///
/// All sites share the one generator, so variates are consumed in the order the engine requests them.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R> RngSource<R>
where
    R: Rng,
{
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Shared access to the wrapped generator.
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Unwrap the generator, e.g. to hand it to a later replication.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<Pcg64> {
    /// A reproducible source: the same seed always yields the same variates.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg64::seed_from_u64(seed))
    }

    /// A source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(Pcg64::from_rng(&mut rand::rng()))
    }
}

impl<R> VariateSource for RngSource<R>
where
    R: Rng,
{
    fn exponential(&mut self, _draw: Draw, rate: f64) -> f64 {
        debug_assert!(rate > 0.0 && rate.is_finite(), "exponential rate must be positive and finite, got {rate}");
        match Exp::new(rate) {
            Ok(distribution) => distribution.sample(&mut self.rng),
            Err(_) => rate.recip(),
        }
    }
}

/// A [`VariateSource`] that replays fixed sequences, one per [`Draw`] site.
///
/// Each request pops the next scripted value for its site. Once a site's script runs out, the source yields the
/// distribution mean `1 / rate` for that site, so a short script never aborts a run.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    scripts: [VecDeque<f64>; 3],
}

impl ScriptedSource {
    /// A source with every script empty, which yields distribution means throughout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interarrival script. The first value is consumed by the second customer.
    #[must_use]
    pub fn interarrivals<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.script(Draw::Interarrival, values)
    }

    /// Set the service-time script. The first value is consumed by the first customer.
    #[must_use]
    pub fn services<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.script(Draw::Service, values)
    }

    /// Set the projected-arrival script.
    #[must_use]
    pub fn projections<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.script(Draw::ProjectedArrival, values)
    }

    /// Replace the script for one site.
    #[must_use]
    pub fn script<I>(mut self, draw: Draw, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.scripts[draw.index()] = values.into_iter().collect();
        self
    }

    /// Number of scripted values not yet consumed for one site.
    pub fn remaining(&self, draw: Draw) -> usize {
        self.scripts[draw.index()].len()
    }
}

impl VariateSource for ScriptedSource {
    fn exponential(&mut self, draw: Draw, rate: f64) -> f64 {
        debug_assert!(rate > 0.0 && rate.is_finite(), "exponential rate must be positive and finite, got {rate}");
        self.scripts[draw.index()].pop_front().unwrap_or_else(|| rate.recip())
    }
}
