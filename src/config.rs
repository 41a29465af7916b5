use crate::{Error, Result};

/// Smallest arrival or service rate an input surface should offer.
///
/// The engine itself accepts any positive, finite rate; this floor exists for drivers that collect rates from a
/// numeric field and need a sensible lower bound for it.
pub const RATE_FLOOR: f64 = 0.1;

/// Immutable parameters of one simulation run.
///
/// Construct with [`new()`], which validates every field, or take the [`Default`] of 50 customers arriving at rate 1.0
/// and served at rate 2.5. Rates are in customers per unit time, so the mean interarrival time is `1 / arrival_rate`
/// and the mean service time is `1 / service_rate`.
///
/// [`new()`]: SimulationConfig::new
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawConfig"))]
pub struct SimulationConfig {
    customer_count: usize,
    arrival_rate: f64,
    service_rate: f64,
    project_next_arrival: bool,
}

impl SimulationConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `customer_count` is zero, or if either rate is not a positive,
    /// finite number.
    pub fn new(customer_count: usize, arrival_rate: f64, service_rate: f64) -> Result<Self> {
        if customer_count < 1 {
            return Err(Error::invalid("customer_count", "must be at least 1"));
        }
        check_rate("arrival_rate", arrival_rate)?;
        check_rate("service_rate", service_rate)?;

        Ok(Self {
            customer_count,
            arrival_rate,
            service_rate,
            project_next_arrival: true,
        })
    }

    /// Enable or disable the diagnostic projection of each customer's successor arrival. Enabled by default.
    ///
    /// The projection consumes one extra arrival-rate draw per customer but never feeds back into the simulated
    /// sequence. Disabling it changes which variates later customers receive from a shared random stream, not the
    /// recurrence itself.
    #[must_use]
    pub fn with_projection(mut self, enabled: bool) -> Self {
        self.project_next_arrival = enabled;
        self
    }

    /// Number of customers a complete run simulates.
    pub fn customer_count(&self) -> usize {
        self.customer_count
    }

    /// Arrival rate, λ.
    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    /// Service rate, μ.
    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    /// Whether each record carries a projected next-arrival time.
    pub fn projects_next_arrival(&self) -> bool {
        self.project_next_arrival
    }

    /// Traffic intensity ρ = λ / μ. Values at or above 1 describe a queue that grows without bound in the long run.
    pub fn traffic_intensity(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            customer_count: 50,
            arrival_rate: 1.0,
            service_rate: 2.5,
            project_next_arrival: true,
        }
    }
}

impl std::fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} customers, arrival rate {}, service rate {}",
            self.customer_count, self.arrival_rate, self.service_rate
        )
    }
}

fn check_rate(parameter: &'static str, rate: f64) -> Result<()> {
    if rate.is_nan() {
        return Err(Error::invalid(parameter, "must be a number"));
    }
    if rate <= 0.0 {
        return Err(Error::invalid(parameter, "must be positive"));
    }
    if rate.is_infinite() {
        return Err(Error::invalid(parameter, "must be finite"));
    }
    Ok(())
}

/// Unvalidated mirror of [`SimulationConfig`] so deserialized values go through [`SimulationConfig::new()`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawConfig {
    customer_count: usize,
    arrival_rate: f64,
    service_rate: f64,
    #[serde(default = "projection_default")]
    project_next_arrival: bool,
}

#[cfg(feature = "serde")]
fn projection_default() -> bool {
    true
}

#[cfg(feature = "serde")]
impl TryFrom<RawConfig> for SimulationConfig {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Ok(Self::new(raw.customer_count, raw.arrival_rate, raw.service_rate)?.with_projection(raw.project_next_arrival))
    }
}
