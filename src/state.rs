use crate::{CustomerRecord, SimulationConfig, Statistics};

/// Mutable state of one simulation run: the customers simulated so far plus the running clocks and totals needed to
/// simulate the next one.
///
/// A [`SimulationState`] belongs to the driver, not to the engine. The driver creates it empty, hands it to
/// [`QueueEngine::advance_one()`] or [`QueueEngine::advance_to_completion()`] as often as it likes, persists it between
/// interactions if it needs to, and discards it through [`reset()`]. Only the engine appends to it, and records are
/// only ever appended, never changed.
///
/// Concurrent advances on one state are not supported; give each session its own value.
///
/// With the `serde` feature a deserialized state is checked before it is accepted: the counters must match the number
/// of records, record indices must run 1, 2, 3, ..., the first customer must arrive at time zero, every record must
/// respect the single-server ordering, and the clocks must agree with the last record. Running totals are rebuilt from
/// the records rather than trusted.
///
/// [`QueueEngine::advance_one()`]: crate::QueueEngine::advance_one
/// [`QueueEngine::advance_to_completion()`]: crate::QueueEngine::advance_to_completion
/// [`reset()`]: SimulationState::reset
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawState"))]
pub struct SimulationState {
    records: Vec<CustomerRecord>,
    current_customer_index: usize,
    cumulative_arrival_clock: f64,
    last_service_end_time: f64,
    total_interarrival_time: f64,
    total_service_time: f64,
    arrivals_count: usize,
    departures_count: usize,
}

impl SimulationState {
    /// An empty state: no records, every clock and counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and return to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Every simulated customer, in arrival order.
    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    /// The most recently simulated customer, if any.
    pub fn last_record(&self) -> Option<&CustomerRecord> {
        self.records.last()
    }

    /// Number of customers simulated so far.
    pub fn current_customer_index(&self) -> usize {
        self.current_customer_index
    }

    /// Arrival time of the most recent customer.
    pub fn cumulative_arrival_clock(&self) -> f64 {
        self.cumulative_arrival_clock
    }

    /// Time at which the server finishes with the most recent customer. Never decreases.
    pub fn last_service_end_time(&self) -> f64 {
        self.last_service_end_time
    }

    /// Sum of all interarrival times.
    pub fn total_interarrival_time(&self) -> f64 {
        self.total_interarrival_time
    }

    /// Sum of all service times.
    pub fn total_service_time(&self) -> f64 {
        self.total_service_time
    }

    /// Number of arrivals so far.
    pub fn arrivals_count(&self) -> usize {
        self.arrivals_count
    }

    /// Number of departures so far. Every arrival is eventually served, so this matches [`arrivals_count()`].
    ///
    /// [`arrivals_count()`]: SimulationState::arrivals_count
    pub fn departures_count(&self) -> usize {
        self.departures_count
    }

    /// Whether no customer has been simulated yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the run described by `config` has simulated all of its customers.
    pub fn is_complete(&self, config: &SimulationConfig) -> bool {
        self.current_customer_index >= config.customer_count()
    }

    /// Number of customers still to simulate under `config`.
    pub fn remaining(&self, config: &SimulationConfig) -> usize {
        config.customer_count().saturating_sub(self.current_customer_index)
    }

    /// Mean interarrival time, or `None` before the first customer.
    pub fn mean_interarrival_time(&self) -> Option<f64> {
        self.mean_of(self.total_interarrival_time)
    }

    /// Mean service time, or `None` before the first customer.
    pub fn mean_service_time(&self) -> Option<f64> {
        self.mean_of(self.total_service_time)
    }

    /// Mean queue wait, or `None` before the first customer.
    pub fn mean_queue_wait_time(&self) -> Option<f64> {
        let total: f64 = self.records.iter().map(|record| record.queue_wait_time).sum();
        self.mean_of(total)
    }

    /// Summary statistics over every record, or `None` before the first customer.
    pub fn statistics(&self) -> Option<Statistics> {
        Statistics::from_state(self)
    }

    fn mean_of(&self, total: f64) -> Option<f64> {
        if self.records.is_empty() {
            None
        } else {
            Some(total / self.records.len() as f64)
        }
    }

    /// Begin the next customer: bump the index and advance the arrival clock. Returns the new index and the
    /// customer's arrival time.
    pub(crate) fn admit(&mut self, interarrival_time: f64) -> (usize, f64) {
        self.current_customer_index += 1;
        self.cumulative_arrival_clock += interarrival_time;
        (self.current_customer_index, self.cumulative_arrival_clock)
    }

    /// Finish the customer begun by [`admit()`]: append its record and fold it into the server clock and totals.
    ///
    /// [`admit()`]: SimulationState::admit
    pub(crate) fn append(&mut self, record: CustomerRecord) {
        self.last_service_end_time = record.service_end_time;
        self.total_interarrival_time += record.interarrival_time;
        self.total_service_time += record.service_time;
        self.arrivals_count += 1;
        self.departures_count += 1;
        self.records.push(record);
    }
}

/// Unchecked mirror of [`SimulationState`] so deserialized values are validated before they are accepted.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawState {
    records: Vec<CustomerRecord>,
    current_customer_index: usize,
    cumulative_arrival_clock: f64,
    last_service_end_time: f64,
    arrivals_count: usize,
    departures_count: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawState> for SimulationState {
    type Error = crate::Error;

    fn try_from(raw: RawState) -> crate::Result<Self> {
        use crate::Error;

        let count = raw.records.len();
        if raw.current_customer_index != count {
            return Err(Error::inconsistent("current customer index must equal the number of records"));
        }
        if raw.arrivals_count != count || raw.departures_count != count {
            return Err(Error::inconsistent("arrival and departure counts must equal the number of records"));
        }

        let mut state = Self::new();
        for (position, record) in raw.records.into_iter().enumerate() {
            if record.index != position + 1 {
                return Err(Error::inconsistent("record indices must run 1, 2, 3, ... in order"));
            }
            if position == 0 && (record.interarrival_time != 0.0 || record.arrival_time != 0.0) {
                return Err(Error::inconsistent("first customer must arrive at time zero"));
            }
            if !(record.interarrival_time >= 0.0 && record.service_time >= 0.0 && record.queue_wait_time >= 0.0) {
                return Err(Error::inconsistent("durations must be nonnegative numbers"));
            }
            if !(record.arrival_time >= state.cumulative_arrival_clock) {
                return Err(Error::inconsistent("arrival times must be nondecreasing"));
            }
            if !(record.service_start_time >= record.arrival_time
                && record.service_start_time >= state.last_service_end_time
                && record.service_end_time >= record.service_start_time)
            {
                return Err(Error::inconsistent("service must start after arrival and after the previous departure"));
            }

            state.current_customer_index += 1;
            state.cumulative_arrival_clock = record.arrival_time;
            state.append(record);
        }

        if raw.cumulative_arrival_clock != state.cumulative_arrival_clock {
            return Err(Error::inconsistent("arrival clock must equal the last arrival time"));
        }
        if raw.last_service_end_time != state.last_service_end_time {
            return Err(Error::inconsistent("server clock must equal the last service end time"));
        }
        Ok(state)
    }
}

impl std::fmt::Display for SimulationState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SimulationState with {} customers simulated, server busy until {:.4}",
            self.current_customer_index, self.last_service_end_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> SimulationState {
        let mut state = SimulationState::new();
        let (index, arrival_time) = state.admit(0.0);
        state.append(CustomerRecord {
            index,
            interarrival_time: 0.0,
            arrival_time,
            service_time: 2.0,
            service_start_time: 0.0,
            service_end_time: 2.0,
            queue_wait_time: 0.0,
            projected_next_arrival: None,
        });
        let (index, arrival_time) = state.admit(1.0);
        state.append(CustomerRecord {
            index,
            interarrival_time: 1.0,
            arrival_time,
            service_time: 1.0,
            service_start_time: 2.0,
            service_end_time: 3.0,
            queue_wait_time: 1.0,
            projected_next_arrival: None,
        });
        state
    }

    #[test]
    fn new_state_is_empty() {
        let state = SimulationState::new();
        assert!(state.is_empty());
        assert_eq!(0, state.current_customer_index());
        assert_eq!(0.0, state.last_service_end_time());
        assert_eq!(None, state.mean_service_time());
        assert_eq!(None, state.mean_queue_wait_time());
        assert!(state.statistics().is_none());
    }

    #[test]
    fn admit_and_append_track_totals() {
        let state = populated();
        assert_eq!(2, state.current_customer_index());
        assert_eq!(1.0, state.cumulative_arrival_clock());
        assert_eq!(3.0, state.last_service_end_time());
        assert_eq!(1.0, state.total_interarrival_time());
        assert_eq!(3.0, state.total_service_time());
        assert_eq!(2, state.arrivals_count());
        assert_eq!(2, state.departures_count());
        assert_eq!(Some(0.5), state.mean_interarrival_time());
        assert_eq!(Some(1.5), state.mean_service_time());
        assert_eq!(Some(0.5), state.mean_queue_wait_time());
        assert_eq!(2, state.last_record().map(|record| record.index).unwrap_or_default());
    }

    #[test]
    fn completion_is_relative_to_config() {
        let state = populated();
        let two = SimulationConfig::new(2, 1.0, 1.0).unwrap();
        let five = SimulationConfig::new(5, 1.0, 1.0).unwrap();

        assert!(state.is_complete(&two));
        assert_eq!(0, state.remaining(&two));
        assert!(!state.is_complete(&five));
        assert_eq!(3, state.remaining(&five));
    }

    #[test]
    fn reset_returns_to_default() {
        let mut state = populated();
        state.reset();
        assert_eq!(SimulationState::default(), state);
    }

    #[test]
    fn display_summarizes() {
        assert_eq!(
            "SimulationState with 2 customers simulated, server busy until 3.0000",
            populated().to_string()
        );
    }
}
