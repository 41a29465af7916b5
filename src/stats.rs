use crate::SimulationState;

use ordered_float::OrderedFloat;

/// Summary of a run so far, computed on demand from a [`SimulationState`].
///
/// Nothing here is stored independently of the records; build a fresh [`Statistics`] after each advance. Because means
/// over zero customers are undefined, [`from_state()`] returns `None` for an empty state and a driver should report
/// the figures as not available.
///
/// [`from_state()`]: Statistics::from_state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Customers the figures are computed over.
    pub customers: usize,
    /// Mean time between consecutive arrivals, counting the first customer's zero.
    pub mean_interarrival_time: f64,
    /// Mean service time.
    pub mean_service_time: f64,
    /// Mean time spent in line before service.
    pub mean_queue_wait_time: f64,
    /// Mean of queue wait plus service.
    pub mean_time_in_system: f64,
    /// Sum of all interarrival times, which is also the last arrival time.
    pub total_interarrival_time: f64,
    /// Sum of all service times, i.e. the server's busy time.
    pub total_service_time: f64,
    /// Sum of all queue waits.
    pub total_queue_wait_time: f64,
    /// Longest single queue wait.
    pub max_queue_wait_time: f64,
    /// Customers who found the server busy on arrival.
    pub customers_who_waited: usize,
    /// Number of arrivals.
    pub arrivals_count: usize,
    /// Number of departures.
    pub departures_count: usize,
    /// Largest service end time, i.e. when the server last went idle.
    pub makespan: f64,
}

impl Statistics {
    /// Compute statistics over every record in `state`, or `None` if there are none.
    pub fn from_state(state: &SimulationState) -> Option<Self> {
        let records = state.records();
        if records.is_empty() {
            return None;
        }

        let customers = records.len();
        let count = customers as f64;
        let total_queue_wait_time: f64 = records.iter().map(|record| record.queue_wait_time).sum();
        let total_time_in_system: f64 = records.iter().map(|record| record.time_in_system()).sum();
        let max_queue_wait_time = records
            .iter()
            .map(|record| OrderedFloat(record.queue_wait_time))
            .max()
            .map_or(0.0, |wait| wait.0);
        let makespan = records
            .iter()
            .map(|record| OrderedFloat(record.service_end_time))
            .max()
            .map_or(0.0, |end| end.0);

        Some(Self {
            customers,
            mean_interarrival_time: state.total_interarrival_time() / count,
            mean_service_time: state.total_service_time() / count,
            mean_queue_wait_time: total_queue_wait_time / count,
            mean_time_in_system: total_time_in_system / count,
            total_interarrival_time: state.total_interarrival_time(),
            total_service_time: state.total_service_time(),
            total_queue_wait_time,
            max_queue_wait_time,
            customers_who_waited: records.iter().filter(|record| record.waited()).count(),
            arrivals_count: state.arrivals_count(),
            departures_count: state.departures_count(),
            makespan,
        })
    }

    /// Fraction of customers who had to wait, or `None` when there are no customers.
    pub fn probability_of_waiting(&self) -> Option<f64> {
        if self.customers > 0 {
            Some(self.customers_who_waited as f64 / self.customers as f64)
        } else {
            None
        }
    }

    /// Fraction of the makespan the server spent busy, or `None` when the makespan is zero.
    pub fn server_utilization(&self) -> Option<f64> {
        if self.makespan > 0.0 {
            Some(self.total_service_time / self.makespan)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Mean Interarrival Time: {:.4}", self.mean_interarrival_time)?;
        writeln!(f, "Mean Service Time: {:.4}", self.mean_service_time)?;
        writeln!(f, "Mean Queue Wait Time: {:.4}", self.mean_queue_wait_time)?;
        writeln!(f, "Total Interarrival Time: {:.4}", self.total_interarrival_time)?;
        writeln!(f, "Total Service Time: {:.4}", self.total_service_time)?;
        writeln!(f, "Total Number of Arrivals: {}", self.arrivals_count)?;
        write!(f, "Total Number of Departures: {}", self.departures_count)
    }
}

#[cfg(test)]
mod tests {
    use super::Statistics;
    use crate::{QueueEngine, ScriptedSource, SimulationConfig, SimulationState};

    fn three_customers() -> SimulationState {
        let config = SimulationConfig::new(3, 1.0, 1.0).unwrap().with_projection(false);
        let source = ScriptedSource::new().interarrivals([0.5, 1.2]).services([0.8, 0.3, 1.0]);
        let mut engine = QueueEngine::new(config, source);
        let mut state = SimulationState::new();
        engine.advance_to_completion(&mut state);
        state
    }

    #[test]
    fn empty_state_has_no_statistics() {
        assert!(SimulationState::new().statistics().is_none());
    }

    #[test]
    fn statistics_over_known_run() {
        let stats = three_customers().statistics().expect("three records were simulated");

        assert_eq!(3, stats.customers);
        assert!((stats.total_interarrival_time - 1.7).abs() < 1e-12);
        assert!((stats.total_service_time - 2.1).abs() < 1e-12);
        assert!((stats.mean_interarrival_time - 1.7 / 3.0).abs() < 1e-12);
        assert!((stats.mean_service_time - 0.7).abs() < 1e-12);
        assert!((stats.mean_queue_wait_time - 0.1).abs() < 1e-12);
        assert!((stats.max_queue_wait_time - 0.3).abs() < 1e-12);
        assert!((stats.makespan - 2.7).abs() < 1e-12);
        assert_eq!(1, stats.customers_who_waited);
        let waiting = stats.probability_of_waiting().expect("three customers were simulated");
        assert!((waiting - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(3, stats.arrivals_count);
        assert_eq!(3, stats.departures_count);

        let utilization = stats.server_utilization().expect("makespan is positive");
        assert!((utilization - 2.1 / 2.7).abs() < 1e-12);
    }

    #[test]
    fn means_agree_with_state_accessors() {
        let state = three_customers();
        let stats = state.statistics().unwrap();
        assert_eq!(Some(stats.mean_interarrival_time), state.mean_interarrival_time());
        assert_eq!(Some(stats.mean_service_time), state.mean_service_time());
        assert_eq!(Some(stats.mean_queue_wait_time), state.mean_queue_wait_time());
    }

    #[test]
    fn zero_makespan_has_no_utilization() {
        let config = SimulationConfig::new(1, 1.0, 1.0).unwrap();
        let mut engine = QueueEngine::new(config, ScriptedSource::new().services([0.0]));
        let mut state = SimulationState::new();
        engine.advance_one(&mut state);

        let stats = state.statistics().unwrap();
        assert_eq!(None, stats.server_utilization());
        assert_eq!(Some(0.0), stats.probability_of_waiting());
    }

    #[test]
    fn hand_built_empty_statistics_report_nothing() {
        let stats = Statistics {
            customers: 0,
            mean_interarrival_time: 0.0,
            mean_service_time: 0.0,
            mean_queue_wait_time: 0.0,
            mean_time_in_system: 0.0,
            total_interarrival_time: 0.0,
            total_service_time: 0.0,
            total_queue_wait_time: 0.0,
            max_queue_wait_time: 0.0,
            customers_who_waited: 0,
            arrivals_count: 0,
            departures_count: 0,
            makespan: 0.0,
        };
        assert_eq!(None, stats.probability_of_waiting());
        assert_eq!(None, stats.server_utilization());
    }
}
