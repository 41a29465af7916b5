/// Timing of one simulated customer.
///
/// Records are produced by [`QueueEngine::advance_one()`] and appended to a [`SimulationState`]; once appended they
/// are never modified. Every record satisfies:
///
/// * `service_start_time >= arrival_time`
/// * `service_end_time == service_start_time + service_time`
/// * `queue_wait_time == service_start_time - arrival_time`
///
/// The first customer always has `interarrival_time == 0.0` and `arrival_time == 0.0`.
///
/// [`QueueEngine::advance_one()`]: crate::QueueEngine::advance_one
/// [`SimulationState`]: crate::SimulationState
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomerRecord {
    /// 1-based position of the customer in arrival order.
    pub index: usize,
    /// Time since the previous customer arrived.
    pub interarrival_time: f64,
    /// Clock time at which the customer arrived.
    pub arrival_time: f64,
    /// Time the server spends on this customer.
    pub service_time: f64,
    /// Clock time at which the server took this customer.
    pub service_start_time: f64,
    /// Clock time at which this customer left.
    pub service_end_time: f64,
    /// Time spent in line before reaching the server.
    pub queue_wait_time: f64,
    /// Diagnostic look-ahead: this arrival plus a fresh interarrival draw. The next customer's actual arrival is drawn
    /// independently, so the two generally differ.
    pub projected_next_arrival: Option<f64>,
}

impl CustomerRecord {
    /// Clock time of the server's next departure once this customer is in service, i.e. its service end.
    pub fn next_departure(&self) -> f64 {
        self.service_end_time
    }

    /// Queue wait plus service.
    pub fn time_in_system(&self) -> f64 {
        self.service_end_time - self.arrival_time
    }

    /// Whether the customer found the server busy on arrival.
    pub fn waited(&self) -> bool {
        self.queue_wait_time > 0.0
    }
}

impl std::fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "customer {} arrived at {:.4}, served {:.4}..{:.4} after waiting {:.4}",
            self.index, self.arrival_time, self.service_start_time, self.service_end_time, self.queue_wait_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(arrival_time: f64, service_start_time: f64, service_time: f64) -> CustomerRecord {
        CustomerRecord {
            index: 2,
            interarrival_time: arrival_time,
            arrival_time,
            service_time,
            service_start_time,
            service_end_time: service_start_time + service_time,
            queue_wait_time: service_start_time - arrival_time,
            projected_next_arrival: None,
        }
    }

    #[test]
    fn derived_times() {
        let waiting = record(0.5, 0.75, 0.25);
        assert!(waiting.waited());
        assert_eq!(0.5, waiting.time_in_system());
        assert_eq!(1.0, waiting.next_departure());

        let straight_through = record(2.0, 2.0, 1.0);
        assert!(!straight_through.waited());
        assert_eq!(1.0, straight_through.time_in_system());
    }

    #[test]
    fn display_is_one_line() {
        let text = record(0.5, 0.75, 0.25).to_string();
        assert_eq!("customer 2 arrived at 0.5000, served 0.7500..1.0000 after waiting 0.2500", text);
    }
}
