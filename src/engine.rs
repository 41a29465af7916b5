use crate::random::{Draw, VariateSource};
use crate::{CustomerRecord, SimulationConfig, SimulationState};

use tracing::{debug, trace};

/// Advances a single-server, first-come-first-served queue one customer at a time.
///
/// A [`QueueEngine`] pairs a [`SimulationConfig`] with the [`VariateSource`] that supplies interarrival and service
/// times. It holds no simulation state of its own: every advance takes the driver's [`SimulationState`] by exclusive
/// reference and appends exactly one [`CustomerRecord`] per simulated customer.
///
/// The expected workflow is:
///
/// 1. Build a [`SimulationConfig`] and a [`VariateSource`], then pass both to [`new()`].
/// 2. Create an empty [`SimulationState`].
/// 3. Call [`advance_one()`] to step, or [`advance_to_completion()`] to finish, as often as the driver likes.
///    Requests made after the last customer are ignored.
/// 4. Read records and [`Statistics`] from the state; [`reset()`] it to start over.
///
/// Because the result of any sequence of advances depends only on the prior state and on the variates consumed, an
/// engine may be rebuilt between calls (for example after reloading a persisted state) without changing the outcome,
/// as long as the source resumes where it left off.
///
/// [`new()`]: QueueEngine::new
/// [`advance_one()`]: QueueEngine::advance_one
/// [`advance_to_completion()`]: QueueEngine::advance_to_completion
/// [`reset()`]: QueueEngine::reset
/// [`Statistics`]: crate::Statistics
#[derive(Debug, Clone)]
pub struct QueueEngine<Source>
where
    Source: VariateSource,
{
    config: SimulationConfig,
    source: Source,
}

impl<Source> QueueEngine<Source>
where
    Source: VariateSource,
{
    /// Pair a configuration with the source its variates will be drawn from.
    pub fn new(config: SimulationConfig, source: Source) -> Self {
        Self { config, source }
    }

    /// The configuration this engine simulates.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Exclusive access to the variate source, e.g. to inspect a scripted source mid-run.
    pub fn source_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    /// Give back the variate source.
    pub fn into_source(self) -> Source {
        self.source
    }

    /// Simulate the next customer and return its record.
    ///
    /// The customer arrives one interarrival time after its predecessor (at time zero if it is the first) and begins
    /// service as soon as both it has arrived and the server has finished with the predecessor. With one
    /// non-preemptible server that is `max(arrival_time, state.last_service_end_time())`.
    ///
    /// Returns `None` without touching `state` or drawing any variates if every configured customer has already
    /// been simulated.
    pub fn advance_one(&mut self, state: &mut SimulationState) -> Option<CustomerRecord> {
        if state.is_complete(&self.config) {
            debug!(
                customers = state.current_customer_index(),
                "ignoring advance request for a completed simulation"
            );
            return None;
        }

        let interarrival_time = if state.current_customer_index() == 0 {
            0.0
        } else {
            self.source.exponential(Draw::Interarrival, self.config.arrival_rate())
        };
        let (index, arrival_time) = state.admit(interarrival_time);

        let service_time = self.source.exponential(Draw::Service, self.config.service_rate());
        let service_start_time = arrival_time.max(state.last_service_end_time());
        let service_end_time = service_start_time + service_time;
        let queue_wait_time = service_start_time - arrival_time;

        let projected_next_arrival = if self.config.projects_next_arrival() {
            Some(arrival_time + self.source.exponential(Draw::ProjectedArrival, self.config.arrival_rate()))
        } else {
            None
        };

        let record = CustomerRecord {
            index,
            interarrival_time,
            arrival_time,
            service_time,
            service_start_time,
            service_end_time,
            queue_wait_time,
            projected_next_arrival,
        };
        trace!(
            customer = index,
            arrival = arrival_time,
            service_start = service_start_time,
            service_end = service_end_time,
            wait = queue_wait_time,
            "simulated customer"
        );

        state.append(record);
        Some(record)
    }

    /// Simulate at most `max_steps` customers, stopping early once the run is complete. Returns how many were
    /// simulated.
    ///
    /// Advancing in several batches produces exactly the same records as one call to [`advance_to_completion()`],
    /// which lets a responsive driver interleave other work with a long run.
    ///
    /// [`advance_to_completion()`]: QueueEngine::advance_to_completion
    pub fn advance_by(&mut self, state: &mut SimulationState, max_steps: usize) -> usize {
        let mut simulated = 0;
        while simulated < max_steps && self.advance_one(state).is_some() {
            simulated += 1;
        }
        simulated
    }

    /// Simulate every remaining customer and return the full record sequence.
    ///
    /// Calling this on a completed state leaves it unchanged.
    pub fn advance_to_completion<'state>(&mut self, state: &'state mut SimulationState) -> &'state [CustomerRecord] {
        loop {
            if state.is_complete(&self.config) {
                break;
            }

            self.advance_one(state);
        }

        debug!(
            customers = state.current_customer_index(),
            makespan = state.last_service_end_time(),
            "simulation complete"
        );
        state.records()
    }

    /// Discard every record and zero all clocks and totals.
    pub fn reset(&self, state: &mut SimulationState) {
        debug!(customers = state.current_customer_index(), "resetting simulation state");
        state.reset();
    }

    /// Whether `state` has simulated every customer this engine is configured for.
    pub fn is_complete(&self, state: &SimulationState) -> bool {
        state.is_complete(&self.config)
    }
}

impl<Source> std::fmt::Display for QueueEngine<Source>
where
    Source: VariateSource,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "QueueEngine for {}", self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedSource;

    fn engine(customers: usize) -> QueueEngine<ScriptedSource> {
        let config = SimulationConfig::new(customers, 2.0, 4.0).unwrap();
        let source = ScriptedSource::new()
            .interarrivals([0.5, 1.2])
            .services([0.8, 0.3, 1.0])
            .projections([0.125, 0.25, 0.5]);
        QueueEngine::new(config, source)
    }

    #[test]
    fn first_customer_arrives_at_zero_without_drawing_an_interarrival() {
        let mut engine = engine(3);
        let mut state = SimulationState::new();

        let first = engine.advance_one(&mut state).expect("simulation is not complete");
        assert_eq!(1, first.index);
        assert_eq!(0.0, first.interarrival_time);
        assert_eq!(0.0, first.arrival_time);
        assert_eq!(0.0, first.service_start_time);
        assert_eq!(0.8, first.service_end_time);
        assert_eq!(2, engine.source_mut().remaining(Draw::Interarrival));
    }

    #[test]
    fn projection_is_diagnostic_only() {
        let mut engine = engine(3);
        let mut state = SimulationState::new();
        engine.advance_to_completion(&mut state);

        let records = state.records();
        assert_eq!(Some(0.125), records[0].projected_next_arrival);
        assert_eq!(Some(0.75), records[1].projected_next_arrival);
        // the projection for customer 1 does not move customer 2
        assert_eq!(0.5, records[1].arrival_time);
    }

    #[test]
    fn disabled_projection_draws_nothing_extra() {
        let config = SimulationConfig::new(2, 2.0, 4.0).unwrap().with_projection(false);
        let source = ScriptedSource::new().projections([9.0]);
        let mut engine = QueueEngine::new(config, source);
        let mut state = SimulationState::new();
        engine.advance_to_completion(&mut state);

        assert!(state.records().iter().all(|record| record.projected_next_arrival.is_none()));
        assert_eq!(1, engine.source_mut().remaining(Draw::ProjectedArrival));
    }

    #[test]
    fn advancing_a_complete_state_is_a_no_op() {
        let mut engine = engine(1);
        let mut state = SimulationState::new();
        assert!(engine.advance_one(&mut state).is_some());

        let before = state.clone();
        assert!(engine.advance_one(&mut state).is_none());
        assert_eq!(before, state);
        assert_eq!(2, engine.source_mut().remaining(Draw::Service), "no variates should be drawn");
    }

    #[test]
    fn advance_by_stops_at_completion() {
        let mut engine = engine(3);
        let mut state = SimulationState::new();

        assert_eq!(2, engine.advance_by(&mut state, 2));
        assert_eq!(1, engine.advance_by(&mut state, 5));
        assert_eq!(0, engine.advance_by(&mut state, 5));
        assert!(engine.is_complete(&state));
    }

    #[test]
    fn reset_allows_a_fresh_run() {
        let mut engine = engine(3);
        let mut state = SimulationState::new();
        engine.advance_to_completion(&mut state);

        engine.reset(&mut state);
        assert!(state.is_empty());
        assert!(!engine.is_complete(&state));

        // scripts are exhausted, so the second run sees distribution means
        let records = engine.advance_to_completion(&mut state);
        assert_eq!(3, records.len());
        assert_eq!(0.0, records[0].arrival_time);
        assert_eq!(0.25, records[0].service_time);
        assert_eq!(0.5, records[1].interarrival_time);
    }

    #[test]
    fn source_is_returned_with_unconsumed_script() {
        let mut engine = engine(3);
        let mut state = SimulationState::new();
        engine.advance_one(&mut state);

        let source = engine.into_source();
        assert_eq!(2, source.remaining(Draw::Interarrival));
        assert_eq!(2, source.remaining(Draw::Service));
        assert_eq!(2, source.remaining(Draw::ProjectedArrival));
    }

    #[test]
    fn display_names_config() {
        assert_eq!(
            "QueueEngine for 3 customers, arrival rate 2, service rate 4",
            engine(3).to_string()
        );
    }
}
