//! Drives an engine the way an interactive front end would: each "request" reloads the session's state from JSON,
//! applies one action, and saves the state again. The engine and its random stream live for the whole session, while
//! the state is only ever held in its serialized form between requests.
//!
//! ```bash
//! cargo run --example stepwise_session --features serde
//! ```

use ssq::{QueueEngine, RngSource, SimulationConfig, SimulationState};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy)]
enum Action {
    NextCustomer,
    CompleteSimulation,
    Reset,
}

/// Stand-in for a per-user session store.
struct Session {
    saved_state: String,
}

impl Session {
    fn new() -> serde_json::Result<Self> {
        Ok(Self {
            saved_state: serde_json::to_string(&SimulationState::new())?,
        })
    }

    fn handle(&mut self, engine: &mut QueueEngine<RngSource<rand_pcg::Pcg64>>, action: Action) -> serde_json::Result<()> {
        let mut state: SimulationState = serde_json::from_str(&self.saved_state)?;

        match action {
            Action::NextCustomer => {
                if let Some(record) = engine.advance_one(&mut state) {
                    println!("{}", record);
                } else {
                    println!("simulation already complete");
                }
            },
            Action::CompleteSimulation => {
                let before = state.records().len();
                let records = engine.advance_to_completion(&mut state);
                for record in &records[before..] {
                    println!("{}", record);
                }
            },
            Action::Reset => engine.reset(&mut state),
        }

        println!("{}", state);
        match state.mean_queue_wait_time() {
            Some(wait) => println!("mean queue wait: {:.4}\n", wait),
            None => println!("mean queue wait: not available\n"),
        }

        self.saved_state = serde_json::to_string(&state)?;
        Ok(())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let config = SimulationConfig::new(6, 1.0, 2.5)?;
    let mut engine = QueueEngine::new(config, RngSource::seeded(2024));
    let mut session = Session::new()?;

    let actions = [
        Action::NextCustomer,
        Action::NextCustomer,
        Action::CompleteSimulation,
        Action::NextCustomer,
        Action::CompleteSimulation,
        Action::Reset,
        Action::NextCustomer,
    ];
    for action in actions {
        println!("> {:?}", action);
        session.handle(&mut engine, action)?;
    }

    Ok(())
}
