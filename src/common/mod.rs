mod state;

pub use state::{AppState, InFlight, InFlightGuard};
