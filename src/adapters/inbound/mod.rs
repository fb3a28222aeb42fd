mod http_gate;

pub use http_gate::{peer_gate, GateServer, HealthResponse};
