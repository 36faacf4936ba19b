//! Use cases and ports for the MeshSentry security data plane. Contains no
//! concrete I/O; infrastructure adapters implement the traits in `ports`.
pub mod ports;
pub mod services;
pub mod use_cases;
