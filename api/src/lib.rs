pub mod config;
pub mod routes;
pub mod rpc;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod testing;
