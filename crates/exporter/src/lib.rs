//! Prometheus exporter for deCONZ Zigbee sensors
//!
//! Polls the gateway's sensor collection on a fixed interval and serves the
//! latest readings on `/metrics`.

pub mod api;
pub mod app;
pub mod config;
pub mod metrics;
pub mod poller;
