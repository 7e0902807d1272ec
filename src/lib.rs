//! Cluster Demo - Live dashboard backend for a distributed SQL cluster
//!
//! Generates synthetic write traffic against the cluster, reports cluster
//! health, and streams both to connected viewers over WebSocket.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
