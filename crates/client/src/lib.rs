//! Client side of precache.
//!
//! This crate provides the network fetch primitive and the request
//! interceptor that routes every request between the cache and the network.

pub mod fetch;
pub mod worker;

pub use fetch::{FetchConfig, HttpNetwork, InterceptedRequest, Method, Network, RequestMode};

pub use worker::{
    ActivationReport, FetchEvent, FetchOutcome, Host, InstallReport, Interceptor, PolicyTable, Registration,
    RequestCategory, ResponseSource, Strategy, WorkerConfig, WorkerState,
};
