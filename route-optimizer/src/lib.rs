//! Route itinerary optimizer.
//!
//! Answers: "Starting from this origin, in which order and along which
//! paths should I visit these destinations to collect the most value
//! without exceeding my time budget?"
//!
//! The planner runs once from the command line or per request behind the
//! HTTP server in [`web`].

pub mod cache;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod report;
pub mod web;
