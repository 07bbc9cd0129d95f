//! Multi-modal transit journey planner.
//!
//! A web service that answers: "what is the quickest way from this stop to
//! that one, riding the metro, commuter rail, tram and light metro lines and
//! walking between nearby stops?"

pub mod cache;
pub mod catalog;
pub mod domain;
pub mod network;
pub mod planner;
pub mod web;
