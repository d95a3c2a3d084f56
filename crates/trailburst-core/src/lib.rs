//! Core types and definitions for the TRAILBURST projectile effects.
//!
//! This crate defines the vocabulary shared across all other crates:
//! poses, missile parameters, the trail-store contract and its node layout,
//! easing curves, constants, and errors.
//! It has no dependency on any renderer or engine runtime.

pub mod constants;
pub mod easing;
pub mod error;
pub mod math;
pub mod params;
pub mod trail;
pub mod types;
