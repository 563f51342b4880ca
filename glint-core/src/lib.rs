//! Board-agnostic core logic for the Glint display firmware
//!
//! This crate contains everything that does not depend on a specific
//! chip or panel controller:
//!
//! - Board configuration types and validation
//! - Panel operation and GUI hook traits
//! - Staged panel bring-up with per-stage errors
//! - Graphics runtime (display surface, pixel buffers, flush contract, tick counter)
//! - Scene widgets (screen background, text labels)
//! - Periodic timer service driving the tick and render hooks

#![no_std]
#![deny(unsafe_code)]

pub mod bringup;
pub mod config;
pub mod gui;
pub mod scheduler;
pub mod traits;
