//! Autodock - posture-aware default device switcher
//!
//! This crate keeps a machine's preferred microphone, speaker, and camera
//! in sync with its physical posture (laptop open vs. closed/docked),
//! reacting to hardware hot-plug events and a user-editable priority
//! configuration.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the pure selection policy, and errors
//! - **Application**: Posture detector, orchestrator, applier, and the
//!   port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, sysfs, pactl,
//!   JSON config store, notify-send)
//! - **CLI**: Command-line interface, daemon wiring, and socket control

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
