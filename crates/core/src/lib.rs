//! Core business logic for fxconsol.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Rates come in through the `QuoteProvider` trait, implemented by whatever
//! persistence layer the host application uses.
//!
//! # Modules
//!
//! - `consolidation` - Multi-currency translation and pre-flight rate-gap checks

pub mod consolidation;
