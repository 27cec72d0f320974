//! # Utility Modules
//!
//! Supporting utilities shared by the codecs.
//!
//! ## Components
//! - **Logging**: Structured logging configuration

pub mod logging;
