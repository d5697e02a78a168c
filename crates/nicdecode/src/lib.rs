//! `nicdecode` - Sri Lankan National Identity Card number decoder
//!
//! This library decodes NIC numbers into a date of birth and gender, and
//! models the two-screen verification front-end that the `nicdecode` binary
//! drives from a terminal.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod nic;
pub mod render;
pub mod shell;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use nic::{parse, Gender, NicError, NicFormat, NicRecord, FEMALE_DAY_OFFSET};
pub use render::{CheckOutcome, OutputFormat, Renderer};
pub use shell::{App, Form, LineAction, Pacing, Screen};
