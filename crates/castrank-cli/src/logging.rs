//! Diagnostics for the castrank binary.
//!
//! Diagnostics are line-delimited JSON on stderr and only exist when asked
//! for; without them stderr carries nothing but the error document.

use anyhow::{anyhow, Result};

pub fn init(diagnostics: bool) -> Result<()> {
    if !diagnostics {
        return Ok(());
    }

    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|err| anyhow!("failed to install diagnostics subscriber: {err}"))
}
