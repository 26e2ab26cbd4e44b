use std::sync::OnceLock;

use anyhow::Context;

static HANDLER: OnceLock<()> = OnceLock::new();

/// Keep the dispatcher alive on Ctrl+C so pytest can finish and report its own exit code.
///
/// The terminal delivers the interrupt to pytest as well. Installing the handler more than
/// once is a no-op.
pub(crate) fn install_interrupt_handler() -> anyhow::Result<()> {
    if HANDLER.get().is_some() {
        return Ok(());
    }

    ctrlc::set_handler(|| {
        tracing::info!("Interrupt received, waiting for pytest to exit");
    })
    .context("Failed to install the Ctrl+C handler")?;

    let _ = HANDLER.set(());

    Ok(())
}
