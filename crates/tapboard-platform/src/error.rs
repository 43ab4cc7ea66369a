use tapboard_ui::MeasureError;
use thiserror::Error;

/// Failures surfaced by a keyboard host to its platform glue.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("keyboard host has been shut down")]
    ShutDown,

    #[error("keyboard layout failed")]
    Layout(#[from] MeasureError),
}
