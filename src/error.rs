//! Error types.

use thiserror::Error;

use crate::Side;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving LEDs or talking to the stick.
#[derive(Error, Debug)]
pub enum Error {
    /// Color string is not exactly six hex digits.
    #[error("invalid color '{0}', expected 6 hex digits (e.g. 'FF0000')")]
    InvalidFormat(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("button {0} is not known")]
    UnknownButton(u32),

    /// Button list could not be parsed as comma-separated numbers.
    #[error("invalid button numbers '{0}'")]
    InvalidButtons(String),

    #[error("unknown LED ID '{0}'")]
    UnknownLedId(String),

    /// Required CLI parameter is missing.
    #[error("{0} is required (use --list to see options)")]
    MissingArgument(&'static str),

    #[error("device '{0}' not found")]
    DeviceNotFound(Side),

    #[error("no compatible devices found")]
    NoDevices,

    /// Bulk write to the LED endpoint failed.
    #[error("unable to write LED packet: {0}")]
    Transport(rusb::Error),

    /// Kernel driver detach or interface claim failed.
    #[error("unable to {step} interface: {source} (root permissions required)")]
    ResourceAcquisition { step: &'static str, source: rusb::Error },

    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
