//! Domain-specific error types for flatpanel.
//!
//! Parsing and composition failures are typed so the interactive layer can
//! re-prompt on a bad value; everything above them is wrapped in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a selective-call code or callsign.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The normalized SelCal code is not exactly four characters long.
    #[error("SelCal sequence \"{0}\" is expected to be exactly 4 digits long")]
    InvalidFormat(String),

    /// A character outside the SelCal alphabet.
    #[error("Character \"{0}\" is not valid as a SelCal digit")]
    InvalidCharacter(char),

    /// A SelCal digit that already occurred earlier in the code.
    #[error("Character \"{0}\" already occurred in your SelCal code, digits must be unique")]
    DuplicateCharacter(char),

    /// A SelCal pair that is not in alphabetic order.
    #[error("Sequence \"{first}{second}\" is not allowed, digits must follow alphabetic order within their part")]
    OutOfOrder { first: char, second: char },

    #[error("Callsign sequence \"{0}\" is too short")]
    TooShort(String),

    #[error("Callsign sequence \"{0}\" is too long")]
    TooLong(String),

    #[error("Sequence \"{0}\" is not a valid ICAO airline code")]
    InvalidAirlineCode(String),

    #[error("Sequence \"{0}\" is not a valid flight number")]
    InvalidFlightNumber(String),
}

/// Failures while drawing a flight patch.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The named font could not be located or parsed.
    #[error("Failed to load font '{name}': {reason}")]
    FontLoad { name: String, reason: String },

    /// Reading or writing the canvas image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON aircraft config.
    #[error("Failed to parse aircraft config '{path}': {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse the TOML application settings.
    #[error("Failed to parse settings '{path}': {source}")]
    InvalidToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Desktop backend errors.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The backend command could not be spawned.
    #[error("Failed to run desktop command '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend command exited unsuccessfully.
    #[error("Desktop command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The backend output did not contain a usable value.
    #[error("Unexpected output for setting '{setting}': {output}")]
    UnexpectedOutput { setting: String, output: String },
}
