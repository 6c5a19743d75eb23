use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

#[derive(Debug, Error)]
pub enum XstatError {
    #[error("Couldn't connect to X server {display}: {source}")]
    Connect {
        display: String,
        #[source]
        source: ConnectError,
    },

    #[error("Failed to intern atom {name}: {source}")]
    Intern {
        name: &'static str,
        #[source]
        source: ReplyError,
    },

    #[error("X11 connection lost: {0}")]
    ConnectionLost(#[from] ConnectionError),

    #[error("Failed to watch the X11 socket: {0}")]
    EventStream(#[source] std::io::Error),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type XstatResult<T> = Result<T, XstatError>;
