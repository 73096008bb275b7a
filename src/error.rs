#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Setting up error reporting failed")]
    InstallingColorEyre(#[source] color_eyre::Report),

    #[error("Setting up logging failed")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Failed to start the async runtime")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("Display at '{}' is not available", .path)]
    DeviceUnavailable {
        path: camino::Utf8PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("The clock layout does not fit on a {width}x{height} display")]
    LayoutDoesNotFit { width: u8, height: u8 },

    #[error("Scroll pHAT HD error")]
    ScrollPhat(#[from] crate::display::scroll_phat_hd::ScrollPhatError),

    #[error("Writing to the terminal failed")]
    Terminal(#[from] std::io::Error),

    #[error("Failed to listen for signals")]
    Signal(#[source] std::io::Error),
}

const EIO: u32 = 5;
const ENODEV: u32 = 19;
const EINVAL: u32 = 22;

impl Error {
    /// errno reported to systemd when the clock stops because of this error.
    pub fn errno(&self) -> u32 {
        match self {
            Error::Config(_) | Error::LayoutDoesNotFit { .. } => EINVAL,
            Error::DeviceUnavailable { .. } => ENODEV,
            Error::Runtime(error) | Error::Terminal(error) | Error::Signal(error) => error
                .raw_os_error()
                .and_then(|errno| u32::try_from(errno).ok())
                .unwrap_or(EIO),
            Error::InstallingColorEyre(_) | Error::Logging(_) | Error::ScrollPhat(_) => EIO,
        }
    }
}
