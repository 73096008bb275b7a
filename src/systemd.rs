//! Service state notifications for `Type=notify` systemd units.
//!
//! Nothing is sent when `NOTIFY_SOCKET` is unset, e.g. when started from a shell.

#[derive(Debug)]
pub struct ServiceNotifier {
    span: tracing::Span,
}

impl ServiceNotifier {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("systemd"),
        }
    }

    pub fn starting(&self) {
        self.send(&[NotifyState::Status("starting")]);
    }

    /// The first frame is on the display.
    pub fn ready(&self) {
        self.send(&[NotifyState::Ready, NotifyState::Status("showing the time")]);
    }

    pub fn stopping(&self) {
        self.send(&[NotifyState::Stopping]);
    }

    pub fn failed(&self, errno: u32) {
        self.send(&failed_states(errno));
    }

    fn send(&self, states: &[NotifyState<'_>]) {
        let socket_path = std::env::var_os("NOTIFY_SOCKET");

        match notify(socket_path.as_deref(), states) {
            Ok(true) => {
                tracing::debug!(parent: &self.span, ?states, "Notified systemd of service state")
            }
            Ok(false) => {
                tracing::trace!(parent: &self.span, ?states, "Not running under systemd")
            }
            Err(error) => {
                tracing::error!(parent: &self.span, ?error, ?states, "Failed to notify systemd of state change")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NotifyState<'a> {
    Ready,
    Stopping,
    Status(&'a str),
    Errno(u32),
}

fn failed_states(errno: u32) -> [NotifyState<'static>; 3] {
    [
        NotifyState::Status("failed"),
        NotifyState::Errno(errno),
        NotifyState::Stopping,
    ]
}

impl std::fmt::Display for NotifyState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyState::Ready => write!(f, "READY=1"),
            NotifyState::Stopping => write!(f, "STOPPING=1"),
            NotifyState::Status(msg) => write!(f, "STATUS={msg}"),
            NotifyState::Errno(errno) => write!(f, "ERRNO={errno}"),
        }
    }
}

fn message(states: &[NotifyState<'_>]) -> String {
    states.iter().map(|state| format!("{state}\n")).collect()
}

/// Returns whether a notification was sent.
fn notify(
    socket_path: Option<&std::ffi::OsStr>,
    states: &[NotifyState<'_>],
) -> std::io::Result<bool> {
    let Some(socket_path) = socket_path else {
        return Ok(false);
    };

    let socket = std::os::unix::net::UnixDatagram::unbound()?;
    socket.connect(socket_path)?;

    let msg = message(states);
    let len = socket.send(msg.as_bytes())?;

    if len != msg.len() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            "incomplete write",
        ));
    }

    Ok(true)
}
