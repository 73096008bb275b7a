use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;

use crate::binary_clock::BinaryClock;
use crate::config::Backend;
use crate::display::Display;
use crate::error::Error;
use crate::time_source::Clock;

mod binary_clock;
mod cli;
mod config;
mod display;
mod error;
mod layout;
mod logging;
mod oscillator;
mod systemd;
mod time_source;

fn main() -> color_eyre::eyre::Result<()> {
    setup_panic();
    color_eyre::install().map_err(Error::InstallingColorEyre)?;
    let cli = <crate::cli::Cli as clap::Parser>::parse();
    crate::logging::setup(&cli.verbosity).map_err(Error::Logging)?;

    // Must happen before the runtime starts any thread, see `LocalClock`
    let clock = crate::time_source::LocalClock::new();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    runtime.block_on(async_main(cli, clock))?;

    Ok(())
}

fn setup_panic() {
    human_panic::setup_panic!(human_panic::Metadata::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
    .authors(env!("CARGO_PKG_AUTHORS")));
}

async fn async_main(
    cli: crate::cli::Cli,
    clock: crate::time_source::LocalClock,
) -> Result<(), Error> {
    let config = match cli.config {
        Some(path) => crate::config::Config::load(&path).await?,
        None => {
            tracing::debug!("No configuration file given, using defaults");
            crate::config::Config::default()
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        cli::Command::Run => run(config, clock).await,
        cli::Command::VerifyConfig => {
            tracing::info!("Configuration verified");
            Ok(())
        }
    }
}

async fn run(
    config: crate::config::Config,
    clock: crate::time_source::LocalClock,
) -> Result<(), Error> {
    let notifier = crate::systemd::ServiceNotifier::new();
    notifier.starting();

    let result = run_backend(&config, clock, &notifier).await;

    match &result {
        Ok(()) => notifier.stopping(),
        Err(error) => {
            tracing::error!(%error, "Stopping the clock");
            notifier.failed(error.errno());
        }
    }

    result
}

async fn run_backend(
    config: &crate::config::Config,
    clock: crate::time_source::LocalClock,
    notifier: &crate::systemd::ServiceNotifier,
) -> Result<(), Error> {
    // Installed before anything is drawn, so a signal during startup still blanks the display
    let shutdown = shutdown_signal()?;

    match &config.display.backend {
        Backend::ScrollPhatHd { i2c_bus, address } => {
            tracing::info!(%i2c_bus, address, "Opening Scroll pHAT HD");
            let matrix = open_scroll_phat_hd(i2c_bus, *address)?;
            start(matrix, config, clock, notifier, shutdown).await
        }

        Backend::Terminal => {
            tracing::info!("Drawing to the terminal");
            let terminal = crate::display::terminal::Terminal::new(std::io::stdout());
            start(terminal, config, clock, notifier, shutdown).await
        }
    }
}

/// Resolves on the first SIGINT or SIGTERM. Both handlers are installed when this returns.
fn shutdown_signal() -> Result<impl std::future::Future<Output = ()>, Error> {
    let mut interrupt = signal(SignalKind::interrupt()).map_err(Error::Signal)?;
    let mut terminate = signal(SignalKind::terminate()).map_err(Error::Signal)?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("SIGINT received, shutting down"),
            _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
        }
    })
}

fn open_scroll_phat_hd(
    i2c_bus: &camino::Utf8Path,
    address: u8,
) -> Result<
    crate::display::scroll_phat_hd::ScrollPhatHd<linux_embedded_hal::I2cdev>,
    Error,
> {
    let device_unavailable = |source: Box<dyn std::error::Error + Send + Sync>| {
        Error::DeviceUnavailable {
            path: i2c_bus.to_path_buf(),
            source,
        }
    };

    let i2c = linux_embedded_hal::I2cdev::new(i2c_bus)
        .map_err(|error| device_unavailable(error.into()))?;

    crate::display::scroll_phat_hd::ScrollPhatHd::new(i2c, address, &mut linux_embedded_hal::Delay)
        .map_err(|error| device_unavailable(error.into()))
}

async fn start<D>(
    mut matrix: D,
    config: &crate::config::Config,
    clock: crate::time_source::LocalClock,
    notifier: &crate::systemd::ServiceNotifier,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<(), Error>
where
    D: Display,
    Error: From<D::Error>,
{
    matrix.rotate(config.display.rotation);
    matrix.clear();
    matrix.show()?;

    tracing::info!(seed = ?config.animation.seed, "Starting brightness animation");
    let mut binary_clock = BinaryClock::new(
        matrix,
        crate::time_source::TimeSource::new(clock),
        crate::oscillator::Oscillators::seeded(config.animation.seed),
    )?;

    drive(&mut binary_clock, notifier, shutdown, || {
        crate::time_source::until_next_second(time::OffsetDateTime::now_utc())
    })
    .await
}

/// Shows the time once per tick until `shutdown` resolves, then blanks the display.
async fn drive<D, C, R>(
    binary_clock: &mut BinaryClock<D, C, R>,
    notifier: &crate::systemd::ServiceNotifier,
    shutdown: impl std::future::Future<Output = ()>,
    mut next_tick: impl FnMut() -> std::time::Duration,
) -> Result<(), Error>
where
    D: Display,
    C: Clock,
    R: rand::Rng,
    Error: From<D::Error>,
{
    binary_clock.update();
    binary_clock.draw()?;
    notifier.ready();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(next_tick()) => {
                binary_clock.update();
                binary_clock.draw()?;
            }

            _ = &mut shutdown => break,
        }
    }

    let matrix = binary_clock.display_mut();
    matrix.clear();
    matrix.show()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::display::tests::Pixel;
    use crate::display::tests::RecordingDisplay;
    use crate::layout::HAND_POSITIONS;
    use crate::time_source::ClockTime;

    /// Moves one second forward on every read.
    struct TickingClock(Cell<u8>);

    impl Clock for TickingClock {
        fn now(&self) -> ClockTime {
            let second = self.0.get();
            self.0.set(second + 1);
            ClockTime::new(0, 0, second)
        }
    }

    fn seconds_units(frame: &[Pixel]) -> u8 {
        frame
            .iter()
            .filter(|(x, _, brightness)| *x == HAND_POSITIONS[5] && *brightness == 1.0)
            .map(|(_, y, _)| 1u8 << (3 - y / 2))
            .sum()
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_draws_every_tick_and_blanks_on_shutdown() {
        let mut binary_clock = BinaryClock::new(
            RecordingDisplay::default(),
            crate::time_source::TimeSource::new(TickingClock(Cell::new(0))),
            crate::oscillator::Oscillators::seeded(Some(0)),
        )
        .unwrap();

        drive(
            &mut binary_clock,
            &crate::systemd::ServiceNotifier::new(),
            tokio::time::sleep(Duration::from_millis(3_500)),
            || Duration::from_secs(1),
        )
        .await
        .unwrap();

        let matrix = binary_clock.display_mut();
        let frames = &matrix.frames;

        // first frame, three ticks, blank frame
        assert_eq!(frames.len(), 5);
        let seconds: Vec<u8> = frames[..4]
            .iter()
            .map(|frame| {
                assert_eq!(frame.len(), 24);
                seconds_units(frame)
            })
            .collect();
        assert_eq!(seconds, [1, 2, 3, 4]);

        assert!(frames[4].is_empty());
        assert!(matrix.buffer.iter().all(|(_, _, brightness)| brightness == 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_blanks_when_shut_down_before_first_tick() {
        let mut binary_clock = BinaryClock::new(
            RecordingDisplay::default(),
            crate::time_source::TimeSource::new(TickingClock(Cell::new(0))),
            crate::oscillator::Oscillators::seeded(Some(0)),
        )
        .unwrap();

        drive(
            &mut binary_clock,
            &crate::systemd::ServiceNotifier::new(),
            std::future::ready(()),
            || Duration::from_secs(1),
        )
        .await
        .unwrap();

        let frames = &binary_clock.display_mut().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(seconds_units(&frames[0]), 1);
        assert!(frames[1].is_empty());
    }
}
