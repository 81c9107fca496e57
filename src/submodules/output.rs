//! Logging setup for figure runs.

use std::{fmt, fs::File, time::Instant};

use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{
    fmt::{format::Writer, layer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

/// Stamps each event with the time since logging was set up, e.g. `   0.042s`.
#[derive(Debug, Clone, Copy)]
struct RunClock {
    start: Instant,
}

impl RunClock {
    fn new() -> Self {
        RunClock { start: Instant::now() }
    }
}

impl FormatTime for RunClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{:>8.3}s", self.start.elapsed().as_secs_f64())
    }
}

pub fn setup_output(log_file: Option<&String>, verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let clock = RunClock::new();
    match log_file.map(|path| (path, File::create(path))) {
        Some((path, Ok(log))) => {
            let file_layer = layer()
                .with_writer(log)
                .with_timer(clock)
                .with_ansi(false)
                .with_filter(level);
            Registry::default().with(file_layer).init();
            info!("Log will be written to: {}", path);
        }
        other => {
            if let Some((path, Err(e))) = other {
                eprintln!("Could not create log file {}: {}", path, e);
            }
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(clock)
                .with_ansi(true)
                .with_filter(level);
            Registry::default().with(stdout_layer).init();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn stamp(clock: &RunClock) -> String {
        let mut text = String::new();
        clock.format_time(&mut Writer::new(&mut text)).unwrap();
        text
    }

    #[test]
    fn stamp_is_elapsed_seconds() {
        let clock = RunClock { start: Instant::now() - Duration::from_millis(1500) };
        let text = stamp(&clock);
        assert_eq!(text.len(), 9, "{text:?}");
        assert!(text.ends_with('s'));
        let seconds: f64 = text.trim().trim_end_matches('s').parse().unwrap();
        assert!((1.5..2.5).contains(&seconds), "{seconds}");
    }

    #[test]
    fn fresh_clock_starts_near_zero() {
        let text = stamp(&RunClock::new());
        let seconds: f64 = text.trim().trim_end_matches('s').parse().unwrap();
        assert!(seconds < 1.0);
    }
}
