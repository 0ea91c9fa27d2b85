//! Colored terminal logging for the binaries.
//!
//! `RUST_LOG` always wins over the per-style default filter.

use chrono::Local;
use env_logger::fmt::Color;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// `timestamp LEVEL [target] message`, info and above.
    Service,
    /// `time LEVEL message`, warnings and above. Results go to stdout, not the log.
    Cli,
}

impl LogStyle {
    pub fn default_filter(&self) -> &'static str {
        match self {
            LogStyle::Service => "info",
            LogStyle::Cli => "warn",
        }
    }

    pub fn timestamp_format(&self) -> &'static str {
        match self {
            LogStyle::Service => "%Y-%m-%d %H:%M:%S%.3f",
            LogStyle::Cli => "%H:%M:%S%.3f",
        }
    }

    pub fn shows_target(&self) -> bool {
        matches!(self, LogStyle::Service)
    }
}

pub fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::White,
    }
}

pub fn setup_logger(style: LogStyle) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(style.default_filter()));

    builder
        .format(move |buf, record| {
            let mut timestamp_style = buf.style();
            let mut level_style = buf.style();
            let mut message_style = buf.style();

            let timestamp = Local::now().format(style.timestamp_format());
            write!(
                buf,
                "{} {} ",
                timestamp_style.set_color(Color::Rgb(100, 100, 100)).value(timestamp),
                level_style.set_color(level_color(record.level())).value(record.level()),
            )?;
            if style.shows_target() {
                let mut target_style = buf.style();
                write!(buf, "[{}] ", target_style.set_color(Color::Blue).value(record.target()))?;
            }
            writeln!(buf, "{}", message_style.set_color(Color::White).value(record.args()))
        })
        .init();
}
