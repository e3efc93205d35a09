//! Logging setup for the CLI.
//!
//! Diagnostics go through `tracing`; this module installs the subscriber.
//! Command results (what was built, where the server listens) are not logs and
//! are printed by [`crate::output`] instead.
//!
//! Level selection, first match wins:
//!
//! 1. `--verbose`: debug for this crate
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for this crate, warnings for everything else

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "mdjson=debug,tower_http=debug,warn";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "mdjson=info,warn";

/// Install the global tracing subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = select_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && use_colors())
        .with_writer(std::io::stderr)
        .compact();

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Honors the `NO_COLOR` convention and stays plain when stderr is piped.
fn use_colors() -> bool {
    use std::io::IsTerminal;
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse() {
        for directive in [VERBOSE_FILTER, QUIET_FILTER, DEFAULT_FILTER] {
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn verbose_wins_over_quiet() {
        let filter = select_filter(true, true);
        assert!(filter.to_string().contains("mdjson=debug"));
    }

    #[test]
    fn quiet_filter_is_errors_only() {
        let filter = select_filter(false, true).to_string();
        assert!(filter.contains("error") && !filter.contains("debug"), "{filter}");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
