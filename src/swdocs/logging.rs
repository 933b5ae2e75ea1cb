use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";

/// Builds the event filter from a directive such as `"info"` or
/// `"swdocs=debug,tower_http=info"`. Unparseable directives fall back to
/// [`DEFAULT_LEVEL`].
pub fn filter_for(directive: &str) -> EnvFilter {
    let directive = directive.trim();
    if directive.is_empty() {
        return EnvFilter::new(DEFAULT_LEVEL);
    }
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the global subscriber: JSON lines on stderr.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(directive: &str) {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_for(directive))
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(filter_for("swdocs=debug").to_string(), "swdocs=debug");
    }

    #[test]
    fn invalid_or_empty_falls_back() {
        assert_eq!(filter_for("").to_string(), DEFAULT_LEVEL);
        assert_eq!(filter_for("swdocs=loud").to_string(), DEFAULT_LEVEL);
    }

    #[test]
    fn init_twice_is_harmless() {
        init("error");
        init("debug");
    }
}
