use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter; `RUST_LOG` wins when set.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "gmcli=info,warn",
        2 => "gmcli=debug,info",
        _ => "trace",
    }
}

/// Installs the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(2), "gmcli=debug,info");
        assert_eq!(default_filter(9), "trace");
    }

    #[test]
    fn default_filters_parse() {
        for verbose in 0..4 {
            EnvFilter::try_new(default_filter(verbose)).expect("filter should parse");
        }
    }
}
