use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn create_filter(verbose: Option<u8>) -> anyhow::Result<EnvFilter> {
    let level_filter = match verbose {
        None | Some(0) => LevelFilter::INFO,
        Some(1) => LevelFilter::DEBUG,
        Some(_) => LevelFilter::TRACE,
    };

    Ok(EnvFilter::from_default_env()
        .add_directive(level_filter.into())
        .add_directive("hyper=info".parse()?)
        .add_directive("h2=info".parse()?))
}

/// Install the global stdout subscriber.
pub fn init(verbose: Option<u8>) -> anyhow::Result<()> {
    let filter = create_filter(verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to install logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        let rendered = |verbose| create_filter(verbose).unwrap().to_string().to_lowercase();

        assert!(rendered(Some(1)).contains("debug"));
        assert!(rendered(Some(5)).contains("trace"));
    }
}
