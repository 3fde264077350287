/// imgpress image processing server
#[derive(Debug, argh::FromArgs)]
pub struct CliOptions {
    /// print version information and exit
    #[argh(switch, short = 'V')]
    pub version: bool,

    /// logging level (0 = Info, 1 = Debug, 2 = Trace) [env IMGPRESS_VERBOSE]
    #[argh(option, short = 'v')]
    pub verbose: Option<u8>,

    /// address to listen on, default 127.0.0.1:3000 [env IMGPRESS_BIND]
    #[argh(option)]
    pub bind: Option<String>,

    /// largest accepted upload in MiB, default 32 [env IMGPRESS_MAX_UPLOAD_MB]
    #[argh(option)]
    pub max_upload_mb: Option<usize>,
}

fn parse_env_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, anyhow::Error> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {key}: {value:?}"))
}

/// Fill `slot` from the environment when the flag was not given.
fn env_fallback<T: std::str::FromStr>(slot: &mut Option<T>, key: &str) -> Result<(), anyhow::Error> {
    if slot.is_none() {
        if let Ok(value) = std::env::var(key) {
            *slot = Some(parse_env_value(key, &value)?);
        }
    }
    Ok(())
}

impl CliOptions {
    pub fn parse() -> Result<Self, anyhow::Error> {
        let mut args: CliOptions = argh::from_env();

        if args.version {
            println!("imgpress-server {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }

        env_fallback(&mut args.verbose, "IMGPRESS_VERBOSE")?;
        env_fallback(&mut args.bind, "IMGPRESS_BIND")?;
        env_fallback(&mut args.max_upload_mb, "IMGPRESS_MAX_UPLOAD_MB")?;

        Ok(args)
    }
}
