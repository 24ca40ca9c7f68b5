/// Log verbosity, 0 (off) through 5 (trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity(u8);

pub const DEFAULT_VERBOSITY: &str = "3";
const MAX_VERBOSITY: u8 = 5;

impl Verbosity {
    pub fn level(&self) -> u8 {
        self.0
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub fn directive(&self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "info",
            4 => "debug",
            _ => "trace",
        }
    }
}

pub fn verbosity_parser(verbosity_string: &str) -> Result<Verbosity, String> {
    let level: u8 = verbosity_string
        .parse()
        .map_err(|err| format!("Could not parse verbosity: {err:?}"))?;
    if level > MAX_VERBOSITY {
        return Err(format!("Verbosity must be between 0 and {MAX_VERBOSITY}"));
    }
    Ok(Verbosity(level))
}
