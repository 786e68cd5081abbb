use std::ffi::OsString;
use std::path::PathBuf;

use clap::{App, ArgMatches};
use thiserror::Error;

/// Everything the demo window needs to know before it opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub shader: PathBuf,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shader: PathBuf::from("res/shaders/basic.shader"),
            width: 640,
            height: 480,
            title: String::from("glscratch"),
            vsync: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bad arguments, or a request for `--help`/`--version`. Clap knows how to print these.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("--{arg} must be a positive whole number of pixels, got {value:?}")]
    Dimension { arg: &'static str, value: String },
}

/// Parses command-line arguments (program name first) into a [`Config`]
pub fn parse_args<I, T>(args: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let yaml = load_yaml!("cli.yaml");
    let cli = App::from_yaml(yaml).version(crate_version!());

    let matches = cli.get_matches_from_safe(args)?;

    Config::from_matches(&matches)
}

impl Config {
    fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Self {
            shader: matches.value_of_os("shader").map_or(defaults.shader, PathBuf::from),
            width: dimension(matches, "width")?.unwrap_or(defaults.width),
            height: dimension(matches, "height")?.unwrap_or(defaults.height),
            title: matches.value_of("title").map_or(defaults.title, String::from),
            vsync: !matches.is_present("no-vsync"),
        })
    }
}

fn dimension(matches: &ArgMatches, arg: &'static str) -> Result<Option<u32>, ConfigError> {
    let value = match matches.value_of(arg) {
        Some(v) => v,
        None => return Ok(None),
    };

    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::Dimension { arg, value: value.to_string() }),
    }
}
