pub const DRIVER_VAR: &str = "FILTER_EXPR_DRIVER";
pub const STRICT_VAR: &str = "FILTER_EXPR_STRICT";

pub const DEFAULT_DRIVER: &str = "postgres";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{var}: expected a boolean, got `{value}`")]
    InvalidFlag { var: &'static str, value: String },
}

/// How a [crate::translate::Compiler] should be set up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompilerConfig {
    /// Backend name, resolved through [crate::translate::Driver]
    pub driver: String,
    /// Reject input the parser could only pass through
    pub strict: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            strict: false,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

impl CompilerConfig {
    /// Reads the configuration through [lookup], falling back to the defaults
    ///  for anything unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(driver) = lookup(DRIVER_VAR) {
            config.driver = driver;
        }
        if let Some(strict) = lookup(STRICT_VAR) {
            config.strict = parse_flag(STRICT_VAR, &strict)?;
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|var| std::env::var(var).ok())
    }
}
