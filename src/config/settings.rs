use crate::adapters::DEFAULT_API_URL;
use crate::config::toml_config::TomlConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
const DEFAULT_RETRY_DELAY_MILLIS: u64 = 500;
const DEFAULT_WIDTH: usize = 80;

/// Fully resolved configuration: command line and environment over the
/// config file over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub platform: String,
    pub candidates_dir: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_millis: u64,
    pub width: usize,
    pub pager: bool,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub api_base_url: Option<String>,
    pub platform: Option<String>,
    pub candidates_dir: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub width: Option<usize>,
    pub no_pager: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            platform: default_platform().to_string(),
            candidates_dir: default_candidates_dir(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_millis: DEFAULT_RETRY_DELAY_MILLIS,
            width: DEFAULT_WIDTH,
            pager: true,
        }
    }
}

impl Settings {
    pub fn resolve(file: Option<&TomlConfig>, overrides: SettingsOverrides) -> Self {
        let mut settings = Settings::default();

        if let Some(file) = file {
            if let Some(url) = &file.api.base_url {
                settings.api_base_url = url.clone();
            }
            if let Some(platform) = &file.api.platform {
                settings.platform = platform.clone();
            }
            if let Some(timeout) = file.api.timeout_seconds {
                settings.timeout_seconds = timeout;
            }
            if let Some(attempts) = file.api.retry_attempts {
                settings.retry_attempts = attempts;
            }
            if let Some(delay) = file.api.retry_delay_millis {
                settings.retry_delay_millis = delay;
            }
            if let Some(dir) = &file.local.candidates_dir {
                settings.candidates_dir = Some(PathBuf::from(dir));
            }
            if let Some(width) = file.display.width {
                settings.width = width;
            }
            if let Some(pager) = file.display.pager {
                settings.pager = pager;
            }
        }

        if let Some(url) = overrides.api_base_url {
            settings.api_base_url = url;
        }
        if let Some(platform) = overrides.platform {
            settings.platform = platform;
        }
        if let Some(dir) = overrides.candidates_dir {
            settings.candidates_dir = Some(dir);
        }
        if let Some(timeout) = overrides.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(width) = overrides.width {
            settings.width = width;
        }
        if overrides.no_pager {
            settings.pager = false;
        }

        settings
    }

    pub fn pager(&self) -> bool {
        self.pager
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn candidates_dir(&self) -> Option<&Path> {
        self.candidates_dir.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay_millis(&self) -> u64 {
        self.retry_delay_millis
    }

    fn width(&self) -> usize {
        self.width
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_platform("platform", &self.platform)?;
        if let Some(dir) = &self.candidates_dir {
            validation::validate_path("candidates_dir", &dir.to_string_lossy())?;
        }
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_range("width", self.width, 40, 400)?;
        Ok(())
    }
}

/// Platform identifier the candidates API expects for this build target.
pub fn default_platform() -> &'static str {
    platform_for(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn platform_for(os: &str, arch: &str) -> &'static str {
    match (os, arch) {
        ("linux", "x86_64") => "linuxx64",
        ("linux", "aarch64") => "linuxarm64",
        ("linux", "x86") => "linuxx32",
        ("linux", "arm") => "linuxarm32hf",
        ("macos", "x86_64") => "darwinx64",
        ("macos", "aarch64") => "darwinarm64",
        ("windows", _) => "windowsx64",
        _ => "exotic",
    }
}

/// `$SDKMAN_DIR/candidates`, else `~/.sdkman/candidates` when it exists.
fn default_candidates_dir() -> Option<PathBuf> {
    let sdkman_dir = std::env::var_os("SDKMAN_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".sdkman")))?;
    let candidates = sdkman_dir.join("candidates");
    candidates.is_dir().then_some(candidates)
}
