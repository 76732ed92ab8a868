pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command};

#[cfg(feature = "cli")]
mod args {
    use crate::config::settings::{Settings, SettingsOverrides};
    use crate::config::toml_config::TomlConfig;
    use crate::core::export::OutputFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "sdk-catalog")]
    #[command(about = "Browse the SDKMAN candidate catalog from the terminal")]
    pub struct CliConfig {
        /// Base URL of the candidates API
        #[arg(long, env = "SDKMAN_CANDIDATES_API", global = true)]
        pub api_url: Option<String>,

        /// Platform identifier used for version listings, e.g. linuxx64
        #[arg(long, env = "SDKMAN_PLATFORM", global = true)]
        pub platform: Option<String>,

        /// Directory holding installed candidates
        #[arg(long, env = "SDKMAN_CANDIDATES_DIR", global = true)]
        pub candidates_dir: Option<PathBuf>,

        /// Path to a TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Output width in columns
        #[arg(long, global = true)]
        pub width: Option<usize>,

        /// HTTP request timeout
        #[arg(long, global = true)]
        pub timeout_seconds: Option<u64>,

        /// Print output directly instead of opening the pager
        #[arg(long, global = true)]
        pub no_pager: bool,

        /// Emit logs as JSON
        #[arg(long, global = true)]
        pub log_json: bool,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Option<Command>,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List all candidates (the default command)
        List {
            /// Only show candidates whose name or description contains this text
            #[arg(long)]
            filter: Option<String>,
            /// Only show installed candidates
            #[arg(long)]
            installed_only: bool,
            #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
            format: OutputFormat,
        },
        /// Show a single candidate
        Show {
            candidate: String,
            #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
            format: OutputFormat,
        },
        /// List the available versions of a candidate
        Versions {
            candidate: String,
            #[arg(long)]
            json: bool,
        },
        /// List locally installed candidates
        Installed {
            #[arg(long)]
            json: bool,
        },
        /// Print every candidate identifier
        Names,
        /// Print the default version of a candidate
        Default { candidate: String },
        /// Write the catalog to a file
        Export {
            #[arg(long, default_value = ".")]
            output_path: String,
            #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
            format: OutputFormat,
            #[arg(long)]
            filter: Option<String>,
        },
    }

    impl Default for Command {
        fn default() -> Self {
            Command::List {
                filter: None,
                installed_only: false,
                format: OutputFormat::Text,
            }
        }
    }

    impl CliConfig {
        pub fn overrides(&self) -> SettingsOverrides {
            SettingsOverrides {
                api_base_url: self.api_url.clone(),
                platform: self.platform.clone(),
                candidates_dir: self.candidates_dir.clone(),
                timeout_seconds: self.timeout_seconds,
                width: self.width,
                no_pager: self.no_pager,
            }
        }

        /// Loads the config file, layers the command line on top and validates.
        pub fn load_settings(&self) -> Result<Settings> {
            let file = TomlConfig::discover(self.config.as_deref())?;
            if let Some(file) = &file {
                file.validate()?;
            }
            let settings = Settings::resolve(file.as_ref(), self.overrides());
            settings.validate()?;
            Ok(settings)
        }

        pub fn command(&self) -> Command {
            self.command.clone().unwrap_or_default()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_default_command_is_list() {
            let cli = CliConfig::try_parse_from(["sdk-catalog"]).unwrap();
            assert!(matches!(
                cli.command(),
                Command::List {
                    installed_only: false,
                    format: OutputFormat::Text,
                    ..
                }
            ));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = CliConfig::try_parse_from([
                "sdk-catalog",
                "versions",
                "java",
                "--platform",
                "darwinarm64",
                "--no-pager",
            ])
            .unwrap();

            assert_eq!(cli.platform.as_deref(), Some("darwinarm64"));
            assert!(cli.overrides().no_pager);
            assert!(matches!(cli.command(), Command::Versions { ref candidate, json: false } if candidate == "java"));
        }

        #[test]
        fn test_export_format_parses() {
            let cli = CliConfig::try_parse_from([
                "sdk-catalog",
                "export",
                "--format",
                "csv",
                "--output-path",
                "/tmp/out",
            ])
            .unwrap();

            match cli.command() {
                Command::Export {
                    output_path,
                    format,
                    filter,
                } => {
                    assert_eq!(output_path, "/tmp/out");
                    assert_eq!(format, OutputFormat::Csv);
                    assert!(filter.is_none());
                }
                other => panic!("unexpected command {:?}", other),
            }
        }
    }
}
