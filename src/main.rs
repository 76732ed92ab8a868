use clap::Parser;
use sdk_catalog::core::catalog::filter_candidates;
use sdk_catalog::core::export::{export_candidates, render_candidates};
use sdk_catalog::core::pager::page_or_print;
use sdk_catalog::core::render::{render_installed, render_versions, to_json};
use sdk_catalog::domain::ports::ConfigProvider;
use sdk_catalog::utils::error::ErrorSeverity;
use sdk_catalog::utils::logger;
use sdk_catalog::{
    CatalogService, CliConfig, Command, LocalStorage, OutputFormat, Result, SdkmanApi, Settings,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = run(config.command(), &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,      // lookup miss
            ErrorSeverity::Medium => 2,   // worth retrying
            ErrorSeverity::High => 1,     // bad response or input
            ErrorSeverity::Critical => 3, // configuration or filesystem
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(command: Command, settings: &Settings) -> Result<()> {
    let api = SdkmanApi::from_config(settings)?;
    let service = CatalogService::new(api)
        .with_candidates_dir(settings.candidates_dir().map(|dir| dir.to_path_buf()));
    let width = settings.width();

    match command {
        Command::List {
            filter,
            installed_only,
            format,
        } => {
            let mut candidates = service.list_candidates().await?;
            if let Some(query) = filter {
                candidates = filter_candidates(&candidates, &query);
            }
            if installed_only {
                candidates.retain(|c| c.is_installed());
            }
            output(&render_candidates(&candidates, format, width)?, format, settings)
        }
        Command::Show { candidate, format } => {
            let candidate = service.find_candidate(&candidate).await?;
            let candidates = [candidate];
            output(&render_candidates(&candidates, format, width)?, format, settings)
        }
        Command::Versions { candidate, json } => {
            let versions = service.candidate_versions(&candidate).await?;
            if json {
                println!("{}", to_json(&versions)?);
                Ok(())
            } else {
                page_or_print(&render_versions(&candidate, &versions, width), settings.pager())
            }
        }
        Command::Installed { json } => {
            let installed = service.installed_candidates()?;
            if json {
                println!("{}", to_json(&installed)?);
                Ok(())
            } else {
                page_or_print(&render_installed(&installed), settings.pager())
            }
        }
        Command::Names => {
            for name in service.candidate_names().await? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Default { candidate } => {
            println!("{}", service.default_version(&candidate).await?);
            Ok(())
        }
        Command::Export {
            output_path,
            format,
            filter,
        } => {
            let mut candidates = service.list_candidates().await?;
            if let Some(query) = filter {
                candidates = filter_candidates(&candidates, &query);
            }
            let storage = LocalStorage::new(output_path);
            let file_name = export_candidates(&storage, &candidates, format, width).await?;
            tracing::info!("✅ Exported {} candidates", candidates.len());
            println!("📁 Output saved to: {}/{}", storage.base_path(), file_name);
            Ok(())
        }
    }
}

fn output(text: &str, format: OutputFormat, settings: &Settings) -> Result<()> {
    match format {
        OutputFormat::Text => page_or_print(text, settings.pager()),
        OutputFormat::Json | OutputFormat::Csv => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
