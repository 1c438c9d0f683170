use mhs_probe::cli::Cli;
use mhs_probe::config::Config;
use mhs_probe::core::mhs::{get_debug_logger, IsahcMhsClient};
use mhs_probe::core::{ProbeRunner, ReportRenderer};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match main_impl().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every selected check passed
async fn main_impl() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    if cli.init {
        let (path, created) = Config::init()?;
        if created {
            println!("✓ Wrote config template to {}", path.display());
        } else {
            println!("Config already exists at {}", path.display());
        }
        return Ok(true);
    }

    let (mut config, source) = Config::load_with_source(cli.config.as_deref())?;
    if let Some(env) = cli.env {
        config = config.with_environment(env);
    }

    let logger = get_debug_logger();
    logger.config_loaded(
        config.nhs_environment().unwrap_or("<unset>"),
        &source
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
    );

    if cli.check {
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(true);
    }

    let http_client = Box::new(IsahcMhsClient::new()?);
    let runner = ProbeRunner::with_http_client(http_client).with_logger(logger);
    let report = runner.run(&config, cli.probe.into()).await?;

    let renderer = ReportRenderer::new();
    if cli.json {
        println!("{}", renderer.render_json(&report)?);
    } else {
        println!("{}", renderer.render_plain(&report));
    }

    Ok(report.all_passed())
}
