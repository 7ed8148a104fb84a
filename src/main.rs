mod cli;

use vocadeck::{config, run, tools};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vocadeck=trace,vocadeck_builder=trace,vocadeck_infer=debug,vocadeck_apkg=debug"
                .to_string()
        } else {
            "vocadeck=info,vocadeck_builder=info,vocadeck_apkg=info,vocadeck_infer=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            input,
            deck_name,
            package_name,
            output_dir,
            language,
            tolerant,
            offline,
            json,
        } => {
            let opts = run::BuildOptions {
                input,
                deck_name,
                package_name,
                output_dir,
                language,
                tolerant,
                offline,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(build(&opts, cli.config.as_deref(), json))
        }
        Commands::Inspect { input, tolerant } => inspect(&input, cli.config.as_deref(), tolerant),
        Commands::Dump {
            package,
            output_dir,
        } => dump(&package, &output_dir),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vocadeck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn build(opts: &run::BuildOptions, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let summary = run::build_deck(&config, opts).await?;

    if json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{summary}");
        if summary.is_clean() {
            println!("\nDeck built without problems.");
        } else {
            println!("\nDeck built with problems (see above).");
        }
    }

    Ok(())
}

fn inspect(input: &Path, config_path: Option<&Path>, tolerant: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let inspection = run::inspect(&config, input, tolerant)?;
    println!("{inspection}");
    Ok(())
}

fn dump(package: &Path, output_dir: &Path) -> Result<()> {
    if !package.exists() {
        anyhow::bail!("Package does not exist: {:?}", package);
    }

    let files = run::dump_package(package, output_dir)?;
    for file in &files {
        println!("Wrote {}", file.display());
    }
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = tools::check_tools(config.phonetics.espeak_path.as_deref());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Phonetics will be reported as failed until they are installed.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            config::validate_providers(&config)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Language: {}", config.deck.language);
    println!("  Unknown columns: {:?}", config.deck.unknown_columns);
    println!("  Sound engine: {:?}", config.sound.engine);
    println!("  Image engine: {:?}", config.image.engine);
    println!("  Phonetics enabled: {}", config.phonetics.enabled);
    println!("  Provider timeout: {}s", config.providers.timeout_secs);

    Ok(())
}
