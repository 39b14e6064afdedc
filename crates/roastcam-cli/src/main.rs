//! Roastcam CLI — entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use roastcam::{capture_photo, DirectoryWatcher, RoastPersona, RoastSink, DEFAULT_WARMUP};

mod config;

use config::{resolve_images_dir, Config};

#[derive(Parser)]
#[command(
    name = "roastcam",
    about = "Capture a webcam photo and get roasted by a vision model",
    version
)]
struct Cli {
    /// Directory where captures land (default: ./images).
    #[arg(long)]
    images_dir: Option<String>,

    /// Roast persona to use.
    #[arg(long, value_enum, default_value = "sassy-cat")]
    persona: PersonaKind,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PersonaKind {
    /// Sassy cat mortgage advisor (temperature 0.7).
    SassyCat,
    /// Deadpan real-estate appraiser (temperature 0.0).
    Appraiser,
}

impl PersonaKind {
    fn persona(self) -> RoastPersona {
        match self {
            PersonaKind::SassyCat => RoastPersona::sassy_cat(),
            PersonaKind::Appraiser => RoastPersona::appraiser(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one photo and print its roast.
    Snap,

    /// Roast an existing image file.
    Roast {
        /// Path to the image.
        path: PathBuf,
    },

    /// Watch the images directory and roast every new capture.
    Watch,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Snap => {
            let config = Config::from_env()?;
            let client = config.client()?;
            let persona = cli.persona.persona();
            let dir = resolve_images_dir(cli.images_dir.as_deref());
            tracing::debug!("Using model {} at {}", config.model, config.base_url);

            println!("Taking your photo...");
            let captured =
                tokio::task::spawn_blocking(move || capture_photo(&dir, DEFAULT_WARMUP)).await??;
            println!("Photo saved to: {}", captured.path.display());

            println!("Processing image...");
            let roast = client.roast_image(&captured.path, &persona).await;
            println!("\n{roast}");
        }

        Commands::Roast { path } => {
            let config = Config::from_env()?;
            let client = config.client()?;

            println!("Processing image...");
            let roast = client.roast_image(&path, &cli.persona.persona()).await;
            println!("\n{roast}");
        }

        Commands::Watch => {
            let config = Config::from_env()?;
            let client = config.client()?;
            let dir = resolve_images_dir(cli.images_dir.as_deref());
            tracing::info!("Using model {} at {}", config.model, config.base_url);

            let watcher = DirectoryWatcher::new(&dir)?;
            println!("Watching for new images in: {}", dir.display());
            println!("Press Ctrl+C to stop...");

            let sink = RoastSink::new(client, cli.persona.persona()).with_echo(true);
            watcher
                .run(&sink, async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "roastcam", &mut std::io::stdout());
        }
    }

    Ok(())
}
