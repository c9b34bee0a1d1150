//! CLI entry point for mdblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(version)]
#[command(about = "A minimal markdown blog engine with a web editor", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts
    List,

    /// Print a post
    Show {
        /// Slug of the post
        slug: String,

        /// Print the markdown instead of rendered HTML
        #[arg(long)]
        raw: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug for the new post (derived from the title by default)
        #[arg(short, long)]
        slug: Option<String>,

        /// Read the markdown body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdblog=debug,tower_http=debug,info"
    } else {
        "mdblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            mdblog::commands::init::init_blog(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Serve { port, ip } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog.serve(&ip, port).await?;
        }

        Commands::List => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::list::run(&blog).await?;
        }

        Commands::Show { slug, raw } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::show::run(&blog, &slug, raw).await?;
        }

        Commands::New { title, slug, file } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            mdblog::commands::new::create_post(&blog, &title, slug.as_deref(), file.as_deref())
                .await?;
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
