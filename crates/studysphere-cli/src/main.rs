//! StudySphere resources, from the command line.
//!
//! Browses a bucket kept in a local directory, acting as whichever user the
//! flags name. Every command goes through the same browser the web front end
//! uses, so the same zone rules apply.
//!
//! Usage:
//!   studysphere ls teachers
//!   studysphere --user amy --role teacher upload notes.pdf --to teachers/amy
//!   studysphere --user principal --role admin mkdir announcements
//!   studysphere --user amy --role teacher mv teachers/amy/a.txt b.txt
//!   studysphere --user amy --role teacher rm teachers/amy/old --yes
//!   studysphere get teachers/amy/notes.pdf -o notes.pdf

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use studysphere_kernel::{Browser, LocalStore, StaticAuth, TracingNotifier, load_config};
use studysphere_types::Role;

/// Browse and manage course resources.
#[derive(Parser, Debug)]
#[command(name = "studysphere")]
#[command(about = "Browse and manage StudySphere course resources")]
struct Args {
    /// Act as this user (omit to browse signed out)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Role of --user: student, teacher, admin, pending
    #[arg(short, long, global = true, default_value = "student")]
    role: String,

    /// Directory holding the bucket [default: <data dir>/studysphere/<bucket>]
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file [default: <config dir>/studysphere/resources.ron]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = ".")]
        path: String,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a local file
    Upload {
        file: PathBuf,
        /// Directory to upload into (root redirects to your own zone)
        #[arg(long, default_value = ".")]
        to: String,
        /// Content type to declare [default: guessed from the extension]
        #[arg(long = "type")]
        content_type: Option<String>,
    },
    /// Create a folder
    Mkdir { path: String },
    /// Rename a file or folder in place
    Mv { path: String, new_name: String },
    /// Delete a file, or a folder and everything in it
    Rm {
        path: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print a signed download link
    Url { path: String },
    /// Preview a file (text is printed, other kinds print their link)
    Cat { path: String },
    /// Download a file
    Get {
        path: String,
        /// Where to save it [default: the file's name]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref());

    let root = match args.root {
        Some(root) => root,
        None => dirs::data_local_dir()
            .context("no data directory available; pass --root")?
            .join("studysphere")
            .join(&config.bucket),
    };
    tokio::fs::create_dir_all(&root)
        .await
        .with_context(|| format!("creating bucket directory {}", root.display()))?;

    let auth = match &args.user {
        Some(name) => {
            let role = Role::from_str(&args.role)
                .with_context(|| format!("unknown role: {}", args.role))?;
            StaticAuth::named(name.clone(), role)
        }
        None => StaticAuth::signed_out(),
    };

    tracing::debug!(root = %root.display(), bucket = %config.bucket, "opening bucket");
    let store = Arc::new(LocalStore::new(config.bucket.clone(), root));
    let mut browser =
        Browser::open_for(&auth, store.clone(), Arc::new(TracingNotifier), config).await?;

    commands::run(&mut browser, store.as_ref(), args.command).await
}
