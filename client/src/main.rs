use clap::Parser;
use cloudfs_client::config::{Config, Credentials};
use cloudfs_client::engine::SyncEngine;
use cloudfs_client::fs::{FsWrapper, RemoteFS};
use cloudfs_client::mime::MimeTranslator;
use cloudfs_client::remote::http::HttpRemote;
use cloudfs_client::shadow::ShadowCache;
use fuser::MountOption;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

/// Mounts a remote cloud document store as a local FUSE filesystem
/// (spec.md §6.1).
#[derive(Parser, Debug)]
#[command(name = "cloudfs-mount")]
struct Args {
    /// Local directory to mount the filesystem at.
    mount_point: PathBuf,

    /// Override the default config file location (`~/.<app>/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep running in the foreground instead of daemonizing.
    #[arg(long)]
    foreground: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if !args.mount_point.is_dir() {
        tracing::error!(mount_point = %args.mount_point.display(), "mount point does not exist or is not a directory");
        return ExitCode::FAILURE;
    }

    let default_config = Config::default();
    let config_path = args.config.unwrap_or_else(|| default_config.dotfile_dir().join("config.toml"));
    let config = Config::load_or_default(&config_path);

    let credentials = match Credentials::load(&config.token_path()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to obtain OAuth credentials");
            return ExitCode::FAILURE;
        }
    };

    let shadow_dir = config.shadow_dir();
    let cache = match ShadowCache::init(shadow_dir.clone()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, shadow_dir = %shadow_dir.display(), "shadow cache directory already present or unusable");
            return ExitCode::FAILURE;
        }
    };

    let mime = match MimeTranslator::load_or_default(&config.types_path()) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "failed to load MIME translation table");
            return ExitCode::FAILURE;
        }
    };

    let remote = match HttpRemote::new(&config.server_url, &credentials) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "failed to construct remote API client");
            return ExitCode::FAILURE;
        }
    };

    let engine = match SyncEngine::new(remote, cache, mime, "root".to_string(), &config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "initial crawl failed");
            return ExitCode::FAILURE;
        }
    };

    if !args.foreground {
        if let Err(e) = daemonize::Daemonize::new().start() {
            tracing::error!(error = %e, "failed to daemonize");
            return ExitCode::FAILURE;
        }
    }

    let fs = FsWrapper(Arc::new(Mutex::new(RemoteFS::new(engine, config))));
    let options = vec![
        MountOption::FSName("cloudfs".to_string()),
        MountOption::AutoUnmount,
    ];

    tracing::info!(mount_point = %args.mount_point.display(), "mounting");
    if let Err(e) = fuser::mount2(fs, &args.mount_point, &options) {
        tracing::error!(error = %e, "mount failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
