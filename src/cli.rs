use clap::{Parser, Subcommand};
use snafu::ensure;
use std::path::PathBuf;

use crate::error::{
    DownloadIncompleteSnafu, MissingConfigSnafu, PartialDeletionSnafu, PartialUploadSnafu, Result,
};
use crate::storage::TransferManager;
use crate::storage::utils::size::format_size;
use crate::storage::utils::walk::walk;
use crate::utils::confirm_deletion;

#[derive(Parser, Debug)]
#[command(
    name = "ossync",
    version,
    about = "Upload, list and fetch object storage content under a custom folder"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a local file or directory tree
    Put {
        /// Local file or directory
        local: PathBuf,
        /// Path prefix removed from each file before it becomes a key (defaults to LOCAL)
        #[arg(long, env = "OSSYNC_STRIP_PREFIX", conflicts_with = "flat")]
        strip_prefix: Option<String>,
        /// Key every file by its base name only
        #[arg(long)]
        flat: bool,
    },
    /// Upload a literal string as an object
    PutString { key: String, text: String },
    /// Delete objects
    Rm {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Recursively list objects below a prefix
    Ls {
        #[arg(default_value = "")]
        prefix: String,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download an object through its public URL
    Get { key: String, local: PathBuf },
    /// Print the public URL for a relative path, or the base URL
    Url { relative: Option<String> },
}

pub async fn run(args: Args, manager: TransferManager) -> Result<()> {
    match args.command {
        Command::Put {
            local,
            strip_prefix,
            flat,
        } => {
            let outcomes = if flat {
                let files = walk(&local)?;
                manager.batch_upload(&files, "").await
            } else {
                manager.upload_dir(&local, strip_prefix.as_deref()).await?
            };

            let mut failed_paths = Vec::new();
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(receipt) => println!(
                        "✅ Upload: {} → {} ({})",
                        outcome.file.path.display(),
                        receipt.key,
                        format_size(receipt.size)
                    ),
                    Err(e) => {
                        eprintln!("❌ {e}");
                        failed_paths.push(outcome.file.path.display().to_string());
                    }
                }
            }
            if !failed_paths.is_empty() {
                return PartialUploadSnafu { failed_paths }.fail();
            }
        }
        Command::PutString { key, text } => {
            let receipt = manager.put_string(&key, &text).await?;
            println!("✅ Upload: {} ({})", receipt.key, format_size(receipt.size));
        }
        Command::Rm { keys, force } => {
            if !confirm_deletion(&keys, force)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            let mut failed_keys = Vec::new();
            for key in &keys {
                match manager.delete_object(key).await {
                    Ok(()) => println!("Deleted: {key}"),
                    Err(_) => failed_keys.push(key.clone()),
                }
            }
            if !failed_keys.is_empty() {
                return PartialDeletionSnafu { failed_keys }.fail();
            }
        }
        Command::Ls { prefix, json } => {
            let objects = manager.list_directory(&prefix).await?;
            if json {
                println!("{}", serde_json::to_string(&objects)?);
            } else {
                for object in &objects {
                    println!("{:>10} {}", format_size(object.size), object.name);
                }
            }
        }
        Command::Get { key, local } => {
            ensure!(
                manager.config().serves_http(),
                MissingConfigSnafu {
                    field: "access_domain"
                }
            );
            let object = manager.object_for_key(&key);
            if !manager.download_to(&object, &local).await {
                return DownloadIncompleteSnafu {
                    remote_path: key,
                    local_path: local.display().to_string(),
                }
                .fail();
            }
            println!("Downloaded: {key} → {}", local.display());
        }
        Command::Url { relative } => match relative {
            Some(relative) => println!("{}", manager.remote_key_to_public_url(&relative)),
            None => println!("{}", manager.base_url()),
        },
    }
    Ok(())
}
