//! Keys command - reads and edits the authorized keys of one remote

use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info_span;

use crate::domain::{KeyIndex, PublicKey};
use crate::infrastructure::keystore::{AuthorizedKeyList, LocalDirectoryConnector};

/// Arguments for the keys command
#[derive(Args, Clone)]
pub struct KeysArgs {
    /// Name of the remote whose keys to manage
    #[arg(long)]
    pub remote: String,

    /// Home directory of the remote's login user (overrides config)
    #[arg(long)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand, Clone)]
pub enum KeysAction {
    /// Print every key with its index and fingerprint
    List,

    /// Add an OpenSSH public key line
    Add {
        key: String,

        /// Insert before this index instead of appending
        #[arg(long, allow_hyphen_values = true)]
        at: Option<isize>,
    },

    /// Remove keys by index (`2`, `-1`), slice (`1:3`, `::2`) or fingerprint
    Remove {
        #[arg(allow_hyphen_values = true)]
        target: String,
    },
}

pub async fn run(args: KeysArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let remote = super::find_remote(&config, &args.remote).await?;

    let root = args.root.unwrap_or_else(|| config.key_store.root.clone());
    let keys = AuthorizedKeyList::new(Arc::new(LocalDirectoryConnector::new(root)), remote)
        .with_path(config.key_store.authorized_keys_path.clone())
        .with_span(info_span!("keys", remote = %args.remote));

    match args.action {
        KeysAction::List => {
            for (index, key) in keys.keys().await?.iter().enumerate() {
                println!(
                    "{}\t{}\t{}\t{}",
                    index,
                    key.algorithm(),
                    key.fingerprint(),
                    key.comment().unwrap_or("")
                );
            }
        }
        KeysAction::Add { key, at } => {
            let key: PublicKey = key.parse()?;
            let fingerprint = key.fingerprint();

            match at {
                Some(index) => keys.insert(index, key).await?,
                None => keys.append(key).await?,
            }
            println!("Added {}", fingerprint);
        }
        KeysAction::Remove { target } => {
            let removed = if target.starts_with("SHA256:") {
                remove_by_fingerprint(&keys, &target).await?
            } else {
                keys.remove(KeyIndex::parse(&target)?).await?
            };

            for key in removed {
                println!("Removed {}", key.fingerprint());
            }
        }
    }

    Ok(())
}

async fn remove_by_fingerprint(
    keys: &AuthorizedKeyList,
    fingerprint: &str,
) -> anyhow::Result<Vec<PublicKey>> {
    let Some(key) = keys
        .keys()
        .await?
        .into_iter()
        .find(|key| key.fingerprint() == fingerprint)
    else {
        anyhow::bail!("No key with fingerprint {}", fingerprint);
    };

    if keys.remove_key(&key).await? {
        Ok(vec![key])
    } else {
        Ok(Vec::new())
    }
}
