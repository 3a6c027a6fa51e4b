//! Remotes command - lists every remote a key can be pushed to

use std::collections::BTreeMap;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let mut remotes = BTreeMap::new();
    for set in super::remote_sets(&config)? {
        for (name, remote) in set.remotes().await? {
            remotes.entry(name).or_insert(remote);
        }
    }

    if remotes.is_empty() {
        eprintln!("No remotes configured");
    }

    for (name, remote) in remotes {
        println!("{}\t{}", name, remote);
    }

    Ok(())
}
