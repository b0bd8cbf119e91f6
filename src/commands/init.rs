use anyhow::Result;
use std::path::PathBuf;

use crate::config::loader;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(loader::config_file_name());

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, loader::default_config_contents())?;
    println!("Created {} configuration file", config_path.display());
    Ok(())
}
