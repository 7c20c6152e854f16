//! # Config Command

use anyhow::{Context, Result};

use crate::context::Console;

/// Prints the effective configuration, optionally writing it out.
pub fn show(console: &Console, save: bool) -> Result<()> {
    let rendered = toml::to_string_pretty(&console.config).context("failed to render config")?;
    print!("{rendered}");
    println!("# session file: {}", console.store.path().display());

    if save {
        let path = console.config_file()?;
        console.config.save(Some(path.clone()))?;
        println!("Config saved to {}", path.display());
    }
    Ok(())
}
