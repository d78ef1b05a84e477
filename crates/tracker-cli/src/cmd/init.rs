use anyhow::Context;
use std::path::Path;
use tracker_core::{config::Config, io, paths};

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let project_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    });

    println!("Initializing tracker in: {}", root.display());

    let dir = paths::tracker_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config = serde_yaml::to_string(&Config::new(&project_name))?;
    let created = io::write_if_missing(&paths::config_path(root), config.as_bytes())
        .context("failed to write config.yaml")?;
    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    println!("\nNext: tracker create --name \"<requirement>\"  or  tracker open REQ-XXXXXX");
    Ok(())
}
