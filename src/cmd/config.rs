//! Configuration view and validation commands: `taskdeck config`.

use anyhow::Result;

use taskdeck::config::{TaskdeckConfig, TaskdeckToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &TaskdeckConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("TaskDeck Configuration");
            println!("======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No taskdeck.toml found at {}", config_path.display());
                println!("Using defaults. Run 'taskdeck config init' to create one.");
            }
            println!();

            let toml = TaskdeckToml::load_or_default(config_path)?;
            print_toml(&toml);

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", config.base_url());
            println!("  timeout = {}s", config.timeout().as_secs());
            println!("  data_dir = \"{}\"", config.data_dir().display());
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No taskdeck.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = TaskdeckToml::load(config_path)?.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("taskdeck.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            TaskdeckToml::default().save(config_path)?;

            println!("Created taskdeck.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs");
            println!("  - [notifications] default_duration_ms, max_active");
            println!("  - [claims] subject, name, roles");
            println!();
        }
    }

    Ok(())
}

fn print_toml(toml: &TaskdeckToml) {
    println!("[api]");
    println!("  base_url = \"{}\"", toml.api.base_url);
    println!("  timeout_secs = {}", toml.api.timeout_secs);
    println!();

    if let Some(dir) = &toml.storage.dir {
        println!("[storage]");
        println!("  dir = \"{}\"", dir.display());
        println!();
    }

    println!("[notifications]");
    println!(
        "  default_duration_ms = {}",
        toml.notifications.default_duration_ms
    );
    println!("  max_active = {}", toml.notifications.max_active);
    println!();

    println!("[claims]");
    println!("  subject = {:?}", toml.claims.subject);
    println!("  name = {:?}", toml.claims.name);
    println!("  roles = {:?}", toml.claims.roles);
    println!();

    println!("[logging]");
    println!("  level = \"{}\"", toml.logging.level);
    println!("  json = {}", toml.logging.json);
    println!();
}
