//! Effective configuration display.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "path": state.config_path.display().to_string(),
            "exists": state.config_path.exists(),
            "settings": &state.settings,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let source = if state.config_path.exists() {
        style(state.config_path.display().to_string()).dim()
    } else {
        style(format!("{} (not found, defaults)", state.config_path.display())).yellow()
    };
    println!();
    println!("  # {source}");
    println!();
    for line in toml::to_string_pretty(&state.settings)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
