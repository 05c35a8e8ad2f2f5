use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::{bail, Result, WrapErr};

use page_settings::config::{AppConfig, ConfigManager};
use page_settings::controller::{DeleteOutcome, Navigator, SubmitOutcome};
use page_settings::model::PageRecord;
use page_settings::panel::SettingsPanel;
use page_settings::store::HttpSiteStore;

use crate::cli::Command;

/// Prints navigation targets so scripts can follow a rename or delete
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::info!("Navigate to {}", path);
        println!("navigate: {}", path);
    }
}

pub async fn run(command: Command, manager: &ConfigManager, config: &AppConfig) -> Result<()> {
    match command {
        Command::InitConfig => {
            if manager.write_default()? {
                println!("Wrote {}", manager.config_path().display());
            } else {
                println!("{} already exists", manager.config_path().display());
            }
            Ok(())
        }
        Command::Show { record } => {
            let mut panel = open_panel(&record, config)?;
            panel.toggle_raw_record();
            if let Some(raw) = panel.raw_record().await? {
                println!("{}", raw);
            }
            Ok(())
        }
        Command::Rename { record, name } => {
            let panel = open_panel(&record, config)?;
            let settings = panel.settings();
            println!("{}{}", panel.site_label(), name);

            settings.set_page_name(&name).await;
            if !settings.can_rename().await {
                println!("Page name unchanged");
                return Ok(());
            }
            match settings.submit_rename().await {
                SubmitOutcome::Failed(message) => bail!("Rename failed: {}", message),
                _ => Ok(()),
            }
        }
        Command::Head {
            record,
            set,
            remove,
            rename,
        } => {
            let panel = open_panel(&record, config)?;
            let settings = panel.settings();
            settings
                .edit_head(|model| {
                    for (key, value) in &set {
                        model.set(key, value);
                    }
                    for (old, new) in &rename {
                        model.rename(old, new);
                    }
                    for key in &remove {
                        model.remove(key);
                    }
                })
                .await;

            match settings.submit_head().await {
                SubmitOutcome::Saved => {
                    let head = settings.with_head(|editor| editor.committed().clone()).await;
                    println!("{}", serde_json::to_string_pretty(&head)?);
                    Ok(())
                }
                SubmitOutcome::Ignored => {
                    println!("Head unchanged");
                    Ok(())
                }
                SubmitOutcome::Failed(message) => bail!("Head update failed: {}", message),
            }
        }
        Command::Delete { record, yes } => {
            let mut panel = open_panel(&record, config)?;
            let (question, warning) = panel.delete_prompt().await;
            if !yes {
                bail!("{} {} Re-run with --yes to confirm.", question, warning);
            }

            panel.request_delete();
            match panel.confirm_delete().await {
                DeleteOutcome::Deleted => Ok(()),
                DeleteOutcome::Failed(message) => bail!("Delete failed: {}", message),
                DeleteOutcome::Ignored => bail!("Delete was not performed"),
            }
        }
    }
}

fn open_panel(path: &Path, config: &AppConfig) -> Result<SettingsPanel> {
    let record = PageRecord::load(path)
        .wrap_err_with(|| format!("Failed to load page record {}", path.display()))?;
    let store = HttpSiteStore::from_config(&config.api)?;

    Ok(SettingsPanel::new(
        record,
        Arc::new(store),
        Arc::new(StdoutNavigator),
        Arc::new(|| tracing::debug!("Settings panel closed")),
    ))
}
