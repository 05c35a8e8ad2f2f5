use std::path::PathBuf;

use clap::{Parser, Subcommand};

use page_settings::config::AppConfig;

/// Page-Settings: rename, edit head metadata of, and delete pages of a hosted site
#[derive(Parser, Debug, Clone)]
#[command(name = "page-settings")]
#[command(author = "RidgetopAI")]
#[command(version)]
#[command(
    about = "Edit settings of a single page through the site persistence API",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the persistence API. Overrides config.
    #[arg(long, env = "PAGE_SETTINGS_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the persistence API. Overrides config.
    #[arg(long, env = "PAGE_SETTINGS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config.
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the raw page record
    Show {
        /// Page record JSON file
        record: PathBuf,
    },

    /// Rename the page
    Rename {
        record: PathBuf,
        name: String,
    },

    /// Edit and save the page's head metadata
    Head {
        record: PathBuf,

        /// Set an entry (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
        set: Vec<(String, String)>,

        /// Remove an entry (repeatable)
        #[arg(long = "remove", value_name = "KEY")]
        remove: Vec<String>,

        /// Rename an entry's key (repeatable)
        #[arg(long = "rename", value_name = "OLD=NEW", value_parser = parse_pair)]
        rename: Vec<(String, String)>,
    },

    /// Delete the page
    Delete {
        record: PathBuf,

        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Write a default config file if none exists
    InitConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Fold command-line overrides into the loaded config
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["page-settings", "show", "page.json"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(matches!(cli.command, Command::Show { .. }));
    }

    #[test]
    fn test_head_pairs() {
        let cli = Cli::parse_from([
            "page-settings",
            "head",
            "page.json",
            "--set",
            "keywords=shop,sale",
            "--set",
            "og:image=https://x/y.png?a=b",
            "--rename",
            "desc=description",
            "--remove",
            "image",
        ]);
        let Command::Head { set, remove, rename, .. } = cli.command else {
            panic!("expected head command");
        };
        assert_eq!(
            set,
            vec![
                ("keywords".to_string(), "shop,sale".to_string()),
                ("og:image".to_string(), "https://x/y.png?a=b".to_string()),
            ]
        );
        assert_eq!(rename, vec![("desc".to_string(), "description".to_string())]);
        assert_eq!(remove, vec!["image".to_string()]);
    }

    #[test]
    fn test_bad_pair_rejected() {
        let parsed = Cli::try_parse_from(["page-settings", "head", "p.json", "--set", "novalue"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "page-settings",
            "--api-url",
            "https://pages.example.com",
            "--log-level",
            "debug",
            "delete",
            "page.json",
            "--yes",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "https://pages.example.com");
        assert_eq!(config.general.log_level, "debug");
        assert!(matches!(cli.command, Command::Delete { yes: true, .. }));
    }
}
