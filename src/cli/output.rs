//! Console output for the storegate CLI.
//!
//! Each method prints one thing the CLI reports. Plain mode uses bracketed
//! tags instead of colors and symbols.

use crate::utils::toml_config::StoregateConfig;
use owo_colors::OwoColorize;
use std::net::SocketAddr;
use std::path::Path;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the startup banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "storegate".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n   storegate v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print the settings a server started from `path` would run with.
    ///
    /// The signing secret itself is never shown, only the variable it comes from.
    pub fn config_summary(&self, path: &Path, config: &StoregateConfig) {
        if self.colored {
            println!("\n  {}", "Configuration".bright_white().bold().underline());
        } else {
            println!("\n  === Configuration ===");
        }

        for (key, value) in config_rows(path, config) {
            if self.colored {
                println!("    {}: {}", key.dimmed(), value.bright_white());
            } else {
                println!("    {}: {}", key, value);
            }
        }
    }

    pub fn config_valid(&self) {
        self.ok("Configuration is valid");
    }

    /// Print where the server accepts requests
    pub fn listening(&self, addr: SocketAddr) {
        self.ok(&format!("Listening on http://{addr}"));

        let docs = format!("OpenAPI document at http://{addr}/api-docs/openapi.json");
        if self.colored {
            println!("  {} {}", "•".blue(), docs);
        } else {
            println!("  [INFO] {}", docs);
        }
    }

    /// Print a fatal problem to stderr
    pub fn failure(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    fn ok(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }
}

fn config_rows(path: &Path, config: &StoregateConfig) -> Vec<(&'static str, String)> {
    vec![
        ("file", path.display().to_string()),
        (
            "listen",
            format!("{}:{}", config.server.host, config.server.port),
        ),
        ("database", config.database.url.clone()),
        (
            "store timeout (s)",
            config.database.timeout().as_secs().to_string(),
        ),
        ("secret from", format!("${}", config.auth.jwt_secret_env)),
        ("token ttl (hours)", config.auth.token_ttl_hours.to_string()),
        (
            "enforce revocation",
            config.auth.enforce_revocation.to_string(),
        ),
    ]
}
