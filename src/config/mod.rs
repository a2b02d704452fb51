pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "subway-sections")]
#[command(about = "Replay a subway network file and print each line's stations in order")]
pub struct CliConfig {
    /// Path to the TOML network file
    #[arg(short, long, default_value = "network.toml")]
    pub config: String,

    /// Output format, overriding the network file (text, json, csv)
    #[arg(long)]
    pub format: Option<String>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Validate the network file and print a summary without replaying it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies command-line overrides on top of the file's `[output]` table.
    pub fn apply_overrides(&self, config: &mut toml_config::NetworkConfig) {
        if self.format.is_none() && self.output.is_none() {
            return;
        }
        let output = config
            .output
            .get_or_insert_with(|| toml_config::OutputConfig {
                format: Some("text".to_string()),
                path: None,
            });
        if let Some(format) = &self.format {
            output.format = Some(format.clone());
        }
        if let Some(path) = &self.output {
            output.path = Some(path.clone());
        }
    }
}
