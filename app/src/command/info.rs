use cmdline_config::Config;
use cmdline_core::Platform;

/// Strategy for displaying the effective configuration.
///
/// Falls back to defaults when no config file exists, and says so.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== cmdline Configuration ===\n");

        println!("Config File:");
        if config_path.exists() {
            println!("  Path: {}", config_path.display());
        } else {
            println!("  Path: {} (not found, using defaults)", config_path.display());
        }
        println!();

        println!("Execution:");
        println!("  Timeout: {}s", config.execution.timeout_secs);
        println!("  Max Output Bytes: {}", config.execution.max_output_bytes);
        println!("  New Shell: {}", config.execution.new_shell);
        println!(
            "  Shell Prefix: {} ({})",
            Platform::current().shell_prefix().join(" "),
            Platform::current()
        );
        println!();

        println!("Environment Overlay:");
        if config.environment.is_empty() {
            println!("  (empty)");
        } else {
            for (name, value) in &config.environment {
                println!("  {name}={}", mask_value(name, value));
            }
        }

        Ok(())
    }
}

/// Hide values of variables that look like credentials.
fn mask_value(name: &str, value: &str) -> String {
    let upper = name.to_ascii_uppercase();
    let sensitive = ["TOKEN", "SECRET", "PASSWORD", "KEY"]
        .iter()
        .any(|marker| upper.contains(marker));
    if !sensitive {
        return value.to_string();
    }
    if value.len() > 8 && value.is_char_boundary(4) {
        format!("{}...***", &value[..4])
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("LANG", "en_US.UTF-8"), "en_US.UTF-8");
        assert_eq!(mask_value("SONAR_TOKEN", "squ_1234567890"), "squ_...***");
        assert_eq!(mask_value("db_password", "short"), "***");
    }
}
