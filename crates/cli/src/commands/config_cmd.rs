//! `saiachain config`: Configuration management commands.

use saiachain_config::SaiaConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match SaiaConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   WARN  {w}");
                }
            }

            println!();
            println!("   Proxy:     {}", config.proxy_uri);
            println!(
                "   Assistant: {}",
                config.assistant_api_url.as_deref().unwrap_or("(not set)")
            );
            println!("   Model:     {}", config.model.model_name);
            println!("   Mode:      {:?}", config.chain.mode);
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = SaiaConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = SaiaConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", SaiaConfig::default_toml());
    Ok(())
}

fn warnings(config: &SaiaConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.require_api_key().is_err() {
        warnings.push(format!(
            "No API key set (set {})",
            saiachain_config::ENV_API_KEY
        ));
    }
    if config.assistant_api_url.is_none() {
        warnings.push(format!(
            "No assistant service URL set (set {}); only local mode will work",
            saiachain_config::ENV_ASSISTANT_API
        ));
    }
    if config.chain.assistant.is_none() {
        warnings.push("No default assistant; pass --assistant to chat".into());
    }
    warnings
}

fn redacted(mut config: SaiaConfig) -> SaiaConfig {
    if config.api_key.is_some() {
        config.api_key = Some("***".into());
    }
    config
}
