//! `saiachain assistants`: List the assistants offered to a host.

use saiachain_chain::SaiaChainNode;
use saiachain_config::SaiaConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SaiaConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let catalog = saiachain_providers::assistant_catalog(&config);
    let options = SaiaChainNode::load_assistants(&catalog).await;

    if options.is_empty() {
        println!("  No assistants available.");
        return Ok(());
    }

    let width = options.iter().map(|o| o.name.len()).max().unwrap_or(0);

    println!();
    println!("  Available assistants:");
    println!();
    for option in &options {
        println!("    {:<width$}  {}", option.name, option.description);
    }
    println!();

    Ok(())
}
