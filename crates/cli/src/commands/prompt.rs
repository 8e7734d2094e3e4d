//! `saiachain prompt`: Print the conversation prompt the chain would use.

use saiachain_chain::{MessageSlot, PromptTemplate};
use saiachain_config::SaiaConfig;
use saiachain_core::memory::DEFAULT_MEMORY_KEY;

pub async fn run(system: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = SaiaConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let prompt = build(&config, system.as_deref());

    for slot in prompt.slots() {
        match slot {
            MessageSlot::System { template } => {
                println!("[system]");
                println!("{template}");
            }
            MessageSlot::History { variable_name } => println!("[history: {variable_name}]"),
            MessageSlot::Human { template } => println!("[human]\n{template}"),
        }
        println!();
    }

    println!("{}", prompt.to_json()?);
    Ok(())
}

fn build(config: &SaiaConfig, system: Option<&str>) -> PromptTemplate {
    let system = system.or(config.chain.system_message.as_deref());
    let memory_key = config
        .chain
        .memory_key
        .as_deref()
        .unwrap_or(DEFAULT_MEMORY_KEY);
    PromptTemplate::conversation(system, memory_key)
}
