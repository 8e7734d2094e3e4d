//! `saiachain chat`: Single-message or interactive chat with an assistant.

use saiachain_chain::{NodeInputs, SaiaChainNode};
use saiachain_config::{ChainMode, SaiaConfig};
use saiachain_core::document::{DocumentInput, SupportingDocument};
use saiachain_memory::BufferMemory;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct ChatArgs {
    pub message: Option<String>,
    pub assistant: Option<String>,
    pub system: Option<String>,
    pub documents: Vec<PathBuf>,
    pub local: bool,
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SaiaConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if args.local {
        config.chain.mode = ChainMode::Local;
    }

    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export {}=...", saiachain_config::ENV_API_KEY);
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", SaiaConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let mut documents = Vec::new();
    for path in &args.documents {
        documents.extend(load_document(path)?);
    }
    tracing::debug!(count = documents.len(), "Supporting documents loaded");

    let memory = match &config.chain.memory_key {
        Some(key) => BufferMemory::new().with_memory_key(key.as_str()),
        None => BufferMemory::new(),
    };

    let mut inputs = NodeInputs::new(Arc::new(memory)).with_documents(documents);
    if let Some(assistant) = args.assistant {
        inputs = inputs.with_assistant(assistant.as_str());
    }
    if let Some(system) = args.system {
        inputs = inputs.with_system_message(system);
    }

    let node = SaiaChainNode::init(&config, inputs)?;

    if let Some(msg) = args.message {
        eprint!("  Thinking...");
        let reply = node.run(&msg).await;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    println!();
    println!("  SaiaChain: Interactive Mode");
    println!();
    println!("  Assistant: {}", node.assistant());
    println!("  Mode:      {:?}", node.mode());
    println!("  Documents: {}", args.documents.len());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            break;
        }
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        eprint!("  ...");
        let reply = node.run(line).await;
        eprint!("\r     \r");

        println!();
        if reply.is_empty() {
            eprintln!("  [No reply, see log]");
        }
        for text in reply.lines() {
            println!("  Assistant > {text}");
        }
        println!();

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// Read one `--document` argument into host document entries.
///
/// A `.json` file holding an array contributes each element as its own
/// entry, so nested lists inside it are still flattened by the normalizer.
/// Any other `.json` value is one entry. Other files become one document
/// holding the file's text.
fn load_document(path: &Path) -> Result<Vec<DocumentInput>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        let input: DocumentInput = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid document JSON in {}: {e}", path.display()))?;
        return Ok(match input {
            DocumentInput::List(entries) => entries,
            other => vec![other],
        });
    }

    Ok(vec![
        SupportingDocument::new(content)
            .with_metadata("source", serde_json::Value::String(path.display().to_string()))
            .into(),
    ])
}
