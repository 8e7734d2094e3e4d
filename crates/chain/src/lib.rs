//! # SaiaChain Chain
//!
//! Setup-time assembly and per-turn execution of the SAIA conversational
//! chain.
//!
//! ## Turn flow
//!
//! ```text
//! host input ──▶ normalize documents ──▶ OutboundRequest ──▶ assistant/chat
//!                                                               │
//!        reply string ◀── TurnOutcome ◀── AssistantResponse ◀───┘
//! ```
//!
//! `ChainMode::Local` swaps the remote call for the assembled
//! `ConversationChain` (system + history + input through the chat model).

pub mod assembler;
pub mod chain;
pub mod documents;
pub mod executor;
pub mod node;
pub mod prompt;

pub use assembler::ChainAssembler;
pub use chain::ConversationChain;
pub use documents::normalize_documents;
pub use executor::{TurnExecutor, TurnOutcome, TurnState};
pub use node::{NodeInputs, SaiaChainNode};
pub use prompt::{DEFAULT_SYSTEM_MESSAGE, MessageSlot, PromptTemplate};
