//! Dayflow - LLM-assisted daily schedule generation
//!
//! Dayflow turns a user's loose task list into an ordered daily plan by
//! driving an LLM completion service with retrieval-augmented prompts:
//! example schedule templates matching the requested layout and ordering
//! pattern are retrieved from a cached local catalog and folded into the
//! prompt before the ordering call.
//!
//! # Core Concepts
//!
//! - **Degrade, don't crash**: every failure downstream of registry
//!   construction yields a well-formed, renderable schedule - defaulted
//!   categories, round-robin placement, or the caller's original task list
//!   with an error notice. No error crosses the public boundary.
//! - **One closed task type**: loosely-typed caller records are normalized
//!   at the registry boundary and never leak further in.
//! - **Exact retrieval**: template matching is byte-for-byte on
//!   subcategory and pattern (including compound pattern order), never
//!   fuzzy.
//!
//! # Modules
//!
//! - [`domain`] - task, layout, registry and result types
//! - [`llm`] - completion service client trait and Anthropic implementation
//! - [`templates`] - template store and static pattern catalog
//! - [`prompts`] - Handlebars prompt templates and loader
//! - [`engine`] - the pipeline stages and [`engine::ScheduleEngine`]
//! - [`config`] - configuration types and loading

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod llm;
pub mod prompts;
pub mod templates;

// Re-export commonly used types
pub use config::{Config, EngineConfig, LlmConfig, TemplateConfig};
pub use domain::{
    CATEGORY_NAMES, Category, LayoutPreference, LayoutType, PatternKey, Placement, ScheduleResult,
    Task, TaskKind, TaskRegistry,
};
pub use engine::{MAX_PROMPT_CHARS, PromptError, ScheduleEngine, ScheduleRequest};
pub use llm::{AnthropicClient, CompletionClient, CompletionRequest, LlmError};
pub use prompts::PromptLoader;
pub use templates::{Template, TemplateCatalog, TemplateStore};
