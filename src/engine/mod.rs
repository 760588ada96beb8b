//! The schedule generation pipeline
//!
//! Stages run as one sequential call chain per invocation:
//! registry build -> categorization -> section planning -> prompt build ->
//! ordering -> assembly. Recoverable stage failures degrade in place
//! (default categories, round-robin assembly); anything else becomes the
//! terminal error response. [`ScheduleEngine::generate`] never returns an
//! error to the caller.

pub mod assembly;
pub mod categorize;
pub mod fallback;
pub mod ordering;
pub mod prompt;
pub mod registry;
pub mod sections;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::{LayoutPreference, LayoutType, PatternKey, ScheduleResult};
use crate::llm::CompletionClient;
use crate::prompts::PromptLoader;
use crate::templates::TemplateStore;

pub use prompt::{MAX_PROMPT_CHARS, PromptError};

/// The caller-supplied scheduling payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRequest {
    /// Loosely-typed task records; normalized by the registry builder
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,

    #[serde(default)]
    pub layout_preference: LayoutPreference,

    #[serde(default)]
    pub work_start_time: Option<String>,

    #[serde(default)]
    pub work_end_time: Option<String>,

    #[serde(default)]
    pub energy_patterns: Vec<String>,

    /// Priority summary, shape left to the caller
    #[serde(default)]
    pub priorities: serde_json::Value,
}

/// The schedule generation engine
///
/// Stateless across invocations except for the injected template store's
/// process-wide cache. Concurrent invocations are independent call chains.
pub struct ScheduleEngine {
    client: Arc<dyn CompletionClient>,
    store: Arc<TemplateStore>,
    loader: PromptLoader,
    tuning: EngineConfig,
}

impl ScheduleEngine {
    /// Create an engine with default tuning
    pub fn new(
        client: Arc<dyn CompletionClient>,
        store: Arc<TemplateStore>,
        loader: PromptLoader,
    ) -> Self {
        Self {
            client,
            store,
            loader,
            tuning: EngineConfig::default(),
        }
    }

    /// Override the engine tuning
    pub fn with_tuning(mut self, tuning: EngineConfig) -> Self {
        self.tuning = tuning;
        self
    }

    /// Generate a schedule for the request.
    ///
    /// Always returns a well-formed result: recoverable failures degrade,
    /// and any other error becomes an error response carrying the caller's
    /// original tasks. No error crosses this boundary.
    pub async fn generate(&self, request: &ScheduleRequest) -> ScheduleResult {
        let layout = LayoutType::from_preference(&request.layout_preference);
        let key = PatternKey::from_preference(&request.layout_preference);
        let subcategory = request.layout_preference.subcategory().to_string();
        let sections = sections::plan_sections(layout, &subcategory);

        info!(
            %layout,
            pattern = %key,
            task_count = request.tasks.len(),
            "generating schedule"
        );

        match self
            .run_pipeline(request, layout, &key, &subcategory, &sections)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "pipeline failed, returning original schedule");
                fallback::error_response(
                    &request.tasks,
                    layout,
                    key,
                    &sections,
                    format!("{:#}", err),
                )
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &ScheduleRequest,
        layout: LayoutType,
        key: &PatternKey,
        subcategory: &str,
        sections: &[String],
    ) -> eyre::Result<ScheduleResult> {
        let (mut task_registry, needs) = registry::build_registry(&request.tasks);
        debug!(
            tasks = task_registry.len(),
            flagged = needs.len(),
            "registry built"
        );

        let categorized = categorize::categorize_tasks(
            self.client.as_ref(),
            &self.loader,
            &mut task_registry,
            &needs,
            &self.tuning,
        )
        .await;
        if !categorized {
            debug!("categorization degraded to defaults");
        }
        categorize::enforce_category_floor(&mut task_registry);

        let prompt = prompt::build_schedule_prompt(
            &self.store,
            &self.loader,
            request,
            &task_registry,
            key,
            subcategory,
            sections,
        )?;

        let placements =
            ordering::request_placements(self.client.as_ref(), &prompt, &self.tuning).await;

        let (tasks, fallback_used) = match placements {
            Some(placements) => (
                assembly::assemble(&placements, &task_registry, sections, layout),
                false,
            ),
            None => {
                info!("ordering unavailable, distributing tasks round-robin");
                (fallback::round_robin(&task_registry, sections), true)
            }
        };

        Ok(ScheduleResult::ok(tasks, layout, key.clone(), fallback_used))
    }
}

/// Locate the outermost JSON object in free-form completion text: the
/// substring from the first `{` to the last `}`.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
