use crate::client::CompletionClient;
use crate::config::Config;
use crate::intent::{ExecutionMode, MultiFileDetector};
use crate::logging::{log_event, LogCategory, LogLevel};
use crate::prompt::build_prompt;
use anyhow::{anyhow, Result};

/// Request-to-command pipeline: classify, build the prompt, ask the
/// generation service, hand back the extracted command string.
///
/// All state is request-scoped; nothing survives a `run` call.
pub struct Pipeline {
    detector: MultiFileDetector,
    client: CompletionClient,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            detector: MultiFileDetector::new(),
            client: CompletionClient::from_config(config),
        }
    }

    #[cfg(test)]
    fn with_client(client: CompletionClient) -> Self {
        Self {
            detector: MultiFileDetector::new(),
            client,
        }
    }

    /// Whether this request will be forced into multi-step mode.
    pub fn is_multi_file_request(&self, request: &str) -> bool {
        self.detector.detect(request)
    }

    /// Run one request through the pipeline.
    ///
    /// Returns the generated command, which may be empty when the service
    /// produced nothing usable; the caller reports "no valid command" for
    /// that case. Blank request text is rejected before classification.
    pub async fn run(&self, request: &str, chosen_mode: ExecutionMode) -> Result<String> {
        let request = request.trim();
        if request.is_empty() {
            return Err(anyhow!("Empty request: nothing to translate"));
        }

        let mode = self.detector.resolve_mode(request, chosen_mode);
        log_event(
            LogLevel::Info,
            LogCategory::Classification,
            &format!("Execution mode resolved: {}", mode_label(&mode)),
        );

        let prompt = build_prompt(request, &mode);
        self.client.request_command(&prompt).await
    }
}

fn mode_label(mode: &ExecutionMode) -> &'static str {
    match mode {
        ExecutionMode::SingleAction => "single-action",
        ExecutionMode::MultiStep => "multi-step",
        ExecutionMode::ExplicitHierarchy(_) => "explicit-hierarchy",
    }
}
