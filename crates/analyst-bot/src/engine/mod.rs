//! Analysis engine
//!
//! [`AnalysisPipeline`] runs the stages for one request in order (quote, chart,
//! prompt, narrative) and then delivers, or unwinds onto the placeholder.

pub mod context;
pub mod narrative;
pub mod pipeline;
pub mod result;

pub use context::RequestContext;
pub use narrative::NarrativeClient;
pub use pipeline::AnalysisPipeline;
pub use result::{AnalysisReport, DeliveryState};

#[cfg(test)]
pub(crate) mod test_support {
    use analyst_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Language model that replays canned replies and records what it was asked
    #[derive(Default)]
    pub struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<CompletionResponse>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.respond(CompletionResponse::single(text))
        }

        pub fn respond(self, response: CompletionResponse) -> Self {
            self.replies.lock().unwrap().push_back(Ok(response));
            self
        }

        pub fn fail(self, err: LLMError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Text of every message sent, flattened across calls
        pub fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .flat_map(|r| r.messages.iter().filter_map(|m| m.text().map(str::to_owned)))
                .collect()
        }

        pub fn models(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.model.clone())
                .collect()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("no scripted reply".into())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
