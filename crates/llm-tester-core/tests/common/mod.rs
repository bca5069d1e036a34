//! Scripted model service shared by the core tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use llm_tester_client::{ClientError, GenerationParams, GenerationResult, ModelService};
use parking_lot::Mutex;

pub fn generation(model: &str, response: &str, eval_count: u64) -> GenerationResult {
    GenerationResult {
        model: model.to_string(),
        created_at: Utc::now(),
        response: response.to_string(),
        done: true,
        context: None,
        total_duration: 1500,
        load_duration: 10,
        prompt_eval_count: 2,
        prompt_eval_duration: 20,
        eval_count,
        eval_duration: 1200,
    }
}

/// Fake service that answers from a prompt table, tracks how many calls are
/// in flight and can be told to fail for selected models or prompts
#[derive(Default)]
pub struct ScriptedService {
    responses: HashMap<String, String>,
    delays: HashMap<String, u64>,
    prompt_delays: HashMap<String, u64>,
    failing_models: Vec<String>,
    failing_prompts: Vec<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<(String, String)>>,
    params_seen: Mutex<Vec<Option<GenerationParams>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prompt: &str, response: &str) -> Self {
        self.responses.insert(prompt.to_string(), response.to_string());
        self
    }

    /// Delay every call for `model` by `millis`
    pub fn delay(mut self, model: &str, millis: u64) -> Self {
        self.delays.insert(model.to_string(), millis);
        self
    }

    /// Delay every call with `prompt` by `millis`; wins over a model delay
    pub fn delay_prompt(mut self, prompt: &str, millis: u64) -> Self {
        self.prompt_delays.insert(prompt.to_string(), millis);
        self
    }

    pub fn fail_model(mut self, model: &str) -> Self {
        self.failing_models.push(model.to_string());
        self
    }

    pub fn fail_prompt(mut self, prompt: &str) -> Self {
        self.failing_prompts.push(prompt.to_string());
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// (model, prompt) in admission order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn params_seen(&self) -> Vec<Option<GenerationParams>> {
        self.params_seen.lock().clone()
    }
}

#[async_trait]
impl ModelService for ScriptedService {
    async fn generate_response(
        &self,
        model: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> Result<GenerationResult, ClientError> {
        self.calls
            .lock()
            .push((model.to_string(), prompt.to_string()));
        self.params_seen.lock().push(params.cloned());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .prompt_delays
            .get(prompt)
            .or_else(|| self.delays.get(model))
            .copied()
            .unwrap_or(5);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_models.iter().any(|m| m == model)
            || self.failing_prompts.iter().any(|p| p == prompt)
        {
            return Err(ClientError::Transport {
                operation: "generate response",
                reason: "connection reset".to_string(),
            });
        }

        let response = self
            .responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| "ok".to_string());
        Ok(generation(model, &response, 4))
    }
}
