//! In-memory provider with canned answers and delays

use super::{ProviderError, ProviderResponse, SearchProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Answer {
    Ok(ProviderResponse),
    Timeout,
}

/// Provider whose replies are scripted per term
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    answers: Arc<Mutex<HashMap<String, (Duration, Answer)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `term` with the given columns after `delay`
    pub(crate) fn reply(
        &self,
        term: &str,
        delay: Duration,
        titles: &[&str],
        descriptions: &[&str],
        urls: &[&str],
    ) {
        let response = ProviderResponse {
            titles: titles.iter().map(|s| s.to_string()).collect(),
            descriptions: descriptions.iter().map(|s| s.to_string()).collect(),
            urls: urls.iter().map(|s| s.to_string()).collect(),
        };
        self.answers
            .lock()
            .unwrap()
            .insert(term.to_string(), (delay, Answer::Ok(response)));
    }

    /// Fail `term` with a timeout after `delay`
    pub(crate) fn time_out(&self, term: &str, delay: Duration) {
        self.answers
            .lock()
            .unwrap()
            .insert(term.to_string(), (delay, Answer::Timeout));
    }

    /// Terms searched so far, in call order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, term: &str, _limit: u32) -> Result<ProviderResponse, ProviderError> {
        self.calls.lock().unwrap().push(term.to_string());

        let scripted = self.answers.lock().unwrap().get(term).cloned();
        let (delay, answer) =
            scripted.unwrap_or((Duration::ZERO, Answer::Ok(ProviderResponse::default())));

        tokio::time::sleep(delay).await;

        match answer {
            Answer::Ok(response) => Ok(response),
            Answer::Timeout => Err(ProviderError::Timeout(delay)),
        }
    }
}
