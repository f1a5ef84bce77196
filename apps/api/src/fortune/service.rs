//! Fortune request pipeline.
//!
//! Flow: validate → build prompt → generate (timeout, optional retry) → parse.
//!
//! Holds no mutable state. Two identical concurrent requests make two
//! independent provider calls; de-duplication is the caller's cache concern.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::fortune::cache_key::local_today;
use crate::fortune::error::FortuneError;
use crate::fortune::models::{FortuneRequest, FortuneResult};
use crate::fortune::parser::parse_fortune;
use crate::fortune::prompts::build_prompt;
use crate::llm_client::{LlmError, TextGenerator};

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry on provider failures. `max_retries = 0` disables retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fail_fast()
    }
}

impl RetryPolicy {
    pub fn fail_fast() -> Self {
        Self {
            max_retries: 0,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    pub fn bounded(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Exponential backoff: base, 2×base, 4×base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay * (1u32 << exp)
    }
}

/// Orchestrates one fortune per call. Cheap to clone; shares only the generator.
#[derive(Clone)]
pub struct FortuneService {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl FortuneService {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            generator,
            timeout,
            retry,
        }
    }

    pub fn from_config(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        Self::new(
            generator,
            config.request_timeout(),
            RetryPolicy::bounded(config.max_retries),
        )
    }

    /// Runs the pipeline against the server's current local day.
    pub async fn request_fortune(
        &self,
        request: &FortuneRequest,
    ) -> Result<FortuneResult, FortuneError> {
        self.request_fortune_on(request, local_today()).await
    }

    /// Runs the pipeline with an explicit `today`.
    pub async fn request_fortune_on(
        &self,
        request: &FortuneRequest,
        today: NaiveDate,
    ) -> Result<FortuneResult, FortuneError> {
        let request_id = Uuid::new_v4();

        let validated = request.validate(today).map_err(|e| {
            info!(%request_id, "Rejected fortune request: {e}");
            e
        })?;
        debug!(
            %request_id,
            mode = %validated.mode,
            blood_type = %validated.blood_type,
            "Fortune request validated"
        );

        let prompt = build_prompt(&validated);
        debug!(%request_id, prompt_chars = prompt.chars().count(), "Prompt built");

        let raw = self.generate_with_retry(request_id, &prompt).await?;
        debug!(%request_id, response_chars = raw.chars().count(), "Provider text received");

        match parse_fortune(&raw) {
            Ok(result) => {
                info!(%request_id, rating = result.rating, mode = %validated.mode, "Fortune generated");
                Ok(result)
            }
            Err(e) => {
                warn!(%request_id, kind = e.kind(), raw = %raw, "Unusable provider response: {e}");
                Err(e)
            }
        }
    }

    async fn generate_with_retry(
        &self,
        request_id: Uuid,
        prompt: &str,
    ) -> Result<String, FortuneError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    %request_id,
                    "Provider attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    error!(%request_id, attempt = attempt + 1, "Provider call failed: {e}");
                    let err = FortuneError::Provider(e);
                    if !err.is_retryable() || attempt >= self.retry.max_retries {
                        return Err(err);
                    }
                }
            }
            attempt += 1;
        }
    }

    /// One provider call bounded by the configured timeout. A timed-out call is
    /// dropped, which cancels the in-flight request.
    async fn generate_once(&self, prompt: &str) -> Result<String, LlmError> {
        match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(LlmError::EmptyContent),
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }
}
