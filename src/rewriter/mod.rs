//! Bounded rewrite orchestration
//!
//! Architecture: Domain Services - The humanizer drives the detector and the
//! generation port through a fixed two-call protocol
//! - INITIAL rewrite, CHECK, at most one CORRECT pass, then a TERMINAL re-check
//! - The returned issue set is always recomputed against the returned text
//! - Generation failure at any state aborts the whole operation with no partial result

use crate::config::WardenConfig;
use crate::detector::StyleDetector;
use crate::domain::violations::{RewriteOutcome, WardenResult};
use crate::provider::Generator;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// System instructions given verbatim to every generation call.
pub const STYLE_GUIDE: &str = r#"You rewrite text to sound like a concise human.
Hard DO NOTs:
- No rhetorical questions. Never end with a question unless the original explicitly asks one you must keep.
- No em-dashes. Use commas or periods instead.
- Avoid templates: "It's not just __, it's __" and "Not only __, but also __".
- No "Honestly" or "but honestly".
- No dramatic "— because" constructions.
- Avoid buzzwords (corporate-speak). Prefer plain words.
- Prefer 1 clear paragraph. Split only if meaning suffers.
- Prefer 1 precise adjective instead of strings of 3.
Preserve meaning; don't add claims. Keep tone natural and direct.
Output ONLY the rewritten text.
"#;

/// Temperature for the initial rewrite: low but nonzero, fidelity over creativity
pub const INITIAL_TEMPERATURE: f32 = 0.3;
/// Temperature for the corrective pass
pub const CORRECTION_TEMPERATURE: f32 = 0.2;

/// Orchestrates detection and generation into one bounded rewrite chain
pub struct Humanizer {
    detector: StyleDetector,
    generator: Arc<dyn Generator>,
}

impl Humanizer {
    /// Create a humanizer from configuration and an injected generator
    pub fn new(config: &WardenConfig, generator: Arc<dyn Generator>) -> WardenResult<Self> {
        let detector = StyleDetector::from_config(config)?;
        Ok(Self { detector, generator })
    }

    /// The compiled detector, for detect-only callers
    pub fn detector(&self) -> &StyleDetector {
        &self.detector
    }

    /// Rewrite `text` to pass the style check, with at most one corrective pass.
    ///
    /// Makes exactly one or two generation calls, never more: an initial
    /// rewrite, then a single correction when violations remain and
    /// `max_fixes > 0`. Values of `max_fixes` beyond 1 are accepted but still
    /// perform one corrective pass; the protocol never loops to convergence.
    pub async fn humanize(
        &self,
        text: &str,
        language_hint: &str,
        max_fixes: u32,
    ) -> WardenResult<RewriteOutcome> {
        let start = Instant::now();

        let prompt = rewrite_prompt(text, language_hint);
        let mut out = self
            .generator
            .generate(STYLE_GUIDE, &prompt, INITIAL_TEMPERATURE)
            .await?
            .trim()
            .to_string();
        let mut generation_calls = 1u32;

        let mut issues = self.detector.detect(&out);
        tracing::debug!("Initial rewrite produced {} issue(s)", issues.len());

        if !issues.is_empty() && max_fixes > 0 {
            let fix_prompt = correction_prompt(&issues, &out);
            out = self
                .generator
                .generate(STYLE_GUIDE, &fix_prompt, CORRECTION_TEMPERATURE)
                .await?
                .trim()
                .to_string();
            generation_calls += 1;

            // Recompute against the corrected text; whatever remains is returned as-is
            issues = self.detector.detect(&out);
            tracing::debug!("Corrective rewrite left {} issue(s)", issues.len());
        }

        Ok(RewriteOutcome::new(out, issues)
            .with_generation_calls(generation_calls)
            .with_execution_time(start.elapsed().as_millis() as u64))
    }
}

/// User prompt for the initial rewrite. The sentinel markers keep the
/// text-to-rewrite unambiguous even when it contains the guide's vocabulary.
fn rewrite_prompt(text: &str, language_hint: &str) -> String {
    format!(
        "Language: {language_hint}.\nRewrite the text under <<< >>> to follow the guide.\n<<<\n{text}\n>>>"
    )
}

/// User prompt for the corrective pass, citing the exact violated labels
fn correction_prompt(issues: &BTreeSet<String>, text: &str) -> String {
    let cited = issues.iter().cloned().collect::<Vec<_>>().join("; ");
    format!("You violated these rules: {cited}.\nFix the text. Return only the corrected text.\nTEXT:\n{text}")
}
