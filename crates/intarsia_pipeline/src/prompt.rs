//! Prompt rendering from entity data.

use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, Mode};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{FieldRule, TokenMap, TokenResolver};
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid placeholder pattern"))
}

/// Produces the prompts for one (entity, field, config) job.
///
/// Base mode renders one prompt per delta of the source field, substituting
/// the rule's token map into the configured template. Token mode renders
/// the token template once against the whole entity and is only reachable
/// when the host's token subsystem is present. Rules that need no prompt
/// supply their own from non-text sources.
pub struct PromptRenderer {
    tokens: Option<Arc<dyn TokenResolver>>,
}

impl PromptRenderer {
    /// Create a renderer, with the host token subsystem when available.
    pub fn new(tokens: Option<Arc<dyn TokenResolver>>) -> Self {
        Self { tokens }
    }

    /// Render the prompt set for a job. Empty prompts are dropped.
    pub async fn render(
        &self,
        rule: &dyn FieldRule,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> IntarsiaResult<Vec<String>> {
        if !rule.needs_prompt() {
            return rule.extra_prompts(entity, field, config).await;
        }
        match config.mode() {
            Mode::Token => Ok(self.render_token_mode(entity, config)),
            Mode::Base => self.render_base_mode(rule, entity, field, config),
        }
    }

    fn render_token_mode(&self, entity: &Entity, config: &InterpolationConfig) -> Vec<String> {
        let Some(resolver) = &self.tokens else {
            return Vec::new();
        };
        let Some(template) = config.token_template() else {
            return Vec::new();
        };
        resolver
            .replace(template, entity)
            .filter(|prompt| !prompt.trim().is_empty())
            .map(|prompt| vec![prompt])
            .unwrap_or_default()
    }

    fn render_base_mode(
        &self,
        rule: &dyn FieldRule,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> IntarsiaResult<Vec<String>> {
        let Some(template) = config.prompt() else {
            return Ok(Vec::new());
        };
        let base_field = config.base_field()?;
        let mut prompts = Vec::new();
        for delta in 0..entity.field(base_field).len() {
            let tokens = rule.generate_tokens(entity, field, config, delta)?;
            let rendered = Self::substitute(template, &tokens);
            if !rendered.trim().is_empty() {
                prompts.push(rendered);
            }
        }
        Ok(prompts)
    }

    /// Replace `{{ name }}` placeholders; unknown names render empty.
    fn substitute(template: &str, tokens: &TokenMap) -> String {
        placeholder()
            .replace_all(template, |caps: &Captures| {
                tokens.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}
