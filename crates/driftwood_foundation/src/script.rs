//! The seam between the core engine and the external script evaluator.
//!
//! The core never inspects guard or effect expressions; it compiles them
//! through a [`ScriptHost`] at load time (malformed sources abort world
//! construction) and later asks the host to evaluate guards, run effects,
//! and expand description templates. Compiled scripts are referred to by
//! opaque handles so world data stays `Copy`-cheap and host-agnostic.

use std::fmt;

use crate::error::Result;
use crate::symbol::Label;

/// Opaque handle to a compiled guard or effect script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRef(pub u32);

/// Opaque handle to a compiled text template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateRef(pub u32);

/// Identifies the acting entity for an evaluation, so the evaluator can
/// resolve self-references in expressions.
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    /// Label of the entity the evaluation is performed on behalf of, if
    /// any (the asking player, a moving NPC, the used item).
    pub actor: Option<Label>,
}

impl ScriptContext {
    /// Context with no acting entity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context acting as the given entity.
    #[must_use]
    pub fn acting_as(actor: Label) -> Self {
        Self {
            actor: Some(actor),
        }
    }
}

/// External condition/effect evaluator and template expander.
///
/// Effects may emit player-visible text; the core supplies the sink and
/// decides whether it reaches the player or a buffer.
pub trait ScriptHost {
    /// Compiles a boolean guard expression. Mutating operations should be
    /// rejected here so guards stay side-effect free.
    fn compile_guard(&mut self, source: &str) -> Result<ScriptRef>;

    /// Compiles one effect statement.
    fn compile_effect(&mut self, source: &str) -> Result<ScriptRef>;

    /// Compiles a description/message template.
    fn compile_template(&mut self, source: &str) -> Result<TemplateRef>;

    /// Evaluates a compiled guard to a boolean.
    fn eval_guard(&mut self, guard: ScriptRef, ctx: &ScriptContext) -> bool;

    /// Runs a compiled effect, sending any emitted text to `emit`.
    fn run_effect(&mut self, effect: ScriptRef, ctx: &ScriptContext, emit: &mut dyn FnMut(&str));

    /// Expands a compiled template to its display string.
    fn expand(&mut self, template: TemplateRef, ctx: &ScriptContext) -> String;
}

/// A piece of display text with its precompiled template.
#[derive(Debug, Clone)]
pub struct Text {
    /// The source text as written in the world file.
    pub source: String,
    /// Handle to the compiled template.
    pub template: TemplateRef,
}

impl Text {
    /// Compiles `source` through the host.
    pub fn compile(source: impl Into<String>, host: &mut dyn ScriptHost) -> Result<Self> {
        let source = source.into();
        let template = host.compile_template(&source)?;
        Ok(Self {
            source,
            template,
        })
    }

    /// Expands this text for display.
    pub fn expand(&self, host: &mut dyn ScriptHost, ctx: &ScriptContext) -> String {
        host.expand(self.template, ctx)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One compiled effect statement with its source retained for diagnostics.
#[derive(Debug, Clone)]
pub struct Script {
    /// The statement source as written in the world file.
    pub source: String,
    /// Handle to the compiled statement.
    pub compiled: ScriptRef,
}

impl Script {
    /// Compiles `source` as an effect statement.
    pub fn compile(source: impl Into<String>, host: &mut dyn ScriptHost) -> Result<Self> {
        let source = source.into();
        let compiled = host.compile_effect(&source)?;
        Ok(Self {
            source,
            compiled,
        })
    }
}

/// An activation guard. Blank sources never reach the host and are always
/// active, matching the "empty guard means true" file-format convention.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    script: Option<Script>,
}

impl Guard {
    /// The guard that is always active.
    #[must_use]
    pub fn always() -> Self {
        Self::default()
    }

    /// Compiles a guard source; whitespace-only sources become
    /// [`Guard::always`].
    pub fn compile(source: &str, host: &mut dyn ScriptHost) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::always());
        }
        let compiled = host.compile_guard(source)?;
        Ok(Self {
            script: Some(Script {
                source: source.to_string(),
                compiled,
            }),
        })
    }

    /// Returns the guard source, if one was written.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.script.as_ref().map(|s| s.source.as_str())
    }

    /// Evaluates the guard for the given context.
    pub fn is_active(&self, host: &mut dyn ScriptHost, ctx: &ScriptContext) -> bool {
        match &self.script {
            Some(script) => host.eval_guard(script.compiled, ctx),
            None => true,
        }
    }
}

/// Script host for worlds that use no scripting: every source compiles,
/// all guards hold, effects emit nothing, and templates expand verbatim.
#[derive(Debug, Clone, Default)]
pub struct NoScript {
    templates: Vec<String>,
    compiled: u32,
}

impl NoScript {
    /// Creates a fresh no-op host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptHost for NoScript {
    fn compile_guard(&mut self, _source: &str) -> Result<ScriptRef> {
        self.compiled += 1;
        Ok(ScriptRef(self.compiled - 1))
    }

    fn compile_effect(&mut self, _source: &str) -> Result<ScriptRef> {
        self.compiled += 1;
        Ok(ScriptRef(self.compiled - 1))
    }

    fn compile_template(&mut self, source: &str) -> Result<TemplateRef> {
        self.templates.push(source.to_string());
        Ok(TemplateRef(u32::try_from(self.templates.len() - 1).unwrap_or(u32::MAX)))
    }

    fn eval_guard(&mut self, _guard: ScriptRef, _ctx: &ScriptContext) -> bool {
        true
    }

    fn run_effect(&mut self, _effect: ScriptRef, _ctx: &ScriptContext, _emit: &mut dyn FnMut(&str)) {}

    fn expand(&mut self, template: TemplateRef, _ctx: &ScriptContext) -> String {
        self.templates
            .get(template.0 as usize)
            .cloned()
            .unwrap_or_default()
    }
}
