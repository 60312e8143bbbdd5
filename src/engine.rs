//! The expression bridge: parse once, evaluate with fallback
//!
//! [`ExpressionBridge`] is the host-facing entry point. It parses a raw
//! configuration string into a [`DelegatingExpression`], which tries the
//! parameter macro syntax on every evaluation and falls back to the
//! pre-parsed template form when the macro path yields no result.

use crate::context::{self, EvaluationContext};
use crate::error::{ExprError, Result};
use crate::macros;
use crate::model::{FromValue, Value};
use crate::parser::{TemplateExpression, parse_template};

/// Parser facade turning raw configuration strings into expressions
///
/// Stateless and cheap to construct; hosts typically keep one per
/// configuration-processing session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionBridge;

impl ExpressionBridge {
    /// Create a bridge
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw configuration string
    ///
    /// The text is trimmed, then its template form (`#{text}`) is parsed
    /// eagerly so template syntax errors surface here rather than at
    /// evaluation time. The macro form is not parsed until evaluation.
    pub fn parse(&self, text: &str) -> Result<DelegatingExpression> {
        DelegatingExpression::parse(text)
    }

    /// Parse and evaluate in one step
    pub fn evaluate(&self, text: &str, ctx: &EvaluationContext) -> Result<Value> {
        self.parse(text)?.value_in(ctx)
    }
}

/// A parsed configuration expression with macro-first, template-fallback
/// evaluation
///
/// Immutable and freely shareable across threads: every evaluation is a
/// pure function of the raw text, the resolver active on the calling
/// thread, and the call's arguments. Results are never cached because the
/// active resolver may differ between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatingExpression {
    /// Trimmed raw text, re-parsed as a macro expression per evaluation
    raw: String,
    /// The raw text in its `{...}` reported form
    wrapped: String,
    /// Eagerly parsed template form of `#{raw}`
    template: TemplateForm,
}

/// Outcome of the eager template parse
///
/// Macro text may contain braces the template grammar has no reading for
/// (`near-{cache-name}`). Such text still constructs; the parse error is
/// held back and raised only if an evaluation ever needs the fallback.
#[derive(Debug, Clone, PartialEq)]
enum TemplateForm {
    Parsed(TemplateExpression),
    Deferred(ExprError),
}

impl DelegatingExpression {
    /// Parse a raw configuration string into a delegating expression
    pub fn parse(text: &str) -> Result<Self> {
        let raw = text.trim().to_string();
        let template = match parse_template(&format!("#{{{raw}}}")) {
            Ok(template) => TemplateForm::Parsed(template),
            Err(err) if macros::accepts(&raw) => TemplateForm::Deferred(err),
            Err(err) => return Err(err),
        };
        Ok(Self {
            wrapped: format!("{{{raw}}}"),
            raw,
            template,
        })
    }

    /// The expression string as reported to hosts, in `{...}` form
    pub fn expression_string(&self) -> &str {
        &self.wrapped
    }

    /// The trimmed raw text this expression was parsed from
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// Evaluate to an untyped value
    pub fn value(&self) -> Result<Value> {
        self.evaluate_with(None, None)
    }

    /// Evaluate against a root object
    pub fn value_with_root(&self, root: &Value) -> Result<Value> {
        self.evaluate_with(None, Some(root))
    }

    /// Evaluate within an evaluation context
    pub fn value_in(&self, ctx: &EvaluationContext) -> Result<Value> {
        self.evaluate_with(Some(ctx), None)
    }

    /// Evaluate within an evaluation context, against a root object
    pub fn value_in_with_root(&self, ctx: &EvaluationContext, root: &Value) -> Result<Value> {
        self.evaluate_with(Some(ctx), Some(root))
    }

    /// Evaluate to a typed value
    pub fn get_value<T: FromValue>(&self) -> Result<T> {
        self.evaluate_with(None, None)
    }

    /// Evaluate to a typed value against a root object
    pub fn get_value_with_root<T: FromValue>(&self, root: &Value) -> Result<T> {
        self.evaluate_with(None, Some(root))
    }

    /// Evaluate to a typed value within an evaluation context
    pub fn get_value_in<T: FromValue>(&self, ctx: &EvaluationContext) -> Result<T> {
        self.evaluate_with(Some(ctx), None)
    }

    /// Evaluate to a typed value within an evaluation context, against a
    /// root object
    pub fn get_value_in_with_root<T: FromValue>(
        &self,
        ctx: &EvaluationContext,
        root: &Value,
    ) -> Result<T> {
        self.evaluate_with(Some(ctx), Some(root))
    }

    /// The fallback state machine: try primary, fall back to secondary
    ///
    /// The macro path never errors; it either produces a value that
    /// coerces to `T` or the call falls through to the template form. A
    /// macro value that resolves but fails to coerce also falls through,
    /// because the template grammar may give the text a meaning of the
    /// requested type.
    fn evaluate_with<T: FromValue>(
        &self,
        ctx: Option<&EvaluationContext>,
        root: Option<&Value>,
    ) -> Result<T> {
        let resolver = context::current_or(ctx);
        if let Some(value) = macros::evaluate(&self.raw, resolver.as_ref()) {
            match T::from_value(value) {
                Ok(typed) => return Ok(typed),
                Err(_) => log::trace!(
                    "macro value for '{}' did not coerce to {}; falling back to template",
                    self.raw,
                    T::type_name()
                ),
            }
        } else {
            log::trace!(
                "'{}' yielded no macro result; falling back to template",
                self.raw
            );
        }
        match &self.template {
            TemplateForm::Parsed(template) => T::from_value(template.evaluate(ctx, root)?),
            TemplateForm::Deferred(err) => Err(err.clone()),
        }
    }
}
