//! Placeholder substitution for popup and label templates.
//!
//! A placeholder is `{name}`, `{a.b}` for a nested value, or a chain of
//! alternatives `{name|other|"fallback"}`; the first alternative with a
//! non-empty value wins. Names are looked up in the feature properties, then
//! in the session context (`locale`, `lang`).

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::{MapSession, feature::Properties};

/// Session values visible to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    pub locale: String,
    pub lang: String,
}

impl TemplateContext {
    /// Context for `locale` ("fr_CA"); `lang` is its language part ("fr").
    pub fn for_locale(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let lang = locale.split(['_', '-']).next().unwrap_or_default().to_string();
        Self { locale, lang }
    }
}

impl MapSession {
    /// Template values derived from this session's locale.
    pub fn template_context(&self) -> TemplateContext {
        TemplateContext::for_locale(self.locale())
    }

    /// Render `text` against `properties` in this session's context.
    pub fn render_template(&self, text: &str, properties: &Properties) -> String {
        render_template(text, properties, &self.template_context())
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        let alt = r#"(?:[\w.:\-]+|"[^"{}|]*"|'[^'{}|]*')"#;
        Regex::new(&format!(r"\{{ *({alt}(?: *\| *{alt})*) *\}}")).unwrap()
    })
}

/// Replace every placeholder in `text`. Unresolved placeholders render as
/// the empty string; braces that do not form a placeholder are left alone.
pub fn render_template(text: &str, properties: &Properties, context: &TemplateContext) -> String {
    placeholder()
        .replace_all(text, |caps: &Captures| {
            caps[1].split('|')
                .map(str::trim)
                .find_map(|alt| resolve(alt, properties, context))
                .unwrap_or_default()
        })
        .into_owned()
}

fn resolve(alt: &str, properties: &Properties, context: &TemplateContext) -> Option<String> {
    if let Some(literal) = quoted(alt) {
        return Some(literal.to_string());
    }
    lookup(alt, properties)
        .filter(|value| !value.is_empty())
        .or_else(|| match alt {
            "locale" => Some(context.locale.clone()),
            "lang" => Some(context.lang.clone()),
            _ => None,
        })
        .filter(|value| !value.is_empty())
}

fn quoted(alt: &str) -> Option<&str> {
    ['"', '\''].iter().find_map(|&q| alt.strip_prefix(q)?.strip_suffix(q))
}

/// Exact key first, then a dotted walk into nested objects.
fn lookup(key: &str, properties: &Properties) -> Option<String> {
    if let Some(value) = properties.get(key) {
        return render_value(value);
    }
    let mut parts = key.split('.');
    let mut value = properties.get(parts.next()?)?;
    for part in parts {
        value = value.get(part)?;
    }
    render_value(value)
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        Properties::from_json_object(value.as_object().unwrap())
    }

    #[test]
    fn properties_and_context() {
        let properties = props(json!({"name": "Chez Rémy", "floor": 2}));
        let context = TemplateContext::for_locale("fr_CA");
        assert_eq!(
            render_template("{name} ({floor}) https://wiki/{lang}/{locale}", &properties, &context),
            "Chez Rémy (2) https://wiki/fr/fr_CA",
        );
    }

    #[test]
    fn alternatives_and_fallback() {
        let properties = props(json!({"name": "", "ref": "A7"}));
        let context = TemplateContext::default();
        assert_eq!(render_template("{name|ref}", &properties, &context), "A7");
        assert_eq!(render_template("{name|missing|\"none\"}", &properties, &context), "none");
        assert_eq!(render_template("{ name | 'x' }", &properties, &context), "x");
    }

    #[test]
    fn dotted_keys_walk_nested_values() {
        let properties = props(json!({"address": {"city": "Lyon", "zip": 69001}}));
        let context = TemplateContext::default();
        assert_eq!(render_template("{address.city} {address.zip}", &properties, &context), "Lyon 69001");
        assert_eq!(render_template("[{address.country}]", &properties, &context), "[]");
    }

    #[test]
    fn sanitized_keys_are_addressable() {
        let mut properties = Properties::new();
        properties.insert("a.b", "ok");
        assert_eq!(render_template("{a_b}", &properties, &TemplateContext::default()), "ok");
    }

    #[test]
    fn empty_property_falls_back_to_context() {
        let properties = props(json!({"locale": "", "lang": null}));
        let context = TemplateContext::for_locale("de");
        assert_eq!(render_template("{locale}/{lang}", &properties, &context), "de/de");
    }

    #[test]
    fn session_locale_reaches_templates() {
        let session = MapSession::new().with_locale("fr");
        let properties = props(json!({"name": "Gare"}));
        assert_eq!(session.template_context().lang, "fr");
        assert_eq!(session.render_template("{name}?locale={locale}", &properties), "Gare?locale=fr");
        assert_eq!(MapSession::new().render_template("?locale={locale}", &properties), "?locale=en");
    }

    #[test]
    fn non_placeholders_are_untouched() {
        let properties = props(json!({"name": "x"}));
        let context = TemplateContext::default();
        assert_eq!(render_template("{\"a\": 1} {} {name}", &properties, &context), "{\"a\": 1} {} x");
    }
}
