//! Placeholder substitution.
//!
//! Runs over an already expanded document in one of two modes:
//!
//! - [`Mode::Preview`]: placeholders become dataset values, escaped per
//!   modifier; missing entries render as `[name]`.
//! - [`Mode::Carrier`]: placeholders are normalized to `${name}` and the
//!   dataset is never consulted for output.
//!
//! Both modes register every occurrence in a fresh [`Registry`] which is
//! returned with the text.

use super::diagnostic::{Diagnostic, Diagnostics};
use super::escape::escape_attr;
use super::syntax::{self, Placeholder, Segment};
use super::vars::{Modifier, Registry};
use crate::data::Dataset;

/// Output flavour of a substitution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Carrier,
}

/// Result of one substitution pass.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub text: String,
    pub registry: Registry,
    pub diagnostics: Diagnostics,
}

/// Replace all placeholders in `text`.
pub fn substitute(text: &str, dataset: &Dataset, mode: Mode) -> Substitution {
    let mut out = String::with_capacity(text.len());
    let mut registry = Registry::new();
    let mut diagnostics = Diagnostics::new();

    for segment in syntax::scan(text) {
        match segment {
            Segment::Text(s) => out.push_str(s),
            Segment::Var(placeholder) => {
                let modifier = resolve_modifier(placeholder, &mut diagnostics);
                if let Some(conflict) = registry.register(
                    placeholder.name,
                    modifier.var_type(),
                    modifier.allows_html(),
                ) {
                    diagnostics.push(Diagnostic::TypeConflict {
                        name: placeholder.name.to_owned(),
                        kept: conflict.kept,
                        rejected: conflict.rejected,
                    });
                }

                match mode {
                    Mode::Preview => out.push_str(&preview_value(placeholder.name, modifier, dataset)),
                    Mode::Carrier => {
                        out.push_str("${");
                        out.push_str(placeholder.name);
                        out.push('}');
                    }
                }
            }
        }
    }

    Substitution {
        text: out,
        registry,
        diagnostics,
    }
}

fn resolve_modifier(placeholder: Placeholder<'_>, diagnostics: &mut Diagnostics) -> Modifier {
    Modifier::parse(placeholder.modifier).unwrap_or_else(|unknown| {
        diagnostics.push(Diagnostic::UnknownModifier {
            name: placeholder.name.to_owned(),
            modifier: unknown.to_owned(),
        });
        Modifier::Plain
    })
}

/// Preview text for one placeholder.
fn preview_value(name: &str, modifier: Modifier, dataset: &Dataset) -> String {
    let Some(value) = dataset.get(name) else {
        return format!("[{name}]");
    };
    match modifier {
        Modifier::Boolean => value.boolean_text(),
        Modifier::Attr => escape_attr(&value.text()).into_owned(),
        Modifier::Plain | Modifier::Html | Modifier::Number | Modifier::Color | Modifier::Image => {
            value.text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ContentValue;
    use crate::data::types::ValueConfig;
    use crate::template::vars::VarType;

    fn preview(text: &str, dataset: &Dataset) -> String {
        substitute(text, dataset, Mode::Preview).text
    }

    #[test]
    fn test_preview_hero_heading() {
        let data: Dataset = [("heroHeading", "Try Falcon Free")].into_iter().collect();
        assert_eq!(preview("<h1>${heroHeading}</h1>", &data), "<h1>Try Falcon Free</h1>");
    }

    #[test]
    fn test_carrier_hero_heading() {
        let data: Dataset = [("heroHeading", "Try Falcon Free")].into_iter().collect();
        let result = substitute("<h1>${heroHeading}</h1>", &data, Mode::Carrier);
        assert_eq!(result.text, "<h1>${heroHeading}</h1>");
        assert_eq!(result.registry.len(), 1);
    }

    #[test]
    fn test_carrier_normalizes_every_modifier() {
        let data: Dataset = [("a", "<b>"), ("b", "1")].into_iter().collect();
        let result = substitute(
            "${a|html} ${a|attr} ${b|number} ${c|boolean} ${d|COLOR} ${e|image} ${f|bogus} ${g}",
            &data,
            Mode::Carrier,
        );
        assert_eq!(result.text, "${a} ${a} ${b} ${c} ${d} ${e} ${f} ${g}");
    }

    #[test]
    fn test_preview_modifiers() {
        let data: Dataset = [
            ("body", "<em>hi</em> & \"bye\""),
            ("count", "3"),
            ("tint", "#ff0000"),
            ("logo", "/img/logo.png"),
        ]
        .into_iter()
        .collect();

        assert_eq!(preview("${body}", &data), "<em>hi</em> & \"bye\"");
        assert_eq!(preview("${body|html}", &data), "<em>hi</em> & \"bye\"");
        assert_eq!(
            preview("${body|attr}", &data),
            "&lt;em&gt;hi&lt;/em&gt; &amp; &quot;bye&quot;"
        );
        assert_eq!(preview("${count|number}", &data), "3");
        assert_eq!(preview("${tint|color}", &data), "#ff0000");
        assert_eq!(preview("${logo|image}", &data), "/img/logo.png");
    }

    #[test]
    fn test_attr_never_leaks_markup() {
        let nasty = r#""><script>alert('x')</script>&amp;"#;
        let data: Dataset = [("v", nasty)].into_iter().collect();
        let out = preview(r#"<a title="${v|attr}">"#, &data);
        let inner = out
            .strip_prefix(r#"<a title=""#)
            .and_then(|s| s.strip_suffix(r#"">"#))
            .unwrap();
        assert!(!inner.contains(['<', '>', '"']));
        assert!(inner.split('&').skip(1).all(|rest| {
            ["amp;", "lt;", "gt;", "quot;"].iter().any(|e| rest.starts_with(e))
        }));
    }

    #[test]
    fn test_preview_boolean_config() {
        let config = ValueConfig {
            default: Some(true.into()),
            true_value: Some("on".into()),
            false_value: Some("off".into()),
            ..Default::default()
        };
        let data: Dataset = [("flag", ContentValue::from(config))].into_iter().collect();
        assert_eq!(preview("${flag|boolean}", &data), "on");
    }

    #[test]
    fn test_preview_boolean_scalar_is_raw() {
        let data: Dataset = [("flag", false)].into_iter().collect();
        assert_eq!(preview("${flag|boolean}", &data), "false");
    }

    #[test]
    fn test_missing_entry_is_bracketed() {
        let data = Dataset::default();
        let result = substitute("<p>${subtitle|attr}</p>", &data, Mode::Preview);
        assert_eq!(result.text, "<p>[subtitle]</p>");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_modifier_warns_and_is_string() {
        let data: Dataset = [("x", "<b>")].into_iter().collect();
        let result = substitute("${x|Shout}", &data, Mode::Preview);
        assert_eq!(result.text, "<b>");
        assert_eq!(result.registry.get("x").unwrap().var_type, VarType::String);
        assert_eq!(
            result.diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::UnknownModifier {
                name: "x".into(),
                modifier: "Shout".into()
            }]
        );
    }

    #[test]
    fn test_number_then_boolean_conflict() {
        let result = substitute(
            "${price|number} ${price|boolean}",
            &Dataset::default(),
            Mode::Carrier,
        );
        assert_eq!(result.registry.get("price").unwrap().var_type, VarType::Number);
        assert_eq!(
            result
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::TypeConflict { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_registry_reflects_all_names_in_both_modes() {
        let text = "${b} ${a|html} ${c|image} ${a}";
        for mode in [Mode::Preview, Mode::Carrier] {
            let result = substitute(text, &Dataset::default(), mode);
            let names: Vec<_> = result.registry.iter().map(|d| d.name.as_str()).collect();
            assert_eq!(names, vec!["b", "a", "c"]);
            assert!(result.registry.get("a").unwrap().allow_html);
        }
    }

    #[test]
    fn test_text_without_placeholders_is_identity() {
        let text = "<p>Price: $10 {not a var}</p>";
        assert_eq!(preview(text, &Dataset::default()), text);
    }
}
