//! View rendering seam
//!
//! Handlers render named views through [`ViewRenderer`]. The router does not
//! ship a template engine; [`PlaceholderViews`] only substitutes `{{name}}`
//! markers in in-memory templates, HTML-escaping the values.

use crate::error::ViewError;
use std::collections::HashMap;

/// Variables passed to a view
pub type ViewVars = HashMap<String, String>;

/// Produces a response body from a view name and its variables
pub trait ViewRenderer: Send + Sync {
    fn render(&self, name: &str, vars: &ViewVars) -> Result<String, ViewError>;
}

/// In-memory views with `{{name}}` placeholders
#[derive(Debug, Clone, Default)]
pub struct PlaceholderViews {
    views: HashMap<String, String>,
}

impl PlaceholderViews {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_view(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.views.insert(name.into(), template.into());
        self
    }
}

impl ViewRenderer for PlaceholderViews {
    fn render(&self, name: &str, vars: &ViewVars) -> Result<String, ViewError> {
        let template = self
            .views
            .get(name)
            .ok_or_else(|| ViewError::NotFound(name.to_string()))?;

        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| ViewError::Unterminated(name.to_string()))?;
            let key = after[..end].trim();
            let value = vars.get(key).ok_or_else(|| ViewError::MissingVariable {
                view: name.to_string(),
                variable: key.to_string(),
            })?;
            out.push_str(&html_escape(value));
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> ViewVars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let views = PlaceholderViews::new().with_view("about", "<h1>{{ title }}</h1><p>{{body}}</p>");
        let out = views
            .render("about", &vars(&[("title", "About"), ("body", "About page")]))
            .unwrap();
        assert_eq!(out, "<h1>About</h1><p>About page</p>");
    }

    #[test]
    fn test_render_escapes_values() {
        let views = PlaceholderViews::new().with_view("index", "<p>{{msg}}</p>");
        let out = views
            .render("index", &vars(&[("msg", "<script>\"x\" & 'y'</script>")]))
            .unwrap();
        assert_eq!(
            out,
            "<p>&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_render_without_placeholders() {
        let views = PlaceholderViews::new().with_view("plain", "static text");
        assert_eq!(views.render("plain", &ViewVars::new()).unwrap(), "static text");
    }

    #[test]
    fn test_render_errors() {
        let views = PlaceholderViews::new()
            .with_view("index", "{{title}}")
            .with_view("broken", "{{title");

        assert_eq!(
            views.render("nope", &ViewVars::new()),
            Err(ViewError::NotFound("nope".to_string()))
        );
        assert_eq!(
            views.render("index", &ViewVars::new()),
            Err(ViewError::MissingVariable {
                view: "index".to_string(),
                variable: "title".to_string(),
            })
        );
        assert_eq!(
            views.render("broken", &vars(&[("title", "x")])),
            Err(ViewError::Unterminated("broken".to_string()))
        );
    }
}
