//! Chart template rendering.

use idset_core::ports::ChartRenderer;
use idset_core::{Result, ResultSet};
use regex::Regex;
use std::sync::LazyLock;

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{\s*([^}]+?)\s*\}\}").expect("valid expression regex"));

/// Fills `${{ ... }}` expressions in a chart template with result data.
///
/// Supports:
/// - `${{ rows }}` - rows as a JSON array of arrays
/// - `${{ columns }}` - column names as a JSON array
/// - `${{ formats }}` - format descriptors as a JSON array of strings
/// - `${{ row_count }}` - number of rows
///
/// Unknown expressions render as empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateChartRenderer;

impl ChartRenderer for TemplateChartRenderer {
    fn render(&self, template: &str, result: &ResultSet) -> Result<Vec<u8>> {
        let rows = serde_json::to_string(&result.rows)?;
        let columns = serde_json::to_string(&result.columns)?;
        let formats = serde_json::to_string(&result.formats)?;

        let rendered = EXPRESSION.replace_all(template, |caps: &regex::Captures| {
            match caps.get(1).map_or("", |m| m.as_str()) {
                "rows" => rows.clone(),
                "columns" => columns.clone(),
                "formats" => formats.clone(),
                "row_count" => result.rows.len().to_string(),
                _ => String::new(),
            }
        });

        Ok(rendered.into_owned().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ResultSet {
        ResultSet {
            columns: vec!["month".into(), "count".into()],
            formats: vec!["{}".into(), "{}".into()],
            rows: vec![vec!["jan".into(), "3".into()], vec!["feb".into(), "5".into()]],
        }
    }

    #[test]
    fn test_render_rows_and_columns() {
        let out = TemplateChartRenderer
            .render(
                "{\"labels\": ${{ columns }}, \"data\": ${{rows}}, \"n\": ${{ row_count }}}",
                &result(),
            )
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["labels"][1], "count");
        assert_eq!(json["data"][1][0], "feb");
        assert_eq!(json["n"], 2);
    }

    #[test]
    fn test_unknown_expression_renders_empty() {
        let out = TemplateChartRenderer
            .render("a${{ nope }}b", &result())
            .unwrap();
        assert_eq!(out, b"ab");
    }

    #[test]
    fn test_template_without_expressions() {
        let out = TemplateChartRenderer.render("<svg/>", &result()).unwrap();
        assert_eq!(out, b"<svg/>");
    }
}
