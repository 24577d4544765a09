//! Grid projection of result sets for display.

use crate::result::ResultSet;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex"));

/// Column type whose cells render as anchors.
pub const COLUMN_TYPE_LINK: &str = "link";

/// Display properties of one grid column, decoded from a format descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColumn {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub filterable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub perm: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub align: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caption: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icons: String,
    #[serde(default, rename = "ialign", skip_serializing_if = "String::is_empty")]
    pub icons_align: String,
    /// Browsing context for opened links.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Table ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<Vec<String>>,
    pub is_downloadable: bool,
}

impl ResultSet {
    /// Decode column formats and pair them with the rows.
    pub fn to_grid(&self) -> Result<Grid> {
        let columns = self
            .formats
            .iter()
            .zip(&self.columns)
            .map(|(format, name)| -> Result<GridColumn> {
                let mut column: GridColumn = serde_json::from_str(format)?;
                column.name = name.clone();
                Ok(column)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Grid {
            columns,
            rows: self.rows.clone(),
            is_downloadable: true,
        })
    }
}

impl Grid {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Turn visible link-typed cells into anchors.
    ///
    /// `{column}` placeholders in a column's `href` are filled from the same
    /// row. Relative hrefs are prefixed with `link_prefix`.
    pub fn expand_links(&mut self, link_prefix: &str) -> Result<()> {
        let positions: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut templates: Vec<(usize, String, Vec<(String, usize)>)> = Vec::new();
        for (ci, column) in self.columns.iter().enumerate() {
            if column.hidden || column.kind != COLUMN_TYPE_LINK {
                continue;
            }

            let mut refs = Vec::new();
            for caps in PLACEHOLDER.captures_iter(&column.href) {
                let name = &caps[1];
                let pos = positions
                    .get(name)
                    .ok_or_else(|| Error::Render(format!("invalid placeholder {}", &caps[0])))?;
                refs.push((caps[0].to_string(), *pos));
            }
            if refs.is_empty() {
                continue;
            }

            let href = if column.href.starts_with("http") {
                column.href.clone()
            } else {
                format!("{}{}", link_prefix, column.href)
            };
            templates.push((ci, href, refs));
        }

        for row in &mut self.rows {
            let original = row.clone();
            for (ci, href, refs) in &templates {
                let mut target = href.clone();
                for (placeholder, pos) in refs {
                    target = target.replace(placeholder, &original[*pos]);
                }
                row[*ci] = format!("<a href=\"{}\">{}</a>", target, original[*ci]);
            }
        }

        Ok(())
    }
}
