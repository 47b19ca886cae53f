use unicode_width::UnicodeWidthStr;

use crate::layout::{NodeHeight, NodeSize};
use crate::schema::Table;

#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub char_width: f64,
    pub padding_x: f64,
    /// Room for the PK/FK badge column.
    pub badge_width: f64,
    pub min_node_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            padding_x: 12.0,
            badge_width: 24.0,
            min_node_width: 200.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Initial box size for a table. Height is left to the renderer.
    pub fn node_size(&self, table: &Table) -> NodeSize {
        let header_width = self.text_width(&table.qualified_name());

        let max_col_width = table
            .columns
            .iter()
            .map(|c| {
                self.text_width(&c.name) + self.text_width(&c.typ) + self.char_width * 2.0 + self.badge_width
            })
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_col_width) + self.padding_x * 2.0;

        NodeSize {
            width: content_width.max(self.min_node_width),
            height: NodeHeight::Auto,
        }
    }
}
