//! Report module - HTML tables and page documents

mod page;
mod table;

pub use page::{plotly_div, render_data_page, render_index_page};
pub use table::{change_table_css_class, escape_html, HtmlRow, HtmlTable};
