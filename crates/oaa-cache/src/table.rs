//! Tables
//!
//! Grid model of each table (rows, columns, spans), its header cells and
//! the layout/data classification. Cells are placed with the HTML table
//! algorithm so row and column spans shift later cells.

use std::collections::HashSet;

use oaa_dom::{ElementData, NodeId};

use crate::element::{ElementIndex, ElementRef};

/// Upper bound on honoured row/column spans
const MAX_SPAN: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    Layout,
    Data,
    /// Multi-level headers or explicit `headers` associations
    Complex,
    /// ARIA grid or treegrid
    Grid,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Data => "data",
            Self::Complex => "complex",
            Self::Grid => "grid",
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data | Self::Complex)
    }
}

/// Which axis a header cell labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderAxis {
    #[default]
    None,
    Column,
    Row,
}

/// How a data cell's headers were found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadersSource {
    #[default]
    None,
    HeadersAttribute,
    RowColumn,
}

#[derive(Debug, Clone)]
pub struct TableCell {
    pub element: ElementRef,
    /// 1-based grid position
    pub row: u32,
    pub column: u32,
    pub row_span: u32,
    pub column_span: u32,
    pub axis: HeaderAxis,
    pub has_content: bool,
    /// Names of the header cells labelling this cell
    pub headers: String,
    pub headers_source: HeadersSource,
    headers_attr: Option<String>,
}

impl TableCell {
    pub fn is_header(&self) -> bool {
        self.axis != HeaderAxis::None
    }
}

#[derive(Debug, Clone)]
pub struct TableElement {
    pub element: ElementRef,
    pub table_type: TableType,
    pub row_count: u32,
    /// Widest row, counting spans
    pub column_count: u32,
    pub caption: Option<ElementIndex>,
    pub has_summary: bool,
    pub parent_table: Option<usize>,
    pub nesting_level: u32,
    pub header_cell_count: usize,
    pub uses_headers_attr: bool,
    pub cells: Vec<TableCell>,
    explicit_role: Option<&'static str>,
    current_row: u32,
    current_column: u32,
    /// Per column (0-based), the last row a row span reaches down to
    covered_until: Vec<u32>,
}

impl TableElement {
    pub(crate) fn new(
        element: ElementRef,
        elem: &ElementData,
        explicit_role: Option<&'static str>,
        parent_table: Option<usize>,
    ) -> Self {
        Self {
            element,
            table_type: TableType::Layout,
            row_count: 0,
            column_count: 0,
            caption: None,
            has_summary: elem.get_attr_trimmed("summary").is_some(),
            parent_table,
            nesting_level: 0,
            header_cell_count: 0,
            uses_headers_attr: false,
            cells: Vec::new(),
            explicit_role,
            current_row: 0,
            current_column: 0,
            covered_until: Vec::new(),
        }
    }

    /// A `tr` of this table starts
    pub(crate) fn start_row(&mut self) {
        self.current_row += 1;
        self.current_column = 0;
        self.row_count = self.row_count.max(self.current_row);
    }

    /// Place a `td`/`th` in the grid
    pub(crate) fn add_cell(&mut self, element: ElementRef, elem: &ElementData, role: Option<&str>, in_thead: bool) {
        if self.current_row == 0 {
            self.start_row();
        }
        let span = |name: &str| {
            elem.get_attr_trimmed(name)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(1)
                .min(MAX_SPAN)
        };
        let row_span = span("rowspan");
        let column_span = span("colspan");

        let row = self.current_row;
        let mut column = self.current_column + 1;
        while self.is_covered(row, column) {
            column += 1;
        }
        let last_column = (column + column_span - 1) as usize;
        if self.covered_until.len() < last_column {
            self.covered_until.resize(last_column, 0);
        }
        let last_row = row + row_span - 1;
        for covered in &mut self.covered_until[column as usize - 1..last_column] {
            *covered = (*covered).max(last_row);
        }
        self.current_column = column + column_span - 1;
        self.column_count = self.column_count.max(self.current_column);
        self.row_count = self.row_count.max(row + row_span - 1);

        let axis = header_axis(elem, role, in_thead, row, column);
        if axis != HeaderAxis::None {
            self.header_cell_count += 1;
        }
        let headers_attr = elem.get_attr_trimmed("headers").map(str::to_string);
        if headers_attr.is_some() {
            self.uses_headers_attr = true;
        }

        self.cells.push(TableCell {
            element,
            row,
            column,
            row_span,
            column_span,
            axis,
            has_content: false,
            headers: String::new(),
            headers_source: HeadersSource::None,
            headers_attr,
        });
    }

    /// Whether a row span from an earlier row reaches this slot
    fn is_covered(&self, row: u32, column: u32) -> bool {
        self.covered_until
            .get(column as usize - 1)
            .is_some_and(|last| *last >= row)
    }

    pub(crate) fn set_caption(&mut self, caption: ElementIndex) {
        if self.caption.is_none() {
            self.caption = Some(caption);
        }
    }

    /// Classify the table and resolve each data cell's headers
    ///
    /// `text_of` yields the announced text of a node; `text_of_id` the
    /// text of the element with the given id.
    pub(crate) fn finalize(
        &mut self,
        text_of: &dyn Fn(NodeId) -> String,
        text_of_id: &dyn Fn(&str) -> Option<String>,
    ) {
        self.covered_until = Vec::new();
        self.table_type = self.classify();

        let names: Vec<String> = self.cells.iter().map(|c| text_of(c.element.node)).collect();
        for (cell, name) in self.cells.iter_mut().zip(&names) {
            cell.has_content = !name.is_empty();
        }

        let headers: Vec<HeaderCell> = self
            .cells
            .iter()
            .zip(&names)
            .filter(|(c, _)| c.is_header())
            .map(|(c, name)| HeaderCell {
                axis: c.axis,
                row: c.row,
                column: c.column,
                row_end: c.row + c.row_span - 1,
                column_end: c.column + c.column_span - 1,
                name: name.clone(),
            })
            .collect();

        for cell in self.cells.iter_mut().filter(|c| !c.is_header()) {
            if let Some(ids) = cell.headers_attr.as_deref() {
                let text = ids
                    .split_whitespace()
                    .filter_map(text_of_id)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    cell.headers = text;
                    cell.headers_source = HeadersSource::HeadersAttribute;
                }
                continue;
            }

            let row_end = cell.row + cell.row_span - 1;
            let column_end = cell.column + cell.column_span - 1;
            let column_headers = headers.iter().filter(|h| {
                h.axis == HeaderAxis::Column
                    && h.row < cell.row
                    && h.column <= column_end
                    && h.column_end >= cell.column
            });
            let row_headers = headers.iter().filter(|h| {
                h.axis == HeaderAxis::Row
                    && h.column < cell.column
                    && h.row <= row_end
                    && h.row_end >= cell.row
            });
            let text = column_headers
                .chain(row_headers)
                .map(|h| h.name.as_str())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                cell.headers = text;
                cell.headers_source = HeadersSource::RowColumn;
            }
        }
    }

    fn classify(&self) -> TableType {
        match self.explicit_role {
            Some("grid" | "treegrid") => return TableType::Grid,
            Some("none" | "presentation") => return TableType::Layout,
            _ => {}
        }
        let explicit_table = self.explicit_role == Some("table");
        let unlabelled = self.header_cell_count == 0 && self.caption.is_none() && !self.has_summary;
        if !explicit_table && (unlabelled || self.row_count <= 1) {
            return TableType::Layout;
        }
        if self.uses_headers_attr || self.has_multi_level_headers() {
            TableType::Complex
        } else {
            TableType::Data
        }
    }

    /// Column headers on several rows, or row headers in several columns
    fn has_multi_level_headers(&self) -> bool {
        let mut header_rows = HashSet::new();
        let mut header_columns = HashSet::new();
        for cell in &self.cells {
            match cell.axis {
                HeaderAxis::Column => {
                    header_rows.insert(cell.row);
                }
                HeaderAxis::Row => {
                    header_columns.insert(cell.column);
                }
                HeaderAxis::None => {}
            }
        }
        header_rows.len() > 1 || header_columns.len() > 1
    }

    /// Multi-column layout tables give a linearisation order to check
    pub fn is_multi_column(&self) -> bool {
        self.column_count > 1
    }
}

struct HeaderCell {
    axis: HeaderAxis,
    row: u32,
    column: u32,
    row_end: u32,
    column_end: u32,
    name: String,
}

fn header_axis(elem: &ElementData, role: Option<&str>, in_thead: bool, row: u32, column: u32) -> HeaderAxis {
    match role {
        Some("columnheader") => return HeaderAxis::Column,
        Some("rowheader") => return HeaderAxis::Row,
        _ => {}
    }
    let scope = elem.get_attr_trimmed("scope").map(str::to_ascii_lowercase);
    match scope.as_deref() {
        Some("col" | "colgroup") => return HeaderAxis::Column,
        Some("row" | "rowgroup") => return HeaderAxis::Row,
        _ => {}
    }
    if elem.tag() != "th" {
        return HeaderAxis::None;
    }
    if in_thead || row == 1 {
        HeaderAxis::Column
    } else if column == 1 {
        HeaderAxis::Row
    } else {
        HeaderAxis::Column
    }
}
