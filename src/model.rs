// Renderer-agnostic report content.
//
// A `ReportModel` holds nothing but display strings and finite numbers, so
// any renderer can lay it out without recomputing figures.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub metadata: ReportMetadata,
    pub sections: Vec<Section>,
}

impl ReportModel {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub billing_code: String,
    pub record_count: usize,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Title,
    RateAnalysis,
    BillingClass,
    ContractType,
    Geographic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub explanation_text: String,
    pub table: TableSpec,
    /// Tables that follow the main one (e.g. rates per billing class).
    pub extra_tables: Vec<TableSpec>,
    /// Short summary lines shown after the tables.
    pub notes: Vec<String>,
    pub chart: Option<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub caption: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        TableSpec {
            caption: None,
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// First column of every row.
    pub fn first_column(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.first().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Bar,
}

/// One bar or bin. `value` is finite when present; `label_text` is its
/// display form (`N/A` when absent).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
    pub label_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartPoint>,
    /// Visible x-axis window for histograms.
    pub x_range: Option<(f64, f64)>,
    pub annotation: Option<String>,
}
