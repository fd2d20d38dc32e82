// Preview-then-export flow for one user session.
//
// The readiness flag lives on the session value, never in global state. Each
// call reloads the file and rebuilds the model from scratch.
use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use crate::loader::load_dataset;
use crate::model::{ReportModel, SectionKind};
use crate::output::{render_markdown, write_json, write_table_csv};
use crate::reports::build_report;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Session {
    input: PathBuf,
    options: ReportOptions,
    preview_ready: bool,
}

/// Files written by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub document: PathBuf,
    pub json: PathBuf,
    pub tables: Vec<PathBuf>,
}

impl Session {
    pub fn new(input: impl Into<PathBuf>, options: ReportOptions) -> Self {
        Session {
            input: input.into(),
            options,
            preview_ready: false,
        }
    }

    pub fn preview_ready(&self) -> bool {
        self.preview_ready
    }

    /// Build the report and return its text rendering. On success the
    /// session allows exports.
    pub fn preview(&mut self) -> Result<String> {
        let model = self.build()?;
        self.preview_ready = true;
        Ok(render_markdown(&model))
    }

    pub fn export(&self, out_dir: &Path) -> Result<ExportedFiles> {
        if !self.preview_ready {
            return Err(ReportError::PreviewRequired);
        }
        let model = self.build()?;
        std::fs::create_dir_all(out_dir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("cpt_{}_report_{}", model.metadata.billing_code, stamp);
        let document = out_dir.join(format!("{base}.md"));
        std::fs::write(&document, render_markdown(&model))?;
        let json = out_dir.join(format!("{base}.json"));
        write_json(&json, &model)?;

        let mut tables = Vec::new();
        for section in &model.sections {
            if section.kind == SectionKind::Title {
                continue;
            }
            let path = out_dir.join(format!("{base}_{}.csv", section_slug(section.kind)));
            write_table_csv(&path, &section.table)?;
            tables.push(path);
        }

        tracing::info!(document = %document.display(), tables = tables.len(), "report exported");
        Ok(ExportedFiles {
            document,
            json,
            tables,
        })
    }

    fn build(&self) -> Result<ReportModel> {
        let data = load_dataset(&self.input)?;
        Ok(build_report(&data, &self.options))
    }
}

fn section_slug(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Title => "title",
        SectionKind::RateAnalysis => "rates",
        SectionKind::BillingClass => "billing_class",
        SectionKind::ContractType => "contract_type",
        SectionKind::Geographic => "cities",
    }
}
