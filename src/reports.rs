// Builds the ReportModel from a Dataset.
//
// The console preview and the exported document both render the model
// produced here; neither recomputes any figure.
use crate::categories::{category_distribution, CategoryDistribution};
use crate::config::ReportOptions;
use crate::geography::{city_chart_average, city_stats, display_city_name, top_cities};
use crate::model::{
    ChartKind, ChartPoint, ChartSpec, ReportMetadata, ReportModel, Section, SectionKind, TableSpec,
};
use crate::stats::RateSummary;
use crate::types::{Column, Dataset, Schema};
use crate::util::{format_currency, format_currency_opt, format_int, format_percent};
use chrono::{Local, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RATE_EXPLANATION: &str = "This section shows how much different healthcare providers \
charge for this procedure. The table below shows key statistics, and the chart shows the \
distribution of rates across all providers.";

const BILLING_EXPLANATION: &str = "This shows how providers bill for this procedure, by service \
type, and how rates compare between them.";

const CONTRACT_EXPLANATION: &str = "This shows different types of payment contracts between \
insurance companies and healthcare providers. Different contract types can affect the final \
cost you pay.";

const GEO_EXPLANATION: &str = "This section shows which cities have healthcare providers \
offering this procedure and their average rates. This can help you find providers in your area \
or compare costs across different locations.";

const TOP_CITY_LIST: usize = 10;

/// Sections the report will contain, decided from the schema alone plus
/// whether any usable rate exists. Order is fixed.
pub fn planned_sections(schema: &Schema, has_usable_rates: bool) -> Vec<SectionKind> {
    let mut kinds = vec![SectionKind::Title];
    if schema.has(Column::NegotiatedRate) && has_usable_rates {
        kinds.push(SectionKind::RateAnalysis);
    }
    if schema.has(Column::BillingClass) {
        kinds.push(SectionKind::BillingClass);
    }
    if schema.has(Column::NegotiatedType) {
        kinds.push(SectionKind::ContractType);
    }
    if schema.has(Column::City) {
        kinds.push(SectionKind::Geographic);
    }
    kinds
}

pub fn build_report(data: &Dataset, opts: &ReportOptions) -> ReportModel {
    build_report_at(data, opts, Local::now().naive_local())
}

/// Same as `build_report` with a fixed generation time.
pub fn build_report_at(
    data: &Dataset,
    opts: &ReportOptions,
    generated_at: NaiveDateTime,
) -> ReportModel {
    let billing_code = data
        .billing_code()
        .unwrap_or(&opts.fallback_billing_code)
        .to_string();
    let metadata = ReportMetadata {
        billing_code,
        record_count: data.len(),
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
    };

    let summary = if data.has(Column::NegotiatedRate) {
        let s = RateSummary::from_rates(data.rates());
        if s.is_none() {
            tracing::warn!("negotiated_rate has no usable values; rate analysis omitted");
        }
        s
    } else {
        None
    };

    let plan = planned_sections(data.schema(), summary.is_some());
    for c in Column::ALL {
        if !data.has(c) {
            tracing::debug!(column = c.header(), "column absent; dependent sections skipped");
        }
    }

    let mut sections = Vec::with_capacity(plan.len());
    for kind in plan {
        let section = match kind {
            SectionKind::Title => title_section(&metadata, opts),
            SectionKind::RateAnalysis => match &summary {
                Some(s) => rate_section(data, s, &metadata.billing_code, opts),
                None => continue,
            },
            SectionKind::BillingClass => billing_class_section(data),
            SectionKind::ContractType => contract_type_section(data),
            SectionKind::Geographic => geographic_section(data, &metadata.billing_code, opts),
        };
        tracing::debug!(section = ?kind, rows = section.table.rows.len(), "section built");
        sections.push(section);
    }

    tracing::info!(
        billing_code = %metadata.billing_code,
        records = metadata.record_count,
        sections = sections.len(),
        "report model built"
    );
    ReportModel { metadata, sections }
}

fn title_section(meta: &ReportMetadata, opts: &ReportOptions) -> Section {
    let mut table = TableSpec::new(["Field", "Value"]);
    table.push_row(["Generated on".to_string(), meta.generated_at.clone()]);
    table.push_row(["Insurance".to_string(), opts.insurance.clone()]);
    table.push_row(["Plan".to_string(), opts.plan.clone()]);
    table.push_row(["CPT Code".to_string(), meta.billing_code.clone()]);
    table.push_row(["Total Records".to_string(), format_int(meta.record_count)]);
    Section {
        kind: SectionKind::Title,
        title: format!("CPT {} Analysis Report", meta.billing_code),
        explanation_text: String::new(),
        table,
        extra_tables: vec![],
        notes: vec![],
        chart: None,
    }
}

fn rate_section(
    data: &Dataset,
    s: &RateSummary,
    billing_code: &str,
    opts: &ReportOptions,
) -> Section {
    let mut table = TableSpec::new(["What This Means", "Value"]);
    table.push_row(["Average Rate".to_string(), format_currency(s.mean, 2)]);
    table.push_row(["Most Common Rate (Median)".to_string(), format_currency(s.median, 2)]);
    table.push_row(["Lowest Rate Found".to_string(), format_currency(s.min, 2)]);
    table.push_row(["Highest Rate Found".to_string(), format_currency(s.max, 2)]);
    table.push_row(["Range (High - Low)".to_string(), format_currency(s.range, 2)]);
    table.push_row(["Total Providers Analyzed".to_string(), format_int(s.count)]);
    for pv in &s.percentiles {
        table.push_row([
            format!("{}% of providers charge less than", pv.p),
            format_currency(pv.value, 2),
        ]);
    }

    let p95 = s.percentile(95).unwrap_or(s.max);
    let annotation = format!(
        "Quick Stats:\nAverage: {}\nMost Common: {}\nRange: {} - {}\nTotal Providers: {}",
        format_currency(s.mean, 0),
        format_currency(s.median, 0),
        format_currency(s.min, 0),
        format_currency(s.max, 0),
        format_int(s.count)
    );
    let chart = ChartSpec {
        kind: ChartKind::Histogram,
        title: format!(
            "How Much Do Providers Charge for CPT {}?\nDistribution of Rates Across {} Healthcare Providers",
            billing_code,
            format_int(s.count)
        ),
        x_label: "Cost in US Dollars".to_string(),
        y_label: "Number of Providers".to_string(),
        series: histogram(data, s, opts.histogram_bins),
        x_range: Some((s.min * 0.95, p95 * 1.05)),
        annotation: Some(annotation),
    };

    Section {
        kind: SectionKind::RateAnalysis,
        title: "Rate Analysis - What Do Providers Charge?".to_string(),
        explanation_text: RATE_EXPLANATION.to_string(),
        table,
        extra_tables: vec![],
        notes: vec![],
        chart: Some(chart),
    }
}

/// Equal-width bins over [min, max]; the last bin is closed on the right.
fn histogram(data: &Dataset, s: &RateSummary, bins: usize) -> Vec<ChartPoint> {
    let bins = bins.max(1);
    let width = s.range / bins as f64;
    let mut counts = vec![0usize; bins];
    for rate in data.rates().flatten().filter(|r| r.is_finite()) {
        let idx = if width > 0.0 {
            (((rate - s.min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let lower = s.min + width * i as f64;
            ChartPoint {
                label: format_currency(lower, 0),
                value: Some(n as f64),
                label_text: format_int(n),
            }
        })
        .collect()
}

fn distribution_table(dist: &CategoryDistribution, label: &str) -> TableSpec {
    let mut table = TableSpec::new([label, "Number of Providers", "Percentage"]);
    for e in &dist.entries {
        table.push_row([e.value.clone(), e.count.to_string(), format_percent(e.percentage)]);
    }
    table
}

fn billing_class_section(data: &Dataset) -> Section {
    let dist = category_distribution(data, Column::BillingClass);
    let table = distribution_table(&dist, "Service Type");

    let mut extra_tables = vec![];
    if data.has(Column::NegotiatedRate) {
        let mut rates = TableSpec::new([
            "Service Type",
            "Average Rate",
            "Most Common Rate",
            "Rate Variation",
            "Count",
        ])
        .with_caption("Rate Comparison by Service Type");
        for e in &dist.entries {
            let row = match &e.rates {
                Some(r) => [
                    e.value.clone(),
                    format_currency(r.mean, 2),
                    format_currency(r.median, 2),
                    format_currency_opt(r.std_dev, 2),
                    r.count.to_string(),
                ],
                None => [
                    e.value.clone(),
                    format_currency_opt(None, 2),
                    format_currency_opt(None, 2),
                    format_currency_opt(None, 2),
                    "0".to_string(),
                ],
            };
            rates.push_row(row);
        }
        extra_tables.push(rates);
    }

    Section {
        kind: SectionKind::BillingClass,
        title: "Billing Class Analysis".to_string(),
        explanation_text: BILLING_EXPLANATION.to_string(),
        table,
        extra_tables,
        notes: vec![],
        chart: None,
    }
}

fn contract_type_section(data: &Dataset) -> Section {
    let dist = category_distribution(data, Column::NegotiatedType);
    Section {
        kind: SectionKind::ContractType,
        title: "Contract Type Analysis - Payment Methods".to_string(),
        explanation_text: CONTRACT_EXPLANATION.to_string(),
        table: distribution_table(&dist, "Contract Type"),
        extra_tables: vec![],
        notes: vec![],
        chart: None,
    }
}

fn geographic_section(data: &Dataset, billing_code: &str, opts: &ReportOptions) -> Section {
    let ranking = city_stats(data);

    let mut table = TableSpec::new([
        "City",
        "# of Providers",
        "% of Total",
        "Average Rate",
        "Most Common Rate",
    ])
    .with_caption("All Cities with Providers");
    for c in &ranking {
        table.push_row([
            display_city_name(&c.city, opts.city_name_max_chars),
            c.count.to_string(),
            format_percent(c.percentage),
            format_currency_opt(c.avg_rate, 0),
            format_currency_opt(c.median_rate, 0),
        ]);
    }

    let mut notes = vec![format!("Total Unique Cities: {}", format_int(ranking.len()))];
    if let Some(top) = ranking.first() {
        notes.push(format!(
            "City with Most Providers: {} ({} providers)",
            top.city, top.count
        ));
    }
    for (i, c) in top_cities(&ranking, TOP_CITY_LIST).iter().enumerate() {
        notes.push(format!(
            "{}. {}: {} providers ({})",
            i + 1,
            c.city,
            c.count,
            format_percent(c.percentage)
        ));
    }

    let chart = if data.has(Column::NegotiatedRate) {
        let series = top_cities(&ranking, opts.top_city_limit)
            .iter()
            .map(|c| {
                let avg = city_chart_average(data, &c.city);
                ChartPoint {
                    label: c.city.clone(),
                    value: avg,
                    label_text: format_currency_opt(avg, 0),
                }
            })
            .collect();
        Some(ChartSpec {
            kind: ChartKind::Bar,
            title: format!(
                "Average Negotiated Rate for CPT {} by City\nTop {} Cities by Provider Count",
                billing_code, opts.top_city_limit
            ),
            x_label: "Cities".to_string(),
            y_label: "Average Negotiated Rate ($)".to_string(),
            series,
            x_range: None,
            annotation: None,
        })
    } else {
        None
    };

    Section {
        kind: SectionKind::Geographic,
        title: "Geographic Distribution - Where Are Providers Located?".to_string(),
        explanation_text: GEO_EXPLANATION.to_string(),
        table,
        extra_tables: vec![],
        notes,
        chart,
    }
}
