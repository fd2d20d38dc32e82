use chrono::NaiveDate;
use cpt_report::categories::category_distribution;
use cpt_report::geography::{city_stats, top_cities};
use cpt_report::loader::load_from_reader;
use cpt_report::model::SectionKind;
use cpt_report::stats::RateSummary;
use cpt_report::types::{Column, Dataset, Record, Schema};
use cpt_report::{build_report_at, ReportOptions};
use proptest::prelude::*;

const SAMPLE: &str = "\
billing_code,billing_class,negotiated_type,negotiated_rate,city,npi
27130,Professional,negotiated,100,Austin,1
27130,Professional,fee schedule,200,Dallas,2
27130,Institutional,negotiated,300,Austin,3
27130,Professional,negotiated,400,Houston,4
27130,Institutional,per diem,500,Austin,5
27130,Professional,negotiated,,Waco,6
27130,Professional,negotiated,,Waco,7
";

fn build(csv: &str) -> cpt_report::ReportModel {
    let data = load_from_reader(csv.as_bytes()).unwrap();
    let at = NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    build_report_at(&data, &ReportOptions::default(), at)
}

#[test]
fn full_report_from_csv() {
    let model = build(SAMPLE);
    assert_eq!(model.metadata.record_count, 7);
    assert_eq!(model.sections.len(), 5);

    let rate = model.section(SectionKind::RateAnalysis).unwrap();
    assert_eq!(rate.table.rows[0][1], "$300.00");
    assert_eq!(rate.table.rows[5][1], "5");

    let geo = model.section(SectionKind::Geographic).unwrap();
    assert_eq!(geo.table.first_column(), vec!["Austin", "Waco", "Dallas", "Houston"]);
    let waco = &geo.table.rows[1];
    assert_eq!(waco[3], "N/A");
    assert_eq!(waco[4], "N/A");
}

#[test]
fn absent_city_column_drops_section_and_chart() {
    let csv = "billing_class,negotiated_rate\nProfessional,100\nInstitutional,200\n";
    let model = build(csv);
    assert!(model.section(SectionKind::Geographic).is_none());
    assert!(model
        .sections
        .iter()
        .filter_map(|s| s.chart.as_ref())
        .all(|c| c.kind != cpt_report::model::ChartKind::Bar));
}

#[test]
fn only_title_without_recognized_columns() {
    let model = build("npi,name\n1,A\n2,B\n");
    assert_eq!(model.kinds(), vec![SectionKind::Title]);
    assert_eq!(model.metadata.billing_code, "27130");
    assert_eq!(model.metadata.record_count, 2);
}

#[test]
fn no_nan_reaches_the_model() {
    let csv = "billing_class,negotiated_rate,city\nA,,X\nA,NaN,Y\nB,10,Y\n";
    let model = build(csv);
    let json = serde_json::to_string(&model).unwrap();
    assert!(!json.contains("NaN"));
    for s in &model.sections {
        for t in std::iter::once(&s.table).chain(s.extra_tables.iter()) {
            for cell in t.rows.iter().flatten() {
                assert!(!cell.contains("NaN") && !cell.contains("inf"), "{cell}");
            }
        }
    }
}

#[test]
fn huge_rates_are_not_printed_as_zero() {
    let csv = "negotiated_rate,city\n20000000000000000000,A\n30000000000000000000,A\n";
    let model = build(csv);
    let rate = model.section(SectionKind::RateAnalysis).unwrap();
    assert_eq!(rate.table.rows[0][1], "$25,000,000,000,000,000,000.00");
    assert_eq!(rate.table.rows[2][1], "$20,000,000,000,000,000,000.00");
    let geo = model.section(SectionKind::Geographic).unwrap();
    assert_eq!(geo.table.rows[0][3], "$25,000,000,000,000,000,000");
}

fn record(class: usize, city: usize, rate: Option<f64>) -> Record {
    Record {
        billing_code: Some("27130".into()),
        billing_class: Some(format!("class{class}")),
        negotiated_type: Some("negotiated".into()),
        negotiated_rate: rate,
        city: Some(format!("city{city}")),
    }
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(
        (0usize..4, 0usize..25, prop::option::of(1.0f64..100_000.0)),
        0..200,
    )
    .prop_map(|rows| {
        let records = rows.into_iter().map(|(c, y, r)| record(c, y, r)).collect();
        Dataset::new(Schema::new(&Column::ALL), records)
    })
}

proptest! {
    #[test]
    fn percentiles_are_ordered(rates in prop::collection::vec(prop::option::of(-1e6f64..1e6), 0..100)) {
        match RateSummary::from_rates(rates.clone()) {
            None => prop_assert!(rates.iter().all(Option::is_none)),
            Some(s) => {
                let mut prev = s.min;
                for pv in &s.percentiles {
                    prop_assert!(pv.value >= prev - 1e-9);
                    prev = pv.value;
                }
                prop_assert!(prev <= s.max + 1e-9);
                prop_assert!((s.range - (s.max - s.min)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn distribution_sums(data in arb_dataset()) {
        let dist = category_distribution(&data, Column::BillingClass);
        let counts: usize = dist.entries.iter().map(|e| e.count).sum();
        prop_assert_eq!(counts, data.len());
        if !data.is_empty() {
            let pct: f64 = dist.entries.iter().map(|e| e.percentage).sum();
            prop_assert!((pct - 100.0).abs() < 0.1);
        }
        prop_assert!(dist.entries.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn city_ranking_and_top_prefix(data in arb_dataset()) {
        let ranking = city_stats(&data);
        let distinct: std::collections::HashSet<_> =
            data.records().iter().filter_map(|r| r.city.clone()).collect();
        prop_assert_eq!(ranking.len(), distinct.len());
        prop_assert_eq!(ranking.iter().map(|c| c.count).sum::<usize>(), data.len());
        prop_assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));

        let top = top_cities(&ranking, 15);
        prop_assert_eq!(top.len(), ranking.len().min(15));
        prop_assert_eq!(top, &ranking[..top.len()]);
    }

    #[test]
    fn chart_bars_follow_ranking(data in arb_dataset()) {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap();
        let model = build_report_at(&data, &ReportOptions::default(), at);
        let geo = model.section(SectionKind::Geographic).unwrap();
        let chart = geo.chart.as_ref().unwrap();
        let ranking = city_stats(&data);
        let labels: Vec<&str> = chart.series.iter().map(|p| p.label.as_str()).collect();
        let expected: Vec<&str> = top_cities(&ranking, 15).iter().map(|c| c.city.as_str()).collect();
        prop_assert_eq!(labels, expected);
        for (p, c) in chart.series.iter().zip(ranking.iter()) {
            prop_assert_eq!(p.value, c.avg_rate);
        }
    }

    #[test]
    fn builds_are_deterministic(data in arb_dataset()) {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap();
        let opts = ReportOptions::default();
        prop_assert_eq!(build_report_at(&data, &opts, at), build_report_at(&data, &opts, at));
    }
}
