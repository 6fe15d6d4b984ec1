use chrono::NaiveDate;
use insights_core::{CampaignRecord, CampaignStatus};
use insights_engine::export::{to_csv, CSV_HEADER};
use insights_engine::generate::generate_campaigns;
use insights_engine::{
    aggregate, filter_and_sort, run_query, DateRange, QueryParams, SortDirection, SortField,
    SortState, TableQuery,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn dataset(seed: u64) -> Vec<CampaignRecord> {
    generate_campaigns(100, today(), &mut StdRng::seed_from_u64(seed))
}

#[test]
fn query_output_is_filtered_subset_for_many_queries() {
    let data = dataset(3);
    for status in [None, Some(CampaignStatus::Active), Some(CampaignStatus::Completed)] {
        for channel in [None, Some("Facebook"), Some("Email")] {
            for field in [SortField::Revenue, SortField::CampaignName, SortField::Growth] {
                let query = TableQuery {
                    search_term: "a".to_string(),
                    channel: channel.map(str::to_string),
                    status,
                    sort: SortState {
                        field,
                        direction: SortDirection::Asc,
                    },
                    page: 1,
                };
                let rows = filter_and_sort(&data, &query);
                for row in &rows {
                    assert!(query.matches(row));
                    assert!(data.iter().any(|r| r.id == row.id));
                }
                let expected = data.iter().filter(|r| query.matches(r)).count();
                assert_eq!(rows.len(), expected);
                for pair in rows.windows(2) {
                    assert!(field.compare(pair[0], pair[1]).is_le());
                }
            }
        }
    }
}

#[test]
fn summer_google_ads_page_from_query_params() {
    let data = dataset(17);
    let params = QueryParams {
        search: Some("Summer".to_string()),
        channel: Some("Google Ads".to_string()),
        ..QueryParams::default()
    };
    let query = params.table_query().unwrap();
    let page = run_query(&data, &query, 10);

    assert!(page.records.len() <= 10);
    for record in &page.records {
        assert!(record.campaign_name.to_lowercase().contains("summer"));
        assert_eq!(record.channel, "Google Ads");
    }
    for pair in page.records.windows(2) {
        assert!(pair[0].revenue >= pair[1].revenue);
    }
}

#[test]
fn date_range_then_aggregate_matches_manual_sum() {
    let data = dataset(5);
    let range = DateRange::parse(Some("2024-05-01"), Some("2024-05-31")).unwrap();
    let working_set = range.select(&data);
    let expected: u64 = data
        .iter()
        .filter(|r| r.date >= NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .filter(|r| r.date <= NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
        .map(|r| r.revenue)
        .sum();
    assert_eq!(aggregate(working_set).total_revenue, expected);

    let inverted = DateRange::parse(Some("2024-03-10"), Some("2024-03-05")).unwrap();
    assert!(inverted.select(&data).is_empty());
}

#[test]
fn csv_export_has_one_line_per_filtered_row() {
    let data = dataset(9);
    let query = TableQuery {
        status: Some(CampaignStatus::Paused),
        ..TableQuery::default()
    };
    let rows: Vec<CampaignRecord> = filter_and_sort(&data, &query).into_iter().cloned().collect();
    let csv = to_csv(&rows).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.count(), rows.len());
}
