use data_forensics::ingestion::csv::{load_csv_from_path, load_csv_from_reader};
use data_forensics::ingestion::{load_from_path, LoadFormat, LoadOptions, LoadRequest};
use data_forensics::selection::{Scope, SelectionKey};
use data_forensics::statistics::NGramOptions;
use data_forensics::table::ROW_INDEX_ID;
use data_forensics::types::{ColumnKind, Value};

#[test]
fn load_csv_from_path_happy_path() {
    let cols = load_csv_from_path("tests/fixtures/ledger.csv", b',').unwrap();

    let labels: Vec<&str> = cols.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["invoice", "amount", "vendor", "region"]);
    assert!(cols.iter().all(|(_, v)| v.len() == 14));
    assert_eq!(cols[1].1[0].value(), &Value::from("120.50"));
}

#[test]
fn load_csv_from_reader_accepts_custom_delimiter() {
    let input = "amount;vendor\n1,5;acme\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(input.as_bytes());

    let cols = load_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(cols[0].1[0].value(), &Value::from("1,5"));
}

#[test]
fn load_from_path_infers_column_kinds() {
    let table = load_from_path("tests/fixtures/ledger.csv", &LoadOptions::default()).unwrap();

    assert_eq!(table.len(), 14);
    assert_eq!(table.column_ids(), vec![ROW_INDEX_ID, "invoice", "amount", "vendor", "region"]);
    assert_eq!(table.kind_of(ROW_INDEX_ID), Some(ColumnKind::Numeric));
    assert_eq!(table.kind_of("invoice"), Some(ColumnKind::Label));
    assert_eq!(table.kind_of("amount"), Some(ColumnKind::Numeric));
    assert_eq!(table.kind_of("vendor"), Some(ColumnKind::Categorical));
    assert_eq!(table.kind_of("region"), Some(ColumnKind::Categorical));
    assert!(table.numeric("vendor").is_none());
}

#[test]
fn loaded_amounts_feed_all_four_statistics() {
    let table = load_from_path("tests/fixtures/ledger.csv", &LoadOptions::default()).unwrap();
    let amount = table.numeric("amount").unwrap();

    let dups = amount.duplicate_counts();
    assert_eq!(dups[0], (Value::from("120.50"), 3));
    assert_eq!(dups[1], (Value::from("34.10"), 1));
    assert_eq!(dups.iter().map(|(_, c)| c).sum::<usize>(), 14);

    assert_eq!(amount.replicate_histogram(), vec![(3, 1)]);

    let digits = amount.leading_digits();
    assert_eq!(digits.count('1'), 5);
    assert_eq!(digits.count('4'), 2);
    assert_eq!(digits.with_digit(), 14);

    let grams = amount.ngram_frequencies(NGramOptions { n: 2, lsd: true });
    assert_eq!(
        &grams[..4],
        &[
            (".50".to_string(), 3),
            (".10".to_string(), 2),
            (".00".to_string(), 2),
            (".99".to_string(), 2),
        ]
    );
}

#[test]
fn ngram_ignore_counts_rows_per_column() {
    let mut table = load_from_path("tests/fixtures/ledger.csv", &LoadOptions::default()).unwrap();
    table.ignore(&Scope::Global, SelectionKey::ngram(".50")).unwrap();

    assert_eq!(table.ignored_row_count("amount"), Some(3));
    assert_eq!(table.ignored_row_count(ROW_INDEX_ID), Some(0));
    let amount = table.numeric("amount").unwrap();
    assert_eq!(amount.duplicate_counts()[0], (Value::from("34.10"), 1));
}

#[test]
fn tsv_loads_without_index_column() {
    let opts = LoadOptions {
        index_column: false,
        ..Default::default()
    };
    let table = load_from_path("tests/fixtures/ledger.tsv", &opts).unwrap();
    assert_eq!(table.column_ids(), vec!["invoice", "amount"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn forced_format_overrides_extension() {
    let opts = LoadOptions {
        format: Some(LoadFormat::Tsv),
        ..Default::default()
    };
    let table = LoadRequest::new("tests/fixtures/ledger.tsv", opts).run().unwrap();
    assert_eq!(table.columns().len(), 3);
}

#[test]
fn ragged_csv_is_rejected() {
    let err = load_from_path("tests/fixtures/ragged.csv", &LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("csv error"));
}
