use rankbook_core::records_for_day;
use rankbook_source::{load_records, parse_day, SourceError};
use tempfile::TempDir;

#[tokio::test]
async fn loads_file_and_filters_one_day() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ranks.csv");
    std::fs::write(
        &path,
        "keyword,date,rank,url\n\
         shoes,2024-01-01 07:00,4,https://a\n\
         shoes,2024-01-02 07:00,3,https://a\n\
         boots,2024-01-02,12,\n",
    )
    .unwrap();

    let records = load_records(&path).await.unwrap();
    assert_eq!(records.len(), 3);

    let today = records_for_day(&records, parse_day("2024-01-02").unwrap());
    let keywords: Vec<_> = today.iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["shoes", "boots"]);
    assert_eq!(today[0].ranking_url, "https://a");
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_records(dir.path().join("absent.csv")).await.unwrap_err();
    assert!(matches!(err, SourceError::IoError(_)));
}

#[tokio::test]
async fn header_only_file_yields_no_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "日時,キーワード,順位\n").unwrap();
    assert!(load_records(&path).await.unwrap().is_empty());
}
