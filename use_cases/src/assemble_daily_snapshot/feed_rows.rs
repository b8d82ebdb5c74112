use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, Trim};
use entities::feeds::FeedKind;
use entities::prefectures::Prefecture;
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// A line of feed content selected for the feed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFeedRow {
    pub line: u64,
    pub region_key: String,
    /// Raw value fields; each feed parses only the column it reads.
    pub values: Vec<String>,
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("malformed row: {0}")]
    MalformedRow(String),
    #[error("unknown region key {0:?}")]
    UnknownRegionKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Selected(DailyFeedRow),
    Skipped(SkippedRow),
}

/// Feeds write dates as `YYYY/M/D` without zero padding.
pub fn feed_date_token(feed_date: NaiveDate) -> String {
    feed_date.format("%Y/%-m/%-d").to_string()
}

/// Picks the lines whose first field is exactly `feed_date`. Lines for other
/// dates, including the header, are not reported at all.
pub fn select_rows(content: &str, feed_date: NaiveDate) -> Vec<RowOutcome> {
    let token = feed_date_token(feed_date);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut record = ByteRecord::new();
    let mut outcomes = vec![];
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                if record.get(0) != Some(token.as_bytes()) {
                    continue;
                }
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                outcomes.push(parse_row(&record, line));
            }
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or_default();
                outcomes.push(RowOutcome::Skipped(SkippedRow {
                    line,
                    reason: SkipReason::MalformedRow(err.to_string()),
                }));
                if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                    break;
                }
            }
        }
    }
    outcomes
}

fn parse_row(record: &ByteRecord, line: u64) -> RowOutcome {
    let parsed = || -> Result<DailyFeedRow, String> {
        if record.len() < 3 {
            return Err(format!("expected at least 3 fields, found {}", record.len()));
        }
        let region_key = std::str::from_utf8(&record[1])
            .map_err(|err| format!("region key is not UTF-8: {err}"))?
            .to_string();
        let values = record
            .iter()
            .skip(2)
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        Ok(DailyFeedRow {
            line,
            region_key,
            values,
        })
    };

    match parsed() {
        Ok(row) => RowOutcome::Selected(row),
        Err(message) => RowOutcome::Skipped(SkippedRow {
            line,
            reason: SkipReason::MalformedRow(message),
        }),
    }
}

/// Values of one feed for one date, keyed by the romanized region key. A key
/// that is absent means the value is unknown.
#[derive(Debug, Default)]
pub struct FeedSnapshot {
    values: HashMap<&'static str, i64>,
}

impl FeedSnapshot {
    pub fn build(feed: FeedKind, outcomes: Vec<RowOutcome>) -> (Self, Vec<SkippedRow>) {
        let column = feed.value_column();
        let mut snapshot = FeedSnapshot::default();
        let mut skipped = vec![];

        for outcome in outcomes {
            let row = match outcome {
                RowOutcome::Selected(row) => row,
                RowOutcome::Skipped(skip) => {
                    skipped.push(skip);
                    continue;
                }
            };
            let Some(field) = row.values.get(column) else {
                skipped.push(SkippedRow {
                    line: row.line,
                    reason: SkipReason::MalformedRow(format!(
                        "{feed} reads value column {column}, row has {} value(s)",
                        row.values.len()
                    )),
                });
                continue;
            };
            let Ok(value) = field.parse::<i64>() else {
                skipped.push(SkippedRow {
                    line: row.line,
                    reason: SkipReason::MalformedRow(format!(
                        "{feed} value {field:?} is not an integer"
                    )),
                });
                continue;
            };
            let Some(prefecture) = Prefecture::by_romanized(&row.region_key) else {
                skipped.push(SkippedRow {
                    line: row.line,
                    reason: SkipReason::UnknownRegionKey(row.region_key),
                });
                continue;
            };
            snapshot.values.insert(prefecture.romanized(), value);
        }

        (snapshot, skipped)
    }

    pub fn get(&self, prefecture: &Prefecture) -> Option<i64> {
        self.values.get(prefecture.romanized()).copied()
    }

    /// True when no row for the feed date produced a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        feed_date_token, select_rows, DailyFeedRow, FeedSnapshot, RowOutcome, SkipReason,
        SkippedRow,
    };
    use chrono::NaiveDate;
    use entities::feeds::FeedKind;
    use entities::prefectures::Prefecture;
    use rstest::rstest;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    #[rstest]
    #[case(march(5), "2020/3/5")]
    #[case(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(), "2021/12/31")]
    #[case(NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(), "2022/1/10")]
    fn test_feed_date_token_is_not_zero_padded(#[case] date: NaiveDate, #[case] token: &str) {
        assert_eq!(feed_date_token(date), token);
    }

    #[test]
    fn test_only_rows_of_the_feed_date_are_selected() {
        let content = "Date,Prefecture,Deaths\n\
                       2020/3/4,Tokyo,1\n\
                       2020/3/5,ALL,7\n\
                       2020/3/5,Tokyo,3\n\
                       2020/3/15,Tokyo,9\n";

        let outcomes = select_rows(content, march(5));

        assert_eq!(
            outcomes,
            vec![
                RowOutcome::Selected(DailyFeedRow {
                    line: 3,
                    region_key: "ALL".to_string(),
                    values: vec!["7".to_string()],
                }),
                RowOutcome::Selected(DailyFeedRow {
                    line: 4,
                    region_key: "Tokyo".to_string(),
                    values: vec!["3".to_string()],
                }),
            ]
        );
    }

    #[test]
    fn test_crlf_content_and_padding_spaces_are_tolerated() {
        let outcomes = select_rows("2020/3/5, Osaka ,10, 2\r\n", march(5));

        assert_eq!(
            outcomes,
            vec![RowOutcome::Selected(DailyFeedRow {
                line: 1,
                region_key: "Osaka".to_string(),
                values: vec!["10".to_string(), "2".to_string()],
            })]
        );
    }

    #[rstest]
    #[case("2020/3/5")]
    #[case("2020/3/5,Tokyo")]
    fn test_rows_without_a_value_field_are_skipped(#[case] content: &str) {
        let outcomes = select_rows(content, march(5));

        assert!(matches!(
            outcomes.as_slice(),
            [RowOutcome::Skipped(SkippedRow {
                line: 1,
                reason: SkipReason::MalformedRow(_)
            })]
        ));
    }

    #[test]
    fn test_snapshot_reads_the_designated_column() {
        let content = "2020/3/5,Tokyo,10,2\n2020/3/5,Osaka,4,1\n";

        let (hospitalizations, _) =
            FeedSnapshot::build(FeedKind::Hospitalizations, select_rows(content, march(5)));
        let (discharges, _) =
            FeedSnapshot::build(FeedKind::Discharges, select_rows(content, march(5)));

        let tokyo = Prefecture::by_romanized("Tokyo").unwrap();
        let osaka = Prefecture::by_romanized("Osaka").unwrap();
        assert_eq!(hospitalizations.get(tokyo), Some(10));
        assert_eq!(discharges.get(tokyo), Some(2));
        assert_eq!(discharges.get(osaka), Some(1));
    }

    #[test]
    fn test_missing_value_column_and_unknown_regions_are_reported() {
        let content = "2020/3/5,Tokyo,10\n2020/3/5,Mars,5,5\n2020/3/5,Osaka,4,1\n";

        let (snapshot, skipped) =
            FeedSnapshot::build(FeedKind::Discharges, select_rows(content, march(5)));

        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0].reason, SkipReason::MalformedRow(_)));
        assert_eq!(
            skipped[1],
            SkippedRow {
                line: 2,
                reason: SkipReason::UnknownRegionKey("Mars".to_string()),
            }
        );
        assert_eq!(snapshot.get(Prefecture::by_romanized("Tokyo").unwrap()), None);
        assert_eq!(snapshot.get(Prefecture::by_romanized("Osaka").unwrap()), Some(1));
    }

    #[rstest]
    #[case("2020/3/5,Tokyo,")]
    #[case("2020/3/5,Tokyo,many")]
    #[case("2020/3/5,Tokyo,1.5")]
    fn test_non_integer_values_are_skipped(#[case] content: &str) {
        let (snapshot, skipped) =
            FeedSnapshot::build(FeedKind::Deaths, select_rows(content, march(5)));

        assert!(snapshot.is_empty());
        assert!(matches!(
            skipped.as_slice(),
            [SkippedRow {
                line: 1,
                reason: SkipReason::MalformedRow(_)
            }]
        ));
    }

    #[test]
    fn test_bad_value_only_blanks_the_feed_reading_it() {
        let content = "2020/3/5,Tokyo,10,x\n";
        let tokyo = Prefecture::by_romanized("Tokyo").unwrap();

        let (hospitalizations, kept) =
            FeedSnapshot::build(FeedKind::Hospitalizations, select_rows(content, march(5)));
        let (discharges, skipped) =
            FeedSnapshot::build(FeedKind::Discharges, select_rows(content, march(5)));

        assert_eq!(hospitalizations.get(tokyo), Some(10));
        assert!(kept.is_empty());
        assert_eq!(discharges.get(tokyo), None);
        assert!(matches!(skipped[0].reason, SkipReason::MalformedRow(_)));
    }

    #[test]
    fn test_negative_values_and_trailing_empty_fields_are_read() {
        let content = "2020/3/5,Tokyo,10,-2,\n";
        let tokyo = Prefecture::by_romanized("Tokyo").unwrap();

        let (hospitalizations, _) =
            FeedSnapshot::build(FeedKind::Hospitalizations, select_rows(content, march(5)));
        let (discharges, skipped) =
            FeedSnapshot::build(FeedKind::Discharges, select_rows(content, march(5)));

        assert_eq!(hospitalizations.get(tokyo), Some(10));
        assert_eq!(discharges.get(tokyo), Some(-2));
        assert!(skipped.is_empty());
    }
}
