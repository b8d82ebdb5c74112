use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
/// TokyoTZDateTime stores the time as `DateTime<UTC>` for easier serialization
/// and deserialization. The upstream feeds publish on Japanese calendar days,
/// so every "today" in the importer is resolved through this type.
pub struct TokyoTZDateTime(DateTime<Utc>);

impl TokyoTZDateTime {
    pub fn now() -> Self {
        TokyoTZDateTime(Utc::now())
    }

    pub fn today() -> NaiveDate {
        Self::now().date()
    }

    /// Calendar date as observed in Tokyo, not in UTC.
    pub fn date(&self) -> NaiveDate {
        self.to_date_time().date_naive()
    }

    pub fn to_date_time(&self) -> DateTime<Tz> {
        Tokyo.from_utc_datetime(&self.0.naive_utc())
    }
}

impl From<DateTime<Utc>> for TokyoTZDateTime {
    fn from(data: DateTime<Utc>) -> TokyoTZDateTime {
        TokyoTZDateTime(data)
    }
}

#[cfg(test)]
mod tests {
    use super::TokyoTZDateTime;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_date_rolls_over_at_midnight_in_tokyo() {
        let before_midnight = Utc.with_ymd_and_hms(2020, 3, 5, 14, 59, 59).unwrap();
        let after_midnight = Utc.with_ymd_and_hms(2020, 3, 5, 15, 0, 0).unwrap();

        assert_eq!(
            TokyoTZDateTime::from(before_midnight).date(),
            NaiveDate::from_ymd_opt(2020, 3, 5).unwrap()
        );
        assert_eq!(
            TokyoTZDateTime::from(after_midnight).date(),
            NaiveDate::from_ymd_opt(2020, 3, 6).unwrap()
        );
    }
}
