use crate::prefectures::Prefecture;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Merged figures for one prefecture on one date. `None` means the value was
/// not available from its feed, which is different from a reported zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub pref: String,
    pub patients: Option<i64>,
    pub hospitalizations: Option<i64>,
    pub discharges: Option<i64>,
    pub mortality: Option<i64>,
    pub severe: Option<i64>,
    /// No feed publishes PCR test counts yet; always 0.
    pub pcr_tests: u64,
}

impl RegionRecord {
    pub fn new(prefecture: &Prefecture) -> Self {
        Self {
            pref: prefecture.native().to_string(),
            patients: None,
            hospitalizations: None,
            discharges: None,
            mortality: None,
            severe: None,
            pcr_tests: 0,
        }
    }

    /// True when no feed reported any figure for this prefecture.
    pub fn is_unknown(&self) -> bool {
        self.patients.is_none()
            && self.hospitalizations.is_none()
            && self.discharges.is_none()
            && self.mortality.is_none()
            && self.severe.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub prefs: Vec<RegionRecord>,
}

impl DailySnapshot {
    pub fn record(&self, native_name: &str) -> Option<&RegionRecord> {
        self.prefs.iter().find(|record| record.pref == native_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{DailySnapshot, RegionRecord};
    use crate::prefectures::Prefecture;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_record_is_unknown_until_a_figure_is_set() {
        let tokyo = Prefecture::by_romanized("Tokyo").unwrap();

        assert!(RegionRecord::new(tokyo).is_unknown());
        assert!(!RegionRecord {
            severe: Some(0),
            ..RegionRecord::new(tokyo)
        }
        .is_unknown());
    }

    #[test]
    fn test_unknown_values_serialize_as_null() {
        let tokyo = Prefecture::by_romanized("Tokyo").unwrap();
        let record = RegionRecord {
            patients: Some(100),
            ..RegionRecord::new(tokyo)
        };
        let snapshot = DailySnapshot {
            date: NaiveDate::from_ymd_opt(2020, 3, 6).unwrap(),
            prefs: vec![record],
        };

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "date": "2020-03-06",
                "prefs": [{
                    "pref": "東京都",
                    "patients": 100,
                    "hospitalizations": null,
                    "discharges": null,
                    "mortality": null,
                    "severe": null,
                    "pcr_tests": 0
                }]
            })
        );
    }
}
