use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The five daily series merged into a snapshot. Each variant pins the CSV
/// document it is read from and the value column it takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FeedKind {
    ConfirmedCases,
    Hospitalizations,
    Discharges,
    Deaths,
    SevereCases,
}

impl FeedKind {
    pub fn all() -> impl Iterator<Item = FeedKind> {
        Self::iter()
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Base name of the CSV document, without extension.
    pub fn document(&self) -> &'static str {
        match self {
            FeedKind::ConfirmedCases => "confirmed_cases_cumulative_daily",
            FeedKind::Hospitalizations | FeedKind::Discharges => {
                "requiring_inpatient_care_etc_daily"
            }
            FeedKind::Deaths => "deaths_cumulative_daily",
            FeedKind::SevereCases => "severe_cases_daily",
        }
    }

    /// Index among the value columns, i.e. after the date and region fields.
    pub fn value_column(&self) -> usize {
        match self {
            FeedKind::Discharges => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FeedKind;
    use itertools::Itertools;

    #[test]
    fn test_there_are_exactly_five_feeds_with_distinct_names() {
        let names = FeedKind::all().map(|feed| feed.name()).unique().collect_vec();
        assert_eq!(
            names,
            vec![
                "confirmed_cases",
                "hospitalizations",
                "discharges",
                "deaths",
                "severe_cases"
            ]
        );
    }

    #[test]
    fn test_discharges_share_the_inpatient_document_in_the_second_column() {
        assert_eq!(
            FeedKind::Discharges.document(),
            FeedKind::Hospitalizations.document()
        );
        assert_eq!(FeedKind::Hospitalizations.value_column(), 0);
        assert_eq!(FeedKind::Discharges.value_column(), 1);
    }
}
