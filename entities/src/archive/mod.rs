use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref ENTRY_NAME_REGEX: Regex =
        Regex::new(r"^prefs(\d{4}-\d{2}-\d{2})\.json$").expect("ENTRY_NAME_REGEX to compile");
}

/// Name of the archive entry holding the snapshot for `date`, e.g. `prefs2020-03-06.json`.
pub fn entry_name(date: NaiveDate) -> String {
    format!("prefs{}.json", date.format(DATE_FORMAT))
}

/// Inverse of [`entry_name`]. Names that do not follow the convention yield `None`.
pub fn date_from_entry_name(name: &str) -> Option<NaiveDate> {
    let captures = ENTRY_NAME_REGEX.captures(name)?;
    NaiveDate::parse_from_str(captures.get(1)?.as_str(), DATE_FORMAT).ok()
}
