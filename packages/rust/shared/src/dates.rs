//! Date extraction from document URLs and listing text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{FomcError, Result};

/// Format of dates rendered from URL digits (`YYYY-M-DD` or `YYYY-MM-DD`).
const URL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render the first 8 consecutive digits of `link` as a date string.
///
/// A month tens digit of `0` renders the month as a single digit, so
/// `20190605` gives `2019-6-05` and `20191011` gives `2019-10-11`.
pub fn url_date_string(link: &str) -> Result<String> {
    static DIGITS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[0-9]{8}").expect("valid regex"));

    let digits = DIGITS_RE
        .find(link)
        .ok_or_else(|| FomcError::date_format(link, "8 consecutive digits"))?
        .as_str();

    let (year, month, day) = (&digits[..4], &digits[4..6], &digits[6..]);
    let month = month.strip_prefix('0').unwrap_or(month);
    Ok(format!("{year}-{month}-{day}"))
}

/// Extract the document date embedded in a URL.
pub fn date_from_link(link: &str) -> Result<NaiveDate> {
    let rendered = url_date_string(link)?;
    parse_date(&rendered, URL_DATE_FORMAT)
}

/// Parse `input` with a chrono format string, mapping failures to
/// [`FomcError::DateFormat`].
pub fn parse_date(input: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, format).map_err(|_| FomcError::date_format(input, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_single_digit_month() {
        assert_eq!(
            url_date_string("/monetarypolicy/fomcminutes20190605.htm").unwrap(),
            "2019-6-05"
        );
        assert_eq!(
            url_date_string("/newsevents/pressreleases/monetary20191011a.htm").unwrap(),
            "2019-10-11"
        );
    }

    #[test]
    fn extracts_date_from_statement_link() {
        let date = date_from_link("/newsevents/pressreleases/monetary20191011a.htm").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 10, 11).unwrap());

        let date = date_from_link("/fomc/MINUTES/1994/19940517min.htm").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1994, 5, 17).unwrap());
    }

    #[test]
    fn first_eight_digits_win() {
        // The directory year is only 4 digits, so the file name supplies the date.
        let date = date_from_link("/boarddocs/speeches/2005/20051128/default.htm").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2005, 11, 28).unwrap());
    }

    #[test]
    fn missing_or_invalid_digits_are_date_errors() {
        assert!(matches!(
            date_from_link("/newsevents/speech/index.htm"),
            Err(FomcError::DateFormat { .. })
        ));
        assert!(matches!(
            date_from_link("/files/FOMC20191399meeting.pdf"),
            Err(FomcError::DateFormat { .. })
        ));
    }

    #[test]
    fn parses_long_form_dates() {
        let date = parse_date("April 20, 2005", "%B %d, %Y").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2005, 4, 20).unwrap());
        assert!(parse_date("20 April 2005", "%B %d, %Y").is_err());
    }
}
