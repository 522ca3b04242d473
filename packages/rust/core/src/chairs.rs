//! Fed chairs by tenure, for collections whose speaker is the sitting chair.

use std::sync::LazyLock;

use chrono::NaiveDate;

/// Returned for dates outside every known tenure.
pub const UNKNOWN_CHAIR: &str = "otro";

/// One chair's term of office.
#[derive(Debug, Clone)]
pub struct ChairTenure {
    pub surname: &'static str,
    pub first_name: &'static str,
    pub from: NaiveDate,
    pub to: NaiveDate,
    display: String,
}

impl ChairTenure {
    fn new(surname: &'static str, first_name: &'static str, from: &str, to: &str) -> Self {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid tenure date");
        Self {
            surname,
            first_name,
            from: date(from),
            to: date(to),
            display: format!("{first_name} {surname}"),
        }
    }

    /// Whether `date` falls strictly inside the tenure. Both bounds are
    /// exclusive, so the first and last day resolve to nobody.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from < date && date < self.to
    }

    /// `"First Surname"`
    pub fn name(&self) -> &str {
        &self.display
    }
}

static TENURES: LazyLock<Vec<ChairTenure>> = LazyLock::new(|| {
    vec![
        ChairTenure::new("Greenspan", "Alan", "1987-08-11", "2006-01-31"),
        ChairTenure::new("Bernanke", "Ben", "2006-02-01", "2014-01-31"),
        ChairTenure::new("Yellen", "Janet", "2014-02-03", "2018-02-03"),
        ChairTenure::new("Powell", "Jerome", "2018-02-05", "2022-02-05"),
    ]
});

/// All known tenures, oldest first.
pub fn tenures() -> &'static [ChairTenure] {
    &TENURES
}

/// Name of the chair sitting on `date`, or [`UNKNOWN_CHAIR`].
pub fn resolve(date: NaiveDate) -> &'static str {
    TENURES
        .iter()
        .find(|t| t.contains(date))
        .map_or(UNKNOWN_CHAIR, |t| t.name())
}
