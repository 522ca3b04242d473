//! Known differences between a document's URL date and its actual date.
//!
//! Some statements were published under a URL dated after (or before) the
//! meeting they belong to, and some early minutes carry the first day of a
//! two-day meeting. Both are fixed with a static lookup.

use chrono::NaiveDate;

use fomc_shared::CollectionType;

/// `(observed, corrected)` as `(year, month, day)` triples.
type Correction = ((i32, u32, u32), (i32, u32, u32));

const STATEMENT_CORRECTIONS: &[Correction] = &[
    ((2019, 10, 11), (2019, 10, 4)),
    ((2007, 6, 18), (2007, 6, 28)),
    ((2007, 8, 17), (2007, 8, 16)),
    ((2008, 1, 22), (2008, 1, 21)),
    ((2008, 3, 11), (2008, 3, 10)),
    ((2008, 10, 8), (2008, 10, 7)),
];

const MINUTES_CORRECTIONS: &[Correction] = &[
    ((1996, 1, 30), (1996, 1, 31)),
    ((1996, 7, 2), (1996, 7, 3)),
    ((1997, 2, 4), (1997, 2, 5)),
    ((1997, 7, 1), (1997, 7, 2)),
    ((1998, 2, 3), (1998, 2, 4)),
    ((1998, 6, 30), (1998, 7, 1)),
    ((1999, 2, 2), (1999, 2, 3)),
    ((1999, 6, 29), (1999, 6, 30)),
];

fn table(collection: CollectionType) -> &'static [Correction] {
    match collection {
        CollectionType::Statement => STATEMENT_CORRECTIONS,
        CollectionType::Minutes => MINUTES_CORRECTIONS,
        _ => &[],
    }
}

/// Corrected date for a document of `collection` observed on `observed`.
pub fn correct(collection: CollectionType, observed: NaiveDate) -> NaiveDate {
    table(collection)
        .iter()
        .find(|((y, m, d), _)| NaiveDate::from_ymd_opt(*y, *m, *d) == Some(observed))
        .and_then(|(_, (y, m, d))| NaiveDate::from_ymd_opt(*y, *m, *d))
        .unwrap_or(observed)
}
