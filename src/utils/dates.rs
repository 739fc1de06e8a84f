use chrono::NaiveDate;

const FULL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Parse the free-text `publish_date` of an edition.
///
/// Accepts full dates, month and year, or a bare year. A missing day or month
/// defaults to 1. Returns `None` for anything else.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim().trim_end_matches('.').trim();
    if s.is_empty() {
        return None;
    }

    // %B also accepts abbreviated month names
    for fmt in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {}", s), "%d %B %Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Some(date);
    }

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_full_dates() {
        assert_eq!(parse_publish_date("2005-09-13"), ymd(2005, 9, 13));
        assert_eq!(parse_publish_date("October 1, 2001"), ymd(2001, 10, 1));
        assert_eq!(parse_publish_date("Oct 12, 1999"), ymd(1999, 10, 12));
        assert_eq!(parse_publish_date("12 March 2010"), ymd(2010, 3, 12));
        assert_eq!(parse_publish_date("07/04/1996"), ymd(1996, 7, 4));
    }

    #[test]
    fn test_partial_dates_default_to_first() {
        assert_eq!(parse_publish_date("March 2003"), ymd(2003, 3, 1));
        assert_eq!(parse_publish_date("Jun 1987"), ymd(1987, 6, 1));
        assert_eq!(parse_publish_date("2011-08"), ymd(2011, 8, 1));
        assert_eq!(parse_publish_date("1996"), ymd(1996, 1, 1));
        assert_eq!(parse_publish_date(" 2002. "), ymd(2002, 1, 1));
    }

    #[test]
    fn test_unparsable_dates() {
        assert_eq!(parse_publish_date(""), None);
        assert_eq!(parse_publish_date("n.d."), None);
        assert_eq!(parse_publish_date("c1999"), None);
        assert_eq!(parse_publish_date("Spring 2004"), None);
    }
}
