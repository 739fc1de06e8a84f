//! Analysis Service - the twelve questions over the flat table
//!
//! Everything here reads the table only. Cells are compared through their
//! persisted text form so a freshly built table and one read back from disk
//! give the same answers. Ties are broken deterministically: alphabetical for
//! names, earliest for months, first row for dates.

use chrono::{Datelike, Month, NaiveDate};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::domain::{Cell, DomainError, Table};
use crate::modules::publishers::canonical_publisher;
use crate::utils::dates::parse_publish_date;

const TITLE: &str = "title";
const AUTHORS: &str = "authors";
const PUBLISHERS: &str = "publishers";
const GOODREADS: &str = "identifiers_goodreads";
const PAGES: &str = "number_of_pages";
const PUBLISH_DATE: &str = "publish_date";
const EXCERPTS: &str = "excerpts";

pub const PUBLISHER_COUNTS_FILE: &str = "publishers_counts.csv";
pub const PUBLISHER_COUNTS_MAPPED_FILE: &str = "publishers_counts_mapped.csv";

/// Books per publisher, sorted by count descending then name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublisherCounts {
    /// Lowercased, trimmed names as they appear
    pub raw: Vec<(String, usize)>,
    /// After folding synonyms onto canonical names
    pub mapped: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongestWord {
    pub word: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestBook {
    pub title: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorSecondBook {
    pub author: String,
    /// `None` when the author has fewer than two rows
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublisherAuthorPair {
    pub publisher: String,
    pub author: String,
    pub books: usize,
}

/// Answers to the twelve questions
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub distinct_titles: usize,
    pub most_isbns: Option<(String, usize)>,
    pub missing_goodreads: usize,
    pub multi_author_books: usize,
    pub publishers: PublisherCounts,
    pub median_pages: Option<f64>,
    pub top_month: Option<(u32, usize)>,
    pub longest_word: Option<LongestWord>,
    pub latest_book: Option<LatestBook>,
    pub latest_year: Option<i32>,
    pub second_book: Option<AuthorSecondBook>,
    pub top_pair: Option<PublisherAuthorPair>,
}

pub fn analyze(table: &Table) -> Report {
    let dates: Vec<Option<NaiveDate>> = (0..table.len())
        .map(|row| text(table.cell(row, PUBLISH_DATE)).and_then(|s| parse_publish_date(&s)))
        .collect();

    let latest_book = latest_book(table, &dates);
    let latest_year = latest_book.as_ref().map(|b| b.date.year());

    Report {
        distinct_titles: distinct_titles(table),
        most_isbns: most_isbns(table),
        missing_goodreads: missing_goodreads(table),
        multi_author_books: multi_author_books(table),
        publishers: publisher_counts(table),
        median_pages: median_pages(table),
        top_month: top_month(&dates),
        longest_word: longest_word(table),
        latest_book,
        latest_year,
        second_book: second_book_of_top_author(table, &dates),
        top_pair: top_publisher_author_pair(table),
    }
}

/// Persisted text form; `None` for missing or empty
fn text(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Trimmed, non-empty parts of a `"; "`-joined cell
fn split_list(cell: &Cell) -> Vec<String> {
    text(cell)
        .map(|s| {
            s.split(';')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Highest count, first key in order on ties
fn top_entry<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Option<(K, usize)> {
    let mut best: Option<(&K, usize)> = None;
    for (key, &count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((key, count));
        }
    }
    best.map(|(key, count)| (key.clone(), count))
}

fn sorted_counts(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps names alphabetical within a count
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

fn distinct_titles(table: &Table) -> usize {
    table
        .column(TITLE)
        .into_iter()
        .filter_map(text)
        .collect::<BTreeSet<_>>()
        .len()
}

fn most_isbns(table: &Table) -> Option<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for title in table.column(TITLE).into_iter().filter_map(text) {
        *counts.entry(title).or_insert(0) += 1;
    }
    top_entry(&counts)
}

fn missing_goodreads(table: &Table) -> usize {
    table
        .column(GOODREADS)
        .into_iter()
        .filter(|cell| cell.is_blank())
        .count()
}

fn multi_author_books(table: &Table) -> usize {
    table
        .column(AUTHORS)
        .into_iter()
        .filter_map(text)
        .filter(|authors| authors.contains(';'))
        .count()
}

fn publisher_counts(table: &Table) -> PublisherCounts {
    let mut raw: BTreeMap<String, usize> = BTreeMap::new();
    let mut mapped: BTreeMap<String, usize> = BTreeMap::new();

    for cell in table.column(PUBLISHERS) {
        for publisher in split_list(cell) {
            let lowered = publisher.to_lowercase();
            *mapped.entry(canonical_publisher(&lowered)).or_insert(0) += 1;
            *raw.entry(lowered).or_insert(0) += 1;
        }
    }

    PublisherCounts {
        raw: sorted_counts(raw),
        mapped: sorted_counts(mapped),
    }
}

fn median_pages(table: &Table) -> Option<f64> {
    let mut pages: Vec<f64> = table
        .column(PAGES)
        .into_iter()
        .filter_map(Cell::as_f64)
        .collect();
    if pages.is_empty() {
        return None;
    }
    pages.sort_by(f64::total_cmp);
    let mid = pages.len() / 2;
    if pages.len() % 2 == 0 {
        Some((pages[mid - 1] + pages[mid]) / 2.0)
    } else {
        Some(pages[mid])
    }
}

fn top_month(dates: &[Option<NaiveDate>]) -> Option<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for date in dates.iter().flatten() {
        *counts.entry(date.month()).or_insert(0) += 1;
    }
    top_entry(&counts)
}

/// Text of the first excerpt. `None` means the cell is unusable and the
/// record is skipped.
fn excerpt_text(raw: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let entry = match &parsed {
        Value::Array(items) => match items.first() {
            Some(first) => first.as_object()?,
            None => return Some(String::new()),
        },
        Value::Object(map) => map,
        _ => return Some(String::new()),
    };
    match entry.get("text") {
        None => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => None,
    }
}

fn longest_word(table: &Table) -> Option<LongestWord> {
    let mut best: Option<LongestWord> = None;
    let mut best_len = 0;

    for row in 0..table.len() {
        let Some(raw) = text(table.cell(row, EXCERPTS)) else {
            continue;
        };
        let Some(excerpt) = excerpt_text(&raw) else {
            tracing::debug!("Skipping unparsable excerpt in row {}", row);
            continue;
        };

        for word in excerpt.split_whitespace() {
            let word = word.trim_matches(|c: char| c.is_ascii_punctuation());
            let len = word.chars().count();
            if len > best_len {
                best_len = len;
                best = Some(LongestWord {
                    word: word.to_string(),
                    title: text(table.cell(row, TITLE)),
                });
            }
        }
    }

    best
}

fn latest_book(table: &Table, dates: &[Option<NaiveDate>]) -> Option<LatestBook> {
    let mut latest: Option<(usize, NaiveDate)> = None;
    for (row, date) in dates.iter().enumerate() {
        if let Some(date) = *date
            && latest.is_none_or(|(_, best)| date > best)
        {
            latest = Some((row, date));
        }
    }
    latest.map(|(row, date)| LatestBook {
        title: text(table.cell(row, TITLE)),
        date,
    })
}

fn second_book_of_top_author(
    table: &Table,
    dates: &[Option<NaiveDate>],
) -> Option<AuthorSecondBook> {
    let mut titles: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for row in 0..table.len() {
        let title = text(table.cell(row, TITLE));
        for author in split_list(table.cell(row, AUTHORS)) {
            let author_titles = titles.entry(author.clone()).or_default();
            if let Some(title) = &title {
                author_titles.insert(title.clone());
            }
            rows.entry(author).or_default().push(row);
        }
    }

    let counts: BTreeMap<String, usize> = titles
        .into_iter()
        .map(|(author, set)| (author, set.len()))
        .collect();
    let (author, _) = top_entry(&counts)?;

    let mut author_rows = rows.remove(&author).unwrap_or_default();
    // Undated rows sort last; stable sort keeps row order otherwise
    author_rows.sort_by_key(|&row| (dates[row].is_none(), dates[row]));

    let title = author_rows
        .get(1)
        .and_then(|&row| text(table.cell(row, TITLE)));

    Some(AuthorSecondBook { author, title })
}

fn top_publisher_author_pair(table: &Table) -> Option<PublisherAuthorPair> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for row in 0..table.len() {
        let authors = split_list(table.cell(row, AUTHORS));
        for publisher in split_list(table.cell(row, PUBLISHERS)) {
            for author in &authors {
                *counts.entry((publisher.clone(), author.clone())).or_insert(0) += 1;
            }
        }
    }
    top_entry(&counts).map(|((publisher, author), books)| PublisherAuthorPair {
        publisher,
        author,
        books,
    })
}

/// Write both publisher count tables into `dir`
pub fn export_publisher_counts(counts: &PublisherCounts, dir: &Path) -> Result<(), DomainError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| DomainError::Export(format!("Failed to create {}: {}", dir.display(), e)))?;

    write_counts(&counts.raw, "books_published", &dir.join(PUBLISHER_COUNTS_FILE))?;
    write_counts(
        &counts.mapped,
        "books_published_mapped",
        &dir.join(PUBLISHER_COUNTS_MAPPED_FILE),
    )?;
    Ok(())
}

fn write_counts(counts: &[(String, usize)], header: &str, path: &Path) -> Result<(), DomainError> {
    let export_err = |e: csv::Error| DomainError::Export(format!("{}: {}", path.display(), e));

    let mut wtr = csv::Writer::from_path(path).map_err(export_err)?;
    wtr.write_record(["publisher", header]).map_err(export_err)?;
    for (publisher, count) in counts {
        let count = count.to_string();
        wtr.write_record([publisher.as_str(), count.as_str()])
            .map_err(export_err)?;
    }
    wtr.flush()
        .map_err(|e| DomainError::Export(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Wrote {} publishers to {}", counts.len(), path.display());
    Ok(())
}

fn or_unknown(title: &Option<String>) -> &str {
    title.as_deref().unwrap_or("unknown title")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There are {} different books in the list", self.distinct_titles)?;

        match &self.most_isbns {
            Some((title, count)) => writeln!(
                f,
                "The book with the most different ISBNs is '{}' with {} editions.",
                title, count
            )?,
            None => writeln!(f, "No titles available to count ISBNs per book.")?,
        }

        writeln!(f, "There are {} books without a Goodreads ID.", self.missing_goodreads)?;
        writeln!(
            f,
            "There are {} books with more than one author.",
            self.multi_author_books
        )?;

        match self.publishers.mapped.first() {
            Some((publisher, count)) => writeln!(
                f,
                "There are {} publishers ({} before merging name variants); '{}' published the most with {} books.",
                self.publishers.mapped.len(),
                self.publishers.raw.len(),
                publisher,
                count
            )?,
            None => writeln!(f, "No publishers available.")?,
        }

        match self.median_pages {
            Some(median) => writeln!(f, "The median number of pages is {:.1}.", median)?,
            None => writeln!(f, "No page counts available.")?,
        }

        match self.top_month.and_then(|(m, c)| Some((Month::try_from(m as u8).ok()?, c))) {
            Some((month, count)) => writeln!(
                f,
                "The month with the most published books is {} with {} books.",
                month.name(),
                count
            )?,
            None => writeln!(f, "No publish dates available.")?,
        }

        match &self.longest_word {
            Some(found) => writeln!(
                f,
                "The longest word is '{}' It appears in the book titled '{}'",
                found.word,
                or_unknown(&found.title)
            )?,
            None => writeln!(f, "No excerpt words available.")?,
        }

        match &self.latest_book {
            Some(book) => writeln!(
                f,
                "The last book published is '{}' on {}.",
                or_unknown(&book.title),
                book.date.format("%Y-%m-%d")
            )?,
            None => writeln!(f, "No publish dates available.")?,
        }

        match self.latest_year {
            Some(year) => writeln!(f, "The year of the most updated entry is {}.", year)?,
            None => writeln!(f, "No publish dates available.")?,
        }

        match &self.second_book {
            Some(AuthorSecondBook {
                author,
                title: Some(title),
            }) => writeln!(f, "The second published book for '{}' is '{}'.", author, title)?,
            Some(AuthorSecondBook { author, title: None }) => writeln!(
                f,
                "'{}' has no second published book in the list.",
                author
            )?,
            None => writeln!(f, "No authors available.")?,
        }

        match &self.top_pair {
            Some(pair) => write!(
                f,
                "The top (publisher, author) pair is ('{}', '{}') with {} books published together.",
                pair.publisher, pair.author, pair.books
            ),
            None => write!(f, "No (publisher, author) pairs available."),
        }
    }
}
