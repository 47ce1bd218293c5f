//! Shelf records and the reconciliation rules that govern them.
//!
//! A user's shelf holds one [`UserBook`] per catalogue volume. The functions
//! here decide what a user action does to a record without performing any
//! I/O: [`plan_exclusive_status`] implements the toggle semantics of the
//! status buttons, and [`plan_upsert`] the general status + progress update.
//! [`crate::domain::ShelfService`] loads the current record, asks these
//! functions for a decision and applies it through the store port.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Error;

/// Maximum accepted length for a [`VolumeId`].
pub const VOLUME_ID_MAX: usize = 128;

/// Validation errors for volume identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeIdValidationError {
    /// The identifier was blank.
    #[error("volume id must not be empty")]
    Empty,
    /// The identifier carried leading or trailing whitespace.
    #[error("volume id must not contain surrounding whitespace")]
    Padded,
    /// The identifier exceeds [`VOLUME_ID_MAX`] characters.
    #[error("volume id must be at most {max} characters")]
    TooLong {
        /// Maximum length.
        max: usize,
    },
    /// The identifier contains a storage path separator.
    #[error("volume id must not contain '/'")]
    PathSeparator,
}

/// Catalogue volume identifier, unique within a user's shelf.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VolumeId(String);

impl VolumeId {
    /// Validate and construct a [`VolumeId`].
    ///
    /// # Examples
    /// ```
    /// use readtrack::domain::VolumeId;
    ///
    /// assert!(VolumeId::new("zyTCAlFPjgYC").is_ok());
    /// assert!(VolumeId::new("").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, VolumeIdValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(VolumeIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(VolumeIdValidationError::Padded);
        }
        if raw.chars().count() > VOLUME_ID_MAX {
            return Err(VolumeIdValidationError::TooLong { max: VOLUME_ID_MAX });
        }
        if raw.contains('/') {
            return Err(VolumeIdValidationError::PathSeparator);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VolumeId> for String {
    fn from(value: VolumeId) -> Self {
        value.0
    }
}

impl TryFrom<String> for VolumeId {
    type Error = VolumeIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Shelf a book sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    /// Wish list.
    ToRead,
    /// Currently being read.
    Reading,
    /// Finished.
    Read,
}

impl ReadingStatus {
    /// Every status, in shelf display order.
    pub const ALL: [Self; 3] = [Self::ToRead, Self::Reading, Self::Read];

    /// Canonical wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "TO_READ",
            Self::Reading => "READING",
            Self::Read => "READ",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ReadingStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status: {0}")]
pub struct ParseReadingStatusError(String);

impl FromStr for ReadingStatus {
    type Err = ParseReadingStatusError;

    /// Accepts the wire names case-insensitively, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalised.as_str() {
            "TO_READ" | "TOREAD" => Ok(Self::ToRead),
            "READING" => Ok(Self::Reading),
            "READ" => Ok(Self::Read),
            _ => Err(ParseReadingStatusError(s.to_owned())),
        }
    }
}

/// Descriptive book data supplied when a record is first created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Book title.
    pub title: String,
    /// Authors in catalogue order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Cover thumbnail URI.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Catalogue categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Total pages, when the catalogue knows it.
    #[serde(default)]
    pub page_count: Option<u32>,
    /// ISBN-10 identifier.
    #[serde(default)]
    pub isbn10: Option<String>,
    /// ISBN-13 identifier.
    #[serde(default)]
    pub isbn13: Option<String>,
}

/// A user's relationship to one catalogue volume.
///
/// ## Invariants
/// - `page_in_reading <= page_count` whenever both are known.
/// - `status == Read` implies `page_in_reading == page_count` when the total
///   is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBook {
    /// Volume identifier; unique per shelf.
    pub id: VolumeId,
    /// Book title.
    pub title: String,
    /// Authors in catalogue order.
    pub authors: Vec<String>,
    /// Cover thumbnail URI.
    pub thumbnail: Option<String>,
    /// Catalogue categories.
    pub categories: Vec<String>,
    /// Total pages.
    pub page_count: Option<u32>,
    /// Pages read so far.
    pub page_in_reading: Option<u32>,
    /// Shelf the book sits on.
    pub status: ReadingStatus,
    /// Accumulated reading timer.
    pub total_read_seconds: Option<u64>,
    /// ISBN-10 identifier.
    pub isbn10: Option<String>,
    /// ISBN-13 identifier.
    pub isbn13: Option<String>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

impl UserBook {
    fn from_payload(id: VolumeId, payload: &BookPayload, status: ReadingStatus, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: payload.title.clone(),
            authors: payload.authors.clone(),
            thumbnail: payload.thumbnail.clone(),
            categories: payload.categories.clone(),
            page_count: None,
            page_in_reading: None,
            status,
            total_read_seconds: None,
            isbn10: payload.isbn10.clone(),
            isbn13: payload.isbn13.clone(),
            updated_at: now,
        }
    }

    /// Reading progress as a fraction in `[0, 1]`, when the total is known.
    pub fn progress(&self) -> Option<f64> {
        let total = self.page_count.filter(|total| *total > 0)?;
        let read = self.page_in_reading.unwrap_or(0).min(total);
        Some(f64::from(read) / f64::from(total))
    }
}

/// What to do when an update supplies a total page count while one is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCountPolicy {
    /// Keep the stored total; the supplied one only fills a gap.
    #[default]
    Preserve,
    /// Replace the stored total with the supplied one.
    Override,
}

/// Error returned when parsing an unknown [`PageCountPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page count policy: {0} (expected preserve or override)")]
pub struct ParsePageCountPolicyError(String);

impl FromStr for PageCountPolicy {
    type Err = ParsePageCountPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "override" => Ok(Self::Override),
            _ => Err(ParsePageCountPolicyError(s.to_owned())),
        }
    }
}

/// Requested changes for [`plan_upsert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelfChanges {
    /// Target status; `None` keeps the stored one.
    pub status: Option<ReadingStatus>,
    /// Total page count to record.
    pub page_count: Option<u32>,
    /// Pages read; negative or excessive values are clamped.
    pub page_in_reading: Option<i64>,
    /// Descriptive data, required when no record exists yet.
    pub payload: Option<BookPayload>,
}

/// Outcome of a toggle on a status button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfDecision {
    /// The requested status was already active: remove the record.
    Remove,
    /// Write this record.
    Upsert(UserBook),
}

/// Clamp an attempted pages-read value into `[0, total]`.
///
/// Without a known total only the lower bound applies.
///
/// # Examples
/// ```
/// use readtrack::domain::clamp_pages;
///
/// assert_eq!(clamp_pages(300, Some(250)), 250);
/// assert_eq!(clamp_pages(-4, Some(250)), 0);
/// assert_eq!(clamp_pages(120, None), 120);
/// ```
pub fn clamp_pages(attempted: i64, total: Option<u32>) -> u32 {
    let upper = total.unwrap_or(u32::MAX);
    let bounded = attempted.clamp(0, i64::from(upper));
    u32::try_from(bounded).unwrap_or(upper)
}

/// Decide what selecting `requested` on a status button does.
///
/// Re-selecting the active status removes the book (toggle-off); anything
/// else upserts the record with the requested status, completing the book
/// when the target is [`ReadingStatus::Read`].
///
/// # Errors
/// - [`crate::domain::ErrorCode::MissingPageCount`] when completing a book
///   whose total is unknown.
/// - [`crate::domain::ErrorCode::InvalidInput`] when a new record lacks a
///   payload or `page_count` is zero.
pub fn plan_exclusive_status(
    current: Option<&UserBook>,
    volume: &VolumeId,
    requested: ReadingStatus,
    payload: Option<&BookPayload>,
    page_count: Option<u32>,
    policy: PageCountPolicy,
    now: DateTime<Utc>,
) -> Result<ShelfDecision, Error> {
    if current.is_some_and(|book| book.status == requested) {
        return Ok(ShelfDecision::Remove);
    }

    let changes = ShelfChanges {
        status: Some(requested),
        page_count,
        page_in_reading: None,
        payload: payload.cloned(),
    };
    plan_upsert(current, volume, &changes, policy, now).map(ShelfDecision::Upsert)
}

/// Compute the record resulting from a combined status + progress update.
///
/// # Errors
/// - [`crate::domain::ErrorCode::InvalidInput`] when creating a record without
///   a status or payload, or when `page_count` is zero.
/// - [`crate::domain::ErrorCode::MissingPageCount`] when the resulting status
///   is [`ReadingStatus::Read`] and no total is known.
pub fn plan_upsert(
    current: Option<&UserBook>,
    volume: &VolumeId,
    changes: &ShelfChanges,
    policy: PageCountPolicy,
    now: DateTime<Utc>,
) -> Result<UserBook, Error> {
    if changes.page_count == Some(0) {
        return Err(Error::invalid_input("page count must be greater than zero"));
    }

    let mut book = match current {
        Some(existing) => existing.clone(),
        None => {
            let status = changes
                .status
                .ok_or_else(|| Error::invalid_input("a status is required to shelve a new book"))?;
            let payload = changes.payload.as_ref().ok_or_else(|| {
                Error::invalid_input("book details are required to shelve a new book")
            })?;
            UserBook::from_payload(volume.clone(), payload, status, now)
        }
    };

    book.page_count = resolve_page_count(
        book.page_count,
        changes.page_count,
        changes.payload.as_ref().and_then(|payload| payload.page_count),
        policy,
    );
    if let Some(status) = changes.status {
        book.status = status;
    }

    book.page_in_reading = if book.status == ReadingStatus::Read {
        let total = book.page_count.ok_or_else(|| {
            Error::missing_page_count(format!(
                "total page count required to mark {volume} as read"
            ))
        })?;
        Some(total)
    } else {
        changes
            .page_in_reading
            .map(|attempted| clamp_pages(attempted, book.page_count))
            .or_else(|| {
                book.page_in_reading
                    .map(|pages| clamp_pages(i64::from(pages), book.page_count))
            })
    };

    book.updated_at = now;
    Ok(book)
}

fn resolve_page_count(
    stored: Option<u32>,
    supplied: Option<u32>,
    from_payload: Option<u32>,
    policy: PageCountPolicy,
) -> Option<u32> {
    match (stored, supplied) {
        (None, supplied) => supplied.or(from_payload),
        (Some(_), Some(supplied)) if policy == PageCountPolicy::Override => Some(supplied),
        (Some(stored), _) => Some(stored),
    }
}

/// Add `seconds` to a record's reading timer.
///
/// # Errors
/// [`crate::domain::ErrorCode::InvalidInput`] when `seconds` is zero.
pub fn add_reading_time(book: &UserBook, seconds: u64, now: DateTime<Utc>) -> Result<UserBook, Error> {
    if seconds == 0 {
        return Err(Error::invalid_input("reading time must be at least one second"));
    }
    let mut updated = book.clone();
    updated.total_read_seconds =
        Some(book.total_read_seconds.unwrap_or(0).saturating_add(seconds));
    updated.updated_at = now;
    Ok(updated)
}
