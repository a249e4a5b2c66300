//! Ordering of dated items (comments, posts) by creation time.

use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Anything carrying a backend `date_created` string.
pub trait Dated {
    fn date_created(&self) -> &str;
}

impl Dated for String {
    fn date_created(&self) -> &str {
        self
    }
}

impl Dated for &str {
    fn date_created(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

/// Return a sorted copy of `items`.
///
/// The sort is stable. Items whose date does not parse go last in either
/// order.
pub fn sort_by_date<T: Dated + Clone>(items: &[T], order: SortOrder) -> Vec<T> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, T)> = items
        .iter()
        .map(|item| (parse_timestamp(item.date_created()).ok(), item.clone()))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a.as_ref(), b.as_ref(), order));
    keyed.into_iter().map(|(_, item)| item).collect()
}

fn compare(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(b),
            SortOrder::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
