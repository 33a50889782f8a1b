//! Cursor pagination.

use async_trait::async_trait;
use bk_reflect::derive::Reflect;

use crate::{Error, Result};

/// The query parameter carrying the cursor of the next page.
pub const CURSOR_PARAM: &str = "cursor";

// -----------------------------------------------------------------------------
// Page

/// One page of a list response: `{ "data": [...], "next_cursor": ... }`.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct Page<T> {
    #[json("data")]
    pub data: Vec<T>,
    #[json("next_cursor")]
    pub next_cursor: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
        }
    }
}

impl<T> Page<T> {
    /// The cursor of the next page; `None` on the last page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

// -----------------------------------------------------------------------------
// PageFetcher

/// Fetches the page starting at `cursor`, or the first page for `None`.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, cursor: Option<&str>) -> Result<Page<T>>;
}

// -----------------------------------------------------------------------------
// PageIter

enum State<T> {
    Start,
    HasPage {
        items: std::vec::IntoIter<T>,
        cursor: Option<String>,
    },
    Exhausted,
    Failed(Error),
}

/// Pull-style iterator over every item of a paginated list.
///
/// Pages are fetched on demand. Iteration ends after a page without a
/// cursor, or on an empty page. A failed fetch ends iteration for good;
/// the error stays available through [`PageIter::error`].
pub struct PageIter<T> {
    fetcher: Box<dyn PageFetcher<T>>,
    state: State<T>,
}

impl<T: Send + 'static> PageIter<T> {
    pub fn new(fetcher: impl PageFetcher<T> + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            state: State::Start,
        }
    }

    /// Returns the next item, fetching the next page when needed.
    ///
    /// `None` means the list is exhausted or a fetch failed.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            let cursor = match &mut self.state {
                State::Start => None,
                State::HasPage { items, cursor } => {
                    if let Some(item) = items.next() {
                        return Some(item);
                    }
                    match cursor.take().filter(|cursor| !cursor.is_empty()) {
                        Some(cursor) => Some(cursor),
                        None => {
                            self.state = State::Exhausted;
                            return None;
                        }
                    }
                }
                State::Exhausted | State::Failed(_) => return None,
            };

            log::trace!("fetching page, cursor {cursor:?}");
            self.state = match self.fetcher.fetch(cursor.as_deref()).await {
                Ok(page) if page.data.is_empty() => State::Exhausted,
                Ok(page) => State::HasPage {
                    items: page.data.into_iter(),
                    cursor: page.next_cursor,
                },
                Err(err) => State::Failed(err),
            };
        }
    }

    /// The error that ended iteration, if any.
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Drains the remaining items.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item);
        }
        match self.state {
            State::Failed(err) => Err(err),
            _ => Ok(items),
        }
    }
}
