//! Pagination Engine
//!
//! Walks a cursor-paginated API without the caller re-implementing loop and
//! cursor bookkeeping. Pages are strictly sequential: page N's fetch starts
//! only once page N-1's cursor is known, because cursors are causally
//! dependent. Safety ceilings (max pages, max items) bound every walk.
//!
//! The engine never interprets cursor contents and does not detect cursor
//! cycles; the fetch source owns cursor advancement and the ceilings are the
//! backstop against a repeating cursor.

use std::future::Future;
use std::marker::PhantomData;

use anyhow::Result;

// == Safety Defaults ==
/// Ceiling on pages per walk when the caller specifies none.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Ceiling on collected items per walk when the caller specifies none.
pub const DEFAULT_MAX_ITEMS: usize = 10_000;

// == Page Limits ==
/// Hard bounds on a single paginated walk.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    /// Maximum pages fetched
    pub max_pages: usize,
    /// Maximum cumulative items before the walk stops
    pub max_items: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

// == Paginator ==
/// Lazy cursor-driven page walker.
///
/// Each [`Paginator::next_page`] call performs exactly one fetch; the caller
/// awaits between pages. The walk is finite: it ends when the extracted
/// cursor is absent, when `max_pages` pages have been fetched, or when the
/// cumulative item count reaches `max_items`, whichever comes first. The
/// first page is always fetched, so an immediately-empty result is one page,
/// not zero - callers can tell "queried but empty" from "never queried".
pub struct Paginator<P, F, C, N> {
    /// Fetches one page for the given cursor
    fetch_page: F,
    /// Extracts the next cursor from a page
    get_cursor: C,
    /// Counts the items on a page, for the max_items bound
    count_items: N,
    /// Safety ceilings
    limits: PageLimits,
    /// Cursor to feed the next fetch
    cursor: Option<String>,
    /// Pages fetched so far
    pages_fetched: usize,
    /// Items seen so far
    items_seen: usize,
    /// Terminal state reached
    done: bool,
    _page: PhantomData<P>,
}

impl<P, F, C, N> Paginator<P, F, C, N>
where
    C: Fn(&P) -> Option<String>,
    N: Fn(&P) -> usize,
{
    // == Constructor ==
    /// Creates a walker starting from the first page (no cursor).
    pub fn new(fetch_page: F, get_cursor: C, count_items: N, limits: PageLimits) -> Self {
        Self {
            fetch_page,
            get_cursor,
            count_items,
            limits,
            cursor: None,
            pages_fetched: 0,
            items_seen: 0,
            done: false,
            _page: PhantomData,
        }
    }

    /// Resumes the walk from an API-supplied cursor.
    pub fn with_start_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }

    // == Next Page ==
    /// Fetches the next page, or returns None once the walk is finished.
    pub async fn next_page<Fut>(&mut self) -> Result<Option<P>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<P>>,
    {
        if self.done {
            return Ok(None);
        }
        if self.pages_fetched >= self.limits.max_pages {
            self.done = true;
            return Ok(None);
        }

        let page = (self.fetch_page)(self.cursor.clone()).await?;
        self.pages_fetched += 1;
        self.items_seen += (self.count_items)(&page);
        self.cursor = (self.get_cursor)(&page);

        if self.cursor.is_none() || self.items_seen >= self.limits.max_items {
            self.done = true;
        }

        Ok(Some(page))
    }

    // == State ==
    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Cursor the next fetch would use; Some after a bounded stop means the
    /// upstream had more data.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

// == Collect Pages ==
/// Drains a walker into one flat item list plus the page count.
///
/// The final list is trimmed to exactly `max_items` when the last page
/// overshoots the bound.
pub async fn collect_pages<P, F, Fut, C, N, G, I>(
    paginator: &mut Paginator<P, F, C, N>,
    get_items: G,
    max_items: Option<usize>,
) -> Result<(Vec<I>, usize)>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P>>,
    C: Fn(&P) -> Option<String>,
    N: Fn(&P) -> usize,
    G: Fn(P) -> Vec<I>,
{
    let mut items = Vec::new();
    let mut pages = 0usize;

    while let Some(page) = paginator.next_page().await? {
        pages += 1;
        items.extend(get_items(page));
        if let Some(max) = max_items {
            if items.len() >= max {
                items.truncate(max);
                break;
            }
        }
    }

    Ok((items, pages))
}

// == Pagination Request ==
/// Caller-side pagination policy for one operation.
#[derive(Debug, Clone, Default)]
pub struct PaginationRequest {
    /// Walk every page (bounded by safety ceilings) instead of one
    pub fetch_all: bool,
    /// Optional item limit tighter than the safety default
    pub limit: Option<usize>,
    /// Cursor to resume from
    pub cursor: Option<String>,
}

// == Page Outcome ==
/// Result of an executed pagination policy, handed to the response
/// formatter.
#[derive(Debug, Clone)]
pub struct PageOutcome<I> {
    /// Collected items
    pub items: Vec<I>,
    /// Pages fetched
    pub pages_fetched: usize,
    /// Cursor for resuming, when the upstream had more
    pub next_cursor: Option<String>,
    /// Whether more data remained upstream
    pub has_more: bool,
}

// == Execute Pagination ==
/// Applies a pagination policy: fetch-all drains the walker under the
/// configured safety ceilings; otherwise exactly one page is fetched and
/// `has_more` derives from cursor presence. The outcome is passed through
/// `format` so call sites shape their own response type.
///
/// `limits` carries the configured ceilings (see `Config::page_limits`); a
/// caller-requested item limit only ever tightens them.
pub async fn execute_pagination<P, F, Fut, C, N, G, I, R, M>(
    request: PaginationRequest,
    limits: PageLimits,
    fetch_page: F,
    get_cursor: C,
    count_items: N,
    get_items: G,
    format: M,
) -> Result<R>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P>>,
    C: Fn(&P) -> Option<String>,
    N: Fn(&P) -> usize,
    G: Fn(P) -> Vec<I>,
    M: FnOnce(PageOutcome<I>) -> R,
{
    // Safety ceilings always apply on a fetch-all walk, even when the caller
    // asked for no limit at all
    let limits = PageLimits {
        max_pages: limits.max_pages,
        max_items: request.limit.unwrap_or(limits.max_items).min(limits.max_items),
    };

    let mut paginator = Paginator::new(fetch_page, get_cursor, count_items, limits)
        .with_start_cursor(request.cursor.clone());

    let outcome = if request.fetch_all {
        let (items, pages) = collect_pages(&mut paginator, get_items, Some(limits.max_items)).await?;
        let next_cursor = paginator.cursor().map(str::to_string);
        PageOutcome {
            has_more: next_cursor.is_some(),
            items,
            pages_fetched: pages,
            next_cursor,
        }
    } else {
        let items = match paginator.next_page().await? {
            Some(page) => get_items(page),
            None => Vec::new(),
        };
        let next_cursor = paginator.cursor().map(str::to_string);
        let mut items = items;
        if let Some(limit) = request.limit {
            items.truncate(limit);
        }
        PageOutcome {
            has_more: next_cursor.is_some(),
            items,
            pages_fetched: paginator.pages_fetched(),
            next_cursor,
        }
    };

    Ok(format(outcome))
}
