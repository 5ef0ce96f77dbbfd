//! Page partitioning and memoized page rendering.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{MenuError, MenuResult};

/// Renders one page of entries into a view.
///
/// Implementations may suspend (for example to fetch remote data); callers
/// always await the result.
#[async_trait]
pub trait PageFormatter<C, E, V>: Send + Sync {
    async fn format_page(
        &self,
        ctx: &C,
        entries: &[E],
        page: usize,
        pages: &[Vec<E>],
    ) -> anyhow::Result<V>;
}

/// Adapter turning a synchronous closure into a [`PageFormatter`].
pub struct FnFormatter<F>(F);

/// Wrap a synchronous `(ctx, entries, page, pages)` closure as a formatter.
pub fn formatter_fn<C, E, V, F>(f: F) -> FnFormatter<F>
where
    F: Fn(&C, &[E], usize, &[Vec<E>]) -> anyhow::Result<V>,
{
    FnFormatter(f)
}

#[async_trait]
impl<C, E, V, F> PageFormatter<C, E, V> for FnFormatter<F>
where
    C: Sync,
    E: Sync,
    V: Send + 'static,
    F: Fn(&C, &[E], usize, &[Vec<E>]) -> anyhow::Result<V> + Send + Sync,
{
    async fn format_page(
        &self,
        ctx: &C,
        entries: &[E],
        page: usize,
        pages: &[Vec<E>],
    ) -> anyhow::Result<V> {
        (self.0)(ctx, entries, page, pages)
    }
}

/// Number of pages `len` entries occupy. Never less than one.
pub fn page_count(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1)).max(1)
}

/// Split entries into contiguous pages of at most `per_page` items.
///
/// An empty list still yields one (empty) page.
pub fn paginate<E>(entries: Vec<E>, per_page: usize) -> MenuResult<Vec<Vec<E>>> {
    if per_page == 0 {
        return Err(MenuError::InvalidConfiguration(
            "per_page must be at least 1".to_owned(),
        ));
    }

    if entries.is_empty() {
        return Ok(vec![Vec::new()]);
    }

    let mut pages = Vec::with_capacity(entries.len().div_ceil(per_page));
    let mut entries = entries.into_iter().peekable();
    while entries.peek().is_some() {
        pages.push(entries.by_ref().take(per_page).collect());
    }

    Ok(pages)
}

/// Fixed set of pages plus a lazily filled render cache.
///
/// Cached views are never invalidated: once a page has been rendered, later
/// requests return that first result even if the formatter is not
/// deterministic.
pub struct Paginator<C, E, V> {
    pages: Vec<Vec<E>>,
    per_page: usize,
    formatter: Box<dyn PageFormatter<C, E, V>>,
    cache: HashMap<usize, V>,
}

impl<C, E, V> Paginator<C, E, V>
where
    C: Sync,
    E: Sync,
    V: Clone + Send + 'static,
{
    pub fn new(
        entries: Vec<E>,
        per_page: usize,
        formatter: impl PageFormatter<C, E, V> + 'static,
    ) -> MenuResult<Self> {
        Ok(Self {
            pages: paginate(entries, per_page)?,
            per_page,
            formatter: Box::new(formatter),
            cache: HashMap::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn pages(&self) -> &[Vec<E>] {
        &self.pages
    }

    /// Entries on a 1-based page.
    pub fn page(&self, page: usize) -> MenuResult<&[E]> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(Vec::as_slice)
            .ok_or(MenuError::PageOutOfRange {
                page,
                total_pages: self.pages.len(),
            })
    }

    pub fn is_cached(&self, page: usize) -> bool {
        self.cache.contains_key(&page)
    }

    /// Return the view for `page`, invoking the formatter only on a cache miss.
    ///
    /// Formatter errors are returned as-is and leave the cache untouched.
    pub async fn render_page(&mut self, ctx: &C, page: usize) -> MenuResult<V> {
        if let Some(view) = self.cache.get(&page) {
            return Ok(view.clone());
        }

        let entries = self.page(page)?;
        let view = self
            .formatter
            .format_page(ctx, entries, page, &self.pages)
            .await
            .map_err(|source| MenuError::FormatterFailure { page, source })?;

        tracing::debug!(page, "rendered menu page");
        self.cache.insert(page, view.clone());
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use pretty_assertions::assert_eq;

    use super::*;

    fn counting_formatter(
        calls: Arc<AtomicUsize>,
    ) -> FnFormatter<impl Fn(&(), &[u32], usize, &[Vec<u32>]) -> anyhow::Result<String>> {
        formatter_fn(move |_: &(), entries: &[u32], page: usize, pages: &[Vec<u32>]| {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{page}/{}:{entries:?}#{call}", pages.len()))
        })
    }

    struct SlowFormatter;

    #[async_trait]
    impl PageFormatter<String, u32, String> for SlowFormatter {
        async fn format_page(
            &self,
            ctx: &String,
            entries: &[u32],
            page: usize,
            _pages: &[Vec<u32>],
        ) -> anyhow::Result<String> {
            tokio::task::yield_now().await;
            Ok(format!("{ctx} p{page} {}", entries.len()))
        }
    }

    #[test]
    fn page_count_is_ceiling_of_len_over_per_page() {
        for len in 0..40_u32 {
            for per_page in 1..12 {
                let pages = paginate((0..len).collect(), per_page).unwrap();
                let expected = (len as usize).div_ceil(per_page).max(1);
                assert_eq!(pages.len(), expected, "len={len} per_page={per_page}");
                assert_eq!(page_count(len as usize, per_page), expected);
                assert!(pages.iter().all(|page| page.len() <= per_page));
            }
        }
    }

    #[test]
    fn pages_keep_entry_order_and_last_page_is_short() {
        let pages = paginate((1..=7).collect::<Vec<u32>>(), 3).unwrap();
        assert_eq!(pages, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn empty_entries_yield_one_empty_page() {
        let pages = paginate(Vec::<u32>::new(), 5).unwrap();
        assert_eq!(pages, vec![Vec::<u32>::new()]);
    }

    #[test]
    fn zero_per_page_is_invalid_configuration() {
        let err = paginate(vec![1_u32], 0).unwrap_err();
        assert!(matches!(err, MenuError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn second_render_of_a_page_hits_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut paginator =
            Paginator::new((0..25).collect(), 10, counting_formatter(Arc::clone(&calls))).unwrap();

        let first = paginator.render_page(&(), 2).await.unwrap();
        let again = paginator.render_page(&(), 2).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, again);
        assert!(paginator.is_cached(2));
        assert!(!paginator.is_cached(1));
    }

    #[tokio::test]
    async fn formatter_receives_page_entries_and_all_pages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut paginator =
            Paginator::new((0..25).collect(), 10, counting_formatter(calls)).unwrap();

        let view = paginator.render_page(&(), 3).await.unwrap();
        assert_eq!(view, "3/3:[20, 21, 22, 23, 24]#0");
    }

    #[tokio::test]
    async fn async_formatter_is_awaited() {
        let mut paginator = Paginator::new(vec![1, 2, 3], 2, SlowFormatter).unwrap();
        let view = paginator.render_page(&"ctx".to_owned(), 2).await.unwrap();
        assert_eq!(view, "ctx p2 1");
    }

    #[tokio::test]
    async fn out_of_range_page_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut paginator =
            Paginator::new(vec![1, 2, 3], 2, counting_formatter(Arc::clone(&calls))).unwrap();

        for page in [0, 3] {
            let err = paginator.render_page(&(), page).await.unwrap_err();
            assert!(matches!(err, MenuError::PageOutOfRange { total_pages: 2, .. }));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn formatter_failure_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut paginator = Paginator::new(
            vec![1_u32],
            1,
            formatter_fn(move |_: &(), _: &[u32], _: usize, _: &[Vec<u32>]| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    anyhow::bail!("backend unavailable");
                }
                Ok("ok".to_owned())
            }),
        )
        .unwrap();

        let err = paginator.render_page(&(), 1).await.unwrap_err();
        assert!(matches!(err, MenuError::FormatterFailure { page: 1, .. }));
        assert!(!paginator.is_cached(1));

        assert_eq!(paginator.render_page(&(), 1).await.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
