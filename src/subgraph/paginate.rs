//! Pagination strategies for size-limited subgraph responses.
//!
//! The indexer caps results per request, so large queries are issued as
//! a sequence of pages and merged client-side. Two shapes exist:
//!
//! - [`split_query`] - slice an item list into alias windows, one
//!   request per window (blocks, historical share values)
//! - [`paged_skip_query`] - numeric-offset pagination against a single
//!   query (position snapshot history)

use anyhow::Result;
use rustc_hash::FxHashMap;
use std::future::Future;

/// Issue one request per window of `items`, merging alias-keyed pages.
///
/// Terminates when a page returns fewer entries than the requested
/// window length, or when the window has consumed the input list,
/// whichever comes first. A fetch error aborts the whole accumulation;
/// no partial result is returned.
///
/// With every page full, exactly `ceil(items.len() / page_size)`
/// requests are issued; an empty input issues none.
pub async fn split_query<I, T, F, Fut>(
    items: &[I],
    page_size: usize,
    fetch: F,
) -> Result<FxHashMap<String, T>>
where
    I: Clone,
    F: Fn(Vec<I>) -> Fut,
    Fut: Future<Output = Result<FxHashMap<String, T>>>,
{
    let mut merged = FxHashMap::default();
    if items.is_empty() {
        return Ok(merged);
    }

    let page_size = page_size.max(1);
    let mut start = 0;

    loop {
        let end = (start + page_size).min(items.len());
        let window = &items[start..end];

        let page = fetch(window.to_vec()).await?;
        let page_len = page.len();
        merged.extend(page);

        // Short page means the source is exhausted
        if page_len < window.len() || end == items.len() {
            break;
        }
        start = end;
    }

    Ok(merged)
}

/// Accumulate a list query paginated by numeric offset.
///
/// Calls `fetch(skip)` with offsets 0, `page_size`, 2×`page_size`, ...
/// until a page comes back shorter than `page_size`. A fetch error
/// aborts the whole accumulation.
pub async fn paged_skip_query<T, F, Fut>(page_size: usize, fetch: F) -> Result<Vec<T>>
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let page_size = page_size.max(1);
    let mut all = Vec::new();
    let mut skip = 0;

    loop {
        let page = fetch(skip).await?;
        let page_len = page.len();
        all.extend(page);

        if page_len < page_size {
            break;
        }
        skip += page_size;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;

    fn full_page(window: Vec<u64>) -> FxHashMap<String, u64> {
        window.into_iter().map(|t| (format!("t{t}"), t)).collect()
    }

    #[tokio::test]
    async fn test_split_query_issues_ceil_n_over_p_requests() {
        let items: Vec<u64> = (0..25).collect();
        let calls = Cell::new(0usize);

        let merged = split_query(&items, 10, |window| {
            calls.set(calls.get() + 1);
            let page = full_page(window);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3); // ceil(25 / 10)
        assert_eq!(merged.len(), 25);
        assert_eq!(merged.get("t24"), Some(&24));
    }

    #[tokio::test]
    async fn test_split_query_stops_on_short_page() {
        let items: Vec<u64> = (0..30).collect();
        let calls = Cell::new(0usize);

        let merged = split_query(&items, 10, |window| {
            calls.set(calls.get() + 1);
            // second page comes back half-empty: source exhausted
            let mut page = full_page(window);
            if calls.get() == 2 {
                page.retain(|_, v| *v < 15);
            }
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(merged.len(), 15);
    }

    #[tokio::test]
    async fn test_split_query_empty_input_issues_no_requests() {
        let calls = Cell::new(0usize);

        let merged = split_query(&[], 10, |window: Vec<u64>| {
            calls.set(calls.get() + 1);
            let page = full_page(window);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 0);
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn test_split_query_error_aborts_without_partial_result() {
        let items: Vec<u64> = (0..30).collect();
        let calls = Cell::new(0usize);

        let result = split_query(&items, 10, |window| {
            calls.set(calls.get() + 1);
            let failing = calls.get() == 2;
            let page = full_page(window);
            async move {
                if failing {
                    Err(anyhow!("connection reset"))
                } else {
                    Ok(page)
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_split_query_never_requests_an_item_twice() {
        let items: Vec<u64> = (0..95).collect();
        let seen = Cell::new(0u64);

        split_query(&items, 20, |window| {
            // each item contributes once to the running sum
            seen.set(seen.get() + window.iter().sum::<u64>());
            let page = full_page(window);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(seen.get(), (0..95).sum::<u64>());
    }

    #[tokio::test]
    async fn test_paged_skip_query_accumulates_until_short_page() {
        let pages = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]];
        let calls = Cell::new(0usize);

        let all = paged_skip_query(3, |skip| {
            calls.set(calls.get() + 1);
            let page = pages[skip / 3].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_paged_skip_query_single_short_page() {
        let all = paged_skip_query(1000, |_skip| async move { Ok(vec![42]) })
            .await
            .unwrap();
        assert_eq!(all, vec![42]);
    }
}
