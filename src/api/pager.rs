//! Exhaustive pagination over one paged endpoint
//!
//! The pager repeatedly fetches batches until either the server returns an
//! empty page or the cumulative item count reaches the declared grand total.
//! Two cursor styles are supported: sequential page numbers (reposts, likes)
//! and a server-supplied continuation token (comments).
//!
//! Failure policy: a failed page fetch propagates and aborts the drain; a
//! failed item is logged and skipped, and the drain continues. A fixed delay
//! is observed between successive page fetches so the crawl stays inside the
//! remote service's implicit rate limits.

use crate::api::ApiResult;
use crate::model::extract;
use crate::model::SchemaError;
use crate::RippleError;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// One batch of a paged result set
#[derive(Debug, Clone)]
pub struct PageBatch {
    /// Raw records in this batch
    pub items: Vec<Value>,

    /// Grand total declared by the server; advisory, not authoritative
    pub total: u64,

    /// Continuation token for the next call (token-cursor endpoints only)
    pub next_token: Option<String>,
}

impl PageBatch {
    /// Parses a raw paged response body
    ///
    /// Requires `data` and `total_number`; token-cursor endpoints must also
    /// carry `max_id` (numeric or string).
    pub(crate) fn parse(body: Value, with_token: bool) -> Result<PageBatch, SchemaError> {
        let items = extract::field(&body, "batch", "data")?
            .as_array()
            .cloned()
            .ok_or(SchemaError::InvalidType {
                record: "batch",
                field: "data",
            })?;
        let total = extract::u64_field(&body, "batch", "total_number")?;
        let next_token = if with_token {
            Some(extract::id_field(&body, "batch", "max_id")?)
        } else {
            None
        };

        Ok(PageBatch {
            items,
            total,
            next_token,
        })
    }
}

/// Drains a page-number endpoint starting at `first_page`
///
/// `fetch_page` is called with successive page numbers; `process_item` is
/// called once per raw record and may itself perform further fetches.
/// Returns every successfully processed item, in server order.
pub async fn drain_by_page<F, FutF, P, FutP, T>(
    first_page: u64,
    page_delay: Duration,
    fetch_page: F,
    process_item: P,
) -> ApiResult<Vec<T>>
where
    F: FnMut(u64) -> FutF,
    FutF: Future<Output = ApiResult<PageBatch>>,
    P: FnMut(Value) -> FutP,
    FutP: Future<Output = Result<T, RippleError>>,
{
    drain(first_page, page_delay, fetch_page, process_item, |page, _| {
        Some(page + 1)
    })
    .await
}

/// Drains a token-cursor endpoint starting from `initial` (empty for the
/// first batch)
///
/// Each batch carries the token for the next call; the server decides the
/// cursor sequence.
pub async fn drain_by_token<F, FutF, P, FutP, T>(
    initial: String,
    page_delay: Duration,
    fetch_page: F,
    process_item: P,
) -> ApiResult<Vec<T>>
where
    F: FnMut(String) -> FutF,
    FutF: Future<Output = ApiResult<PageBatch>>,
    P: FnMut(Value) -> FutP,
    FutP: Future<Output = Result<T, RippleError>>,
{
    drain(initial, page_delay, fetch_page, process_item, |_, batch| {
        batch.next_token.clone()
    })
    .await
}

/// Shared drain loop, generic over the cursor type and its advance rule
async fn drain<C, F, FutF, P, FutP, T, A>(
    mut cursor: C,
    page_delay: Duration,
    mut fetch_page: F,
    mut process_item: P,
    advance: A,
) -> ApiResult<Vec<T>>
where
    C: Clone,
    F: FnMut(C) -> FutF,
    FutF: Future<Output = ApiResult<PageBatch>>,
    P: FnMut(Value) -> FutP,
    FutP: Future<Output = Result<T, RippleError>>,
    A: Fn(&C, &PageBatch) -> Option<C>,
{
    let mut drained = Vec::new();
    let mut fetched: u64 = 0;

    loop {
        let batch = fetch_page(cursor.clone()).await?;

        // An empty page means "no more data", even if the declared total was
        // never reached.
        if batch.items.is_empty() {
            break;
        }

        let total = batch.total;
        let page_len = batch.items.len() as u64;
        let next = advance(&cursor, &batch);

        for item in batch.items {
            match process_item(item).await {
                Ok(processed) => drained.push(processed),
                Err(e) => tracing::error!("Skipping item in paged result: {}", e),
            }
        }

        fetched += page_len;
        tracing::info!(
            "Drained {} items this page ({} of {} declared)",
            page_len,
            fetched,
            total
        );

        if fetched >= total {
            break;
        }

        cursor = match next {
            Some(c) => c,
            None => break,
        };

        tokio::time::sleep(page_delay).await;
    }

    Ok(drained)
}
