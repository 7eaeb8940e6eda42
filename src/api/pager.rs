//! Cursor pagination
//!
//! Walks a paginated list endpoint to completion or to a caller
//! supplied limit. Two continuation styles are unified here: the
//! JSON:API dialect returns an absolute `links.next` URL and items
//! under `data`, the flat dialect returns a `nextPageToken` cursor and
//! items under an endpoint-specific key. Page fetches are strictly
//! sequential.

use serde_json::Value;

use super::session::ApiSession;
use crate::error::{Error, Result};

/// Hard cap on pages fetched in one loop. Termination normally comes
/// from the server omitting the continuation token; the cap turns a
/// server that never stops issuing cursors into an error instead of an
/// unbounded loop.
const MAX_PAGES: usize = 1000;

/// Wire shape of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDialect {
    /// Items under `data`, continuation via absolute `links.next` URL,
    /// sideloads under `included`.
    JsonApi,
    /// Items under `items_key`, continuation via `nextPageToken`
    /// re-sent as the `pageToken` parameter.
    TokenCursor { items_key: &'static str },
}

/// Accumulated pages: primary items plus any compound-document
/// sideloads (`included` resources, JSON:API dialect only).
#[derive(Debug, Default)]
pub struct PageBatch {
    pub items: Vec<Value>,
    pub included: Vec<Value>,
}

enum NextPage {
    Url(String),
    Token(String),
}

impl ApiSession {
    /// Fetch pages until the server omits the continuation or `limit`
    /// items have accumulated. The pager may overshoot `limit` by up to
    /// one page; callers trim. A response without the items key is an
    /// empty page, not an error.
    pub async fn paginate(
        &self,
        path: &str,
        params: &[(String, String)],
        dialect: PageDialect,
        limit: Option<usize>,
    ) -> Result<PageBatch> {
        let mut batch = PageBatch::default();
        let mut next: Option<NextPage> = None;
        let mut pages = 0;

        loop {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(Error::Pagination(format!(
                    "{} did not terminate after {} pages",
                    path, MAX_PAGES
                )));
            }

            let response = match &next {
                None => self.get(path, params).await?,
                Some(NextPage::Url(url)) => self.get(url, &[]).await?,
                Some(NextPage::Token(token)) => {
                    let mut page_params = params.to_vec();
                    page_params.push(("pageToken".to_string(), token.clone()));
                    self.get(path, &page_params).await?
                }
            };

            collect_page(&mut batch, &response, dialect);

            let continuation = continuation_of(&response, dialect);
            let Some(continuation) = continuation else {
                break;
            };

            // A server erroneously re-issuing the cursor it was just
            // given would otherwise loop forever.
            let repeated = match (&next, &continuation) {
                (Some(NextPage::Url(prev)), NextPage::Url(cur)) => prev == cur,
                (Some(NextPage::Token(prev)), NextPage::Token(cur)) => prev == cur,
                _ => false,
            };
            if repeated {
                return Err(Error::Pagination(format!(
                    "{} returned the same continuation cursor twice",
                    path
                )));
            }

            if limit.is_some_and(|l| batch.items.len() >= l) {
                break;
            }
            next = Some(continuation);
        }

        Ok(batch)
    }
}

fn collect_page(batch: &mut PageBatch, response: &Value, dialect: PageDialect) {
    let items_key = match dialect {
        PageDialect::JsonApi => "data",
        PageDialect::TokenCursor { items_key } => items_key,
    };

    match response.get(items_key) {
        Some(Value::Array(items)) => batch.items.extend(items.iter().cloned()),
        // A single-entity `data` member still counts as one item.
        Some(Value::Null) | None => {}
        Some(single) if dialect == PageDialect::JsonApi => batch.items.push(single.clone()),
        Some(_) => {}
    }

    if dialect == PageDialect::JsonApi {
        if let Some(Value::Array(included)) = response.get("included") {
            batch.included.extend(included.iter().cloned());
        }
    }
}

fn continuation_of(response: &Value, dialect: PageDialect) -> Option<NextPage> {
    match dialect {
        PageDialect::JsonApi => response
            .get("links")
            .and_then(|links| links.get("next"))
            .and_then(|next| next.as_str())
            .filter(|url| !url.is_empty())
            .map(|url| NextPage::Url(url.to_string())),
        PageDialect::TokenCursor { .. } => response
            .get("nextPageToken")
            .and_then(|token| token.as_str())
            .filter(|token| !token.is_empty())
            .map(|token| NextPage::Token(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_items_key_is_an_empty_page() {
        let mut batch = PageBatch::default();
        collect_page(
            &mut batch,
            &json!({"kind": "empty result"}),
            PageDialect::TokenCursor {
                items_key: "releases",
            },
        );
        assert!(batch.items.is_empty());
    }

    #[test]
    fn json_api_pages_collect_data_and_included() {
        let mut batch = PageBatch::default();
        collect_page(
            &mut batch,
            &json!({
                "data": [{"type": "builds", "id": "B1"}],
                "included": [{"type": "apps", "id": "A1"}]
            }),
            PageDialect::JsonApi,
        );
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.included.len(), 1);
    }

    #[test]
    fn empty_next_token_means_no_continuation() {
        let response = json!({"releases": [], "nextPageToken": ""});
        assert!(continuation_of(
            &response,
            PageDialect::TokenCursor {
                items_key: "releases"
            }
        )
        .is_none());
    }
}
