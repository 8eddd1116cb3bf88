use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::watch;

use super::builder::PaginatorBuilder;
use super::total::{CountFn, NoTotal, TotalMode, WithTotal};
use super::window::{page_window, WindowOptions};
use crate::errors::{PaginateError, Result};
use crate::state::Reactive;
use crate::transport::{QueryParams, Transport};

pub(crate) type DataFn<T, P> = Box<dyn Fn(&P) -> anyhow::Result<Vec<T>> + Send + Sync>;
pub(crate) type UpdateFn = Box<dyn Fn(u32) + Send + Sync>;

/// Pagination controller for a remote listing endpoint.
///
/// Holds the current page, learns the last page from every response and keeps a
/// window of page numbers ready for rendering. All state lives in [`Reactive`] cells,
/// so a view can either poll the getters or subscribe to changes.
///
/// Navigation takes `&self`: a second call may start before the first one settles.
/// Both requests run against the same state and the one that settles last wins,
/// unless the controller was built with `discard_stale_responses(true)`.
pub struct Paginator<T, P, X, M = NoTotal> {
    pub(super) transport: X,
    pub(super) url: String,
    pub(super) page_field: String,
    pub(super) limit_field: String,
    pub(super) window: WindowOptions,
    pub(super) discard_stale: bool,
    pub(super) data_transformer: DataFn<T, P>,
    pub(super) total_pages_transformer: CountFn<P, i64>,
    pub(super) total: M,
    pub(super) on_update: Option<UpdateFn>,
    pub(super) params: Reactive<QueryParams>,
    pub(super) results_per_page: Reactive<u32>,
    pub(super) current_page: Reactive<u32>,
    pub(super) last_page: Reactive<Option<u32>>,
    pub(super) data: Reactive<Vec<T>>,
    pub(super) loading: Reactive<bool>,
    pub(super) pages: Reactive<Vec<u32>>,
    pub(super) in_flight: AtomicUsize,
    pub(super) generation: AtomicU64,
}

/// Serialisable view of a controller at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot<T> {
    pub current_page: u32,
    pub last_page: u32,
    pub pages: Vec<u32>,
    pub results_per_page: u32,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub items: Vec<T>,
}

/// Everything extracted from one response, applied only once all transformers succeeded.
struct Extracted<T, N> {
    items: Vec<T>,
    last_page: u32,
    total: N,
}

impl<T, P, X> Paginator<T, P, X, NoTotal> {
    /// Start building a controller for `url`.
    ///
    /// `data` turns a response into the items of the page, `total_pages` into the
    /// number of pages the server reports.
    pub fn builder<D, C>(
        transport: X,
        url: impl Into<String>,
        data: D,
        total_pages: C,
    ) -> PaginatorBuilder<T, P, X, NoTotal>
    where
        D: Fn(&P) -> anyhow::Result<Vec<T>> + Send + Sync + 'static,
        C: Fn(&P) -> anyhow::Result<i64> + Send + Sync + 'static,
    {
        PaginatorBuilder::new(transport, url.into(), Box::new(data), Box::new(total_pages))
    }
}

impl<T, P, X> Paginator<T, P, X, WithTotal<P>> {
    /// Total item count from the latest response (0 before the first fetch).
    pub fn total(&self) -> u64 {
        self.total.cell().get()
    }

    pub fn subscribe_total(&self) -> watch::Receiver<u64> {
        self.total.cell().subscribe()
    }
}

impl<T, P, X, M> Paginator<T, P, X, M>
where
    P: DeserializeOwned + Send + 'static,
    X: Transport,
    M: TotalMode<P>,
{
    /// Fetch page `page`, clamped into `[1, last page]` once the last page is known.
    ///
    /// Returns the payload of the last request made, which is the corrected one when
    /// the server reported fewer pages than requested.
    pub async fn go_to_page(&self, page: i64) -> Result<P> {
        let target = self.clamp(page);
        self.set_current_page(target);
        self.fetch().await
    }

    /// Fetch the following page, staying on the last one.
    pub async fn next(&self) -> Result<P> {
        let last = self.last_page.get().unwrap_or(1);
        let target = self.current_page().saturating_add(1).min(last);
        self.go_to_page(i64::from(target)).await
    }

    /// Fetch the preceding page, staying on the first one.
    pub async fn previous(&self) -> Result<P> {
        let target = self.current_page().saturating_sub(1).max(1);
        self.go_to_page(i64::from(target)).await
    }

    /// Fetch the current page again, e.g. after the extra params changed.
    pub async fn refresh(&self) -> Result<P> {
        self.fetch().await
    }

    /// The only path that talks to the transport.
    ///
    /// A correction sets the current page to the freshly learned last page, which
    /// is strictly lower than before, so the loop ends after at most one extra
    /// request for a server whose page count does not change in between.
    async fn fetch(&self) -> Result<P> {
        let _loading = LoadingGuard::start(&self.loading, &self.in_flight);

        loop {
            let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let requested = self.current_page();
            let params = self.request_params(requested);

            debug!("GET {} {:?}", self.url, params);
            let payload: P = self
                .transport
                .get(&self.url, &params)
                .await
                .map_err(|e| PaginateError::transport(&self.url, e))?;

            let extracted = self.extract(&payload)?;

            if self.discard_stale && self.generation.load(Ordering::SeqCst) != ticket {
                debug!("Discarding stale response for page {} of {}", requested, self.url);
                return Ok(payload);
            }

            let last = self.commit(extracted);
            let current = self.current_page();

            if current > last {
                warn!(
                    "Page {} is beyond the last page {} of {}, fetching page {} instead",
                    current, last, self.url, last
                );
                self.set_current_page(last);
                continue;
            }

            return Ok(payload);
        }
    }

    fn request_params(&self, page: u32) -> QueryParams {
        let mut params = QueryParams::new()
            .with(self.limit_field.as_str(), self.results_per_page.get().max(1))
            .with(self.page_field.as_str(), page);
        self.params.with(|extra| params.merge(extra));
        params
    }

    fn extract(&self, payload: &P) -> Result<Extracted<T, M::Measured>> {
        let items = (self.data_transformer)(payload)
            .map_err(|e| PaginateError::transform("data", e))?;
        let total_pages = (self.total_pages_transformer)(payload)
            .map_err(|e| PaginateError::transform("total pages", e))?;
        let total = self.total.measure(payload)?;

        Ok(Extracted {
            items,
            last_page: to_last_page(total_pages),
            total,
        })
    }

    fn commit(&self, extracted: Extracted<T, M::Measured>) -> u32 {
        self.data.replace(extracted.items);
        self.last_page.set(Some(extracted.last_page));
        self.total.commit(extracted.total);
        self.refresh_pages();
        extracted.last_page
    }
}

impl<T, P, X, M> Paginator<T, P, X, M>
where
    M: TotalMode<P>,
{
    pub fn current_page(&self) -> u32 {
        self.current_page.get()
    }

    /// Last page reported by the server, 1 until the first fetch completed.
    pub fn last_page(&self) -> u32 {
        self.last_page.get().unwrap_or(1)
    }

    /// Whether a response has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.last_page.get().is_some()
    }

    /// Page numbers to render, empty until the last page is known.
    pub fn pages(&self) -> Vec<u32> {
        self.pages.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run `f` against the items of the latest page without cloning them.
    ///
    /// `f` runs while the data cell is read-locked. Navigating or writing the data
    /// from inside `f` blocks forever, so keep it to reading the items.
    pub fn with_data<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.data.with(|items| f(items.as_slice()))
    }

    /// Handle on the page size cell; writes apply from the next fetch on.
    pub fn results_per_page(&self) -> Reactive<u32> {
        self.results_per_page.clone()
    }

    /// Handle on the extra query params; writes apply from the next fetch on.
    pub fn params(&self) -> Reactive<QueryParams> {
        self.params.clone()
    }

    pub fn subscribe_current_page(&self) -> watch::Receiver<u32> {
        self.current_page.subscribe()
    }

    pub fn subscribe_last_page(&self) -> watch::Receiver<Option<u32>> {
        self.last_page.subscribe()
    }

    pub fn subscribe_pages(&self) -> watch::Receiver<Vec<u32>> {
        self.pages.subscribe()
    }

    pub fn subscribe_data(&self) -> watch::Receiver<Vec<T>> {
        self.data.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    fn clamp(&self, page: i64) -> u32 {
        let upper = self.last_page.get().unwrap_or(u32::MAX);
        let clamped = page.clamp(1, i64::from(upper));
        u32::try_from(clamped).unwrap_or(upper)
    }

    fn set_current_page(&self, page: u32) {
        if self.current_page.set(page) {
            self.refresh_pages();
            if let Some(on_update) = &self.on_update {
                on_update(page);
            }
        }
    }

    /// Recomputes the window from the inputs read under the pages write lock, so
    /// concurrent callers cannot store a window for inputs that were already replaced.
    fn refresh_pages(&self) {
        self.pages.update(|pages| {
            let fresh = match self.last_page.get() {
                Some(last) => page_window(self.current_page(), last, self.window),
                None => Vec::new(),
            };
            if *pages == fresh {
                return false;
            }
            *pages = fresh;
            true
        });
    }
}

impl<T: Clone, P, X, M> Paginator<T, P, X, M>
where
    M: TotalMode<P>,
{
    /// Items of the latest page.
    pub fn data(&self) -> Vec<T> {
        self.data.get()
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        PageSnapshot {
            current_page: self.current_page(),
            last_page: self.last_page(),
            pages: self.pages(),
            results_per_page: self.results_per_page.get(),
            loading: self.is_loading(),
            total: self.total.current(),
            items: self.data(),
        }
    }
}

/// Page counts below 1 would make every page unreachable.
fn to_last_page(total_pages: i64) -> u32 {
    u32::try_from(total_pages.max(1)).unwrap_or(u32::MAX)
}

/// Keeps `loading` true while at least one request of the controller is in flight.
struct LoadingGuard<'a> {
    loading: &'a Reactive<bool>,
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn start(loading: &'a Reactive<bool>, in_flight: &'a AtomicUsize) -> Self {
        // counter changes happen under the cell's write lock
        loading.update(|flag| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            let changed = !*flag;
            *flag = true;
            changed
        });
        Self { loading, in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.loading.update(|flag| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 && *flag {
                *flag = false;
                true
            } else {
                false
            }
        });
    }
}
