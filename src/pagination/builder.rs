use std::sync::atomic::{AtomicU64, AtomicUsize};

use super::controller::{DataFn, Paginator, UpdateFn};
use super::total::{CountFn, NoTotal, TotalMode, WithTotal};
use super::window::WindowOptions;
use crate::config::PaginateSettings;
use crate::state::Reactive;
use crate::transport::QueryParams;

/// Collects the options of a [`Paginator`].
///
/// Created by [`Paginator::builder`]; the data and total-page transformers are
/// required up front, everything else falls back to [`PaginateSettings::default`].
pub struct PaginatorBuilder<T, P, X, M = NoTotal> {
    transport: X,
    url: String,
    settings: PaginateSettings,
    results_per_page: Option<Reactive<u32>>,
    params: Reactive<QueryParams>,
    data: DataFn<T, P>,
    total_pages: CountFn<P, i64>,
    total: M,
    on_update: Option<UpdateFn>,
}

impl<T, P, X> PaginatorBuilder<T, P, X, NoTotal> {
    pub(crate) fn new(
        transport: X,
        url: String,
        data: DataFn<T, P>,
        total_pages: CountFn<P, i64>,
    ) -> Self {
        Self {
            transport,
            url,
            settings: PaginateSettings::default(),
            results_per_page: None,
            params: Reactive::default(),
            data,
            total_pages,
            total: NoTotal,
            on_update: None,
        }
    }

    /// Track the total item count; the built controller gains `total()`.
    pub fn total_transformer<F>(self, transformer: F) -> PaginatorBuilder<T, P, X, WithTotal<P>>
    where
        F: Fn(&P) -> anyhow::Result<u64> + Send + Sync + 'static,
    {
        PaginatorBuilder {
            transport: self.transport,
            url: self.url,
            settings: self.settings,
            results_per_page: self.results_per_page,
            params: self.params,
            data: self.data,
            total_pages: self.total_pages,
            total: WithTotal::new(Box::new(transformer)),
            on_update: self.on_update,
        }
    }
}

impl<T, P, X, M: TotalMode<P>> PaginatorBuilder<T, P, X, M> {
    /// Replace every plain option at once.
    pub fn settings(mut self, settings: PaginateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn page_field(mut self, field: impl Into<String>) -> Self {
        self.settings.page_field = field.into();
        self
    }

    pub fn limit_field(mut self, field: impl Into<String>) -> Self {
        self.settings.limit_field = field.into();
        self
    }

    pub fn current_page(mut self, page: u32) -> Self {
        self.settings.current_page = page;
        self
    }

    /// Fixed page size.
    pub fn results_per_page(mut self, limit: u32) -> Self {
        self.settings.results_per_page = limit;
        self.results_per_page = None;
        self
    }

    /// Page size read from a cell the caller keeps and may change between fetches.
    pub fn shared_results_per_page(mut self, limit: Reactive<u32>) -> Self {
        self.results_per_page = Some(limit);
        self
    }

    pub fn range(mut self, range: u32) -> Self {
        self.settings.range = range;
        self
    }

    pub fn include_limits(mut self, include: bool) -> Self {
        self.settings.include_limits = include;
        self
    }

    /// Extra query parameters merged over page and limit on every request.
    pub fn params(mut self, params: Reactive<QueryParams>) -> Self {
        self.params = params;
        self
    }

    /// Called with the new page every time the current page changes.
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Ignore responses that were overtaken by a later request.
    pub fn discard_stale_responses(mut self, discard: bool) -> Self {
        self.settings.discard_stale_responses = discard;
        self
    }

    pub fn build(self) -> Paginator<T, P, X, M> {
        let settings = self.settings;
        let results_per_page = self
            .results_per_page
            .unwrap_or_else(|| Reactive::new(settings.results_per_page.max(1)));

        Paginator {
            transport: self.transport,
            url: self.url,
            page_field: settings.page_field,
            limit_field: settings.limit_field,
            window: WindowOptions::new(settings.range, settings.include_limits),
            discard_stale: settings.discard_stale_responses,
            data_transformer: self.data,
            total_pages_transformer: self.total_pages,
            total: self.total,
            on_update: self.on_update,
            params: self.params,
            results_per_page,
            current_page: Reactive::new(settings.current_page.max(1)),
            last_page: Reactive::new(None),
            data: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
            pages: Reactive::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
        }
    }
}
