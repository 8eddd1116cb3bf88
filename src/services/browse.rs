use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use crate::cli::BrowseArgs;
use crate::config::{AppConfig, PaginateSettings};
use crate::http::HttpTransport;
use crate::pagination::{Paginator, TotalMode};
use crate::parsers;
use crate::state::Reactive;
use crate::transport::QueryParams;
use crate::view::render_page_state;

type JsonPaginator<M> = Paginator<Value, Value, HttpTransport, M>;

/// Fetches one page of an arbitrary JSON listing and prints it
pub struct BrowseService {
    config: AppConfig,
    args: BrowseArgs,
}

impl BrowseService {
    pub fn new(config: AppConfig, args: BrowseArgs) -> Self {
        Self { config, args }
    }

    pub async fn run(self) -> Result<()> {
        let transport = HttpTransport::new(&self.config.transport)?;
        let settings = self.paginate_settings();
        let params: QueryParams = self.args.params.iter().cloned().collect();

        let data_pointer = self.args.data_pointer.clone();
        let pages_pointer = self.args.total_pages_pointer.clone();
        let builder = Paginator::builder(
            transport,
            self.args.url.as_str(),
            move |body: &Value| parsers::items_at(body, &data_pointer),
            move |body: &Value| parsers::count_at(body, &pages_pointer),
        )
        .settings(settings)
        .params(Reactive::new(params));

        match self.args.total_pointer.clone() {
            Some(total_pointer) => {
                let paginator = builder
                    .total_transformer(move |body: &Value| parsers::total_at(body, &total_pointer))
                    .build();
                self.show(&paginator).await
            }
            None => self.show(&builder.build()).await,
        }
    }

    fn paginate_settings(&self) -> PaginateSettings {
        PaginateSettings {
            page_field: self.args.page_field.clone(),
            limit_field: self.args.limit_field.clone(),
            results_per_page: self.args.limit,
            range: self.args.range,
            include_limits: !self.args.no_limits,
            ..PaginateSettings::default()
        }
    }

    async fn show<M: TotalMode<Value>>(&self, paginator: &JsonPaginator<M>) -> Result<()> {
        info!("Fetching page {} of {}", self.args.page, paginator.url());

        paginator
            .go_to_page(self.args.page)
            .await
            .with_context(|| format!("Failed to load page {} of {}", self.args.page, paginator.url()))?;

        let snapshot = paginator.snapshot();
        if i64::from(snapshot.current_page) != self.args.page {
            info!("Showing page {} instead of {}", snapshot.current_page, self.args.page);
        }

        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", render_page_state(&snapshot)?);
        }
        Ok(())
    }
}
