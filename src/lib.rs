pub mod cli;
pub mod config;
pub mod errors;
pub mod http;
pub mod pagination;
pub mod parsers;
pub mod rate_limiter;
pub mod services;
pub mod state;
pub mod transport;
pub mod view;

pub use errors::PaginateError;
pub use http::HttpTransport;
pub use pagination::{
    page_window, NoTotal, PageSnapshot, Paginator, PaginatorBuilder, TotalMode, WindowOptions,
    WithTotal,
};
pub use state::Reactive;
pub use transport::{ParamValue, QueryParams, Transport};

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::{BrowseArgs, Command};
use crate::config::AppConfig;
use crate::services::BrowseService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_browse(args: &BrowseArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = BrowseService::new(config, args.clone());
        service.run().await
    })
}

pub fn handle_window(current: u32, last: u32, range: u32, no_limits: bool) -> Result<()> {
    let last = last.max(1);
    let current = current.clamp(1, last);
    let pages = page_window(current, last, WindowOptions::new(range, !no_limits));
    println!("{}", view::render_window(&pages, current));
    Ok(())
}
