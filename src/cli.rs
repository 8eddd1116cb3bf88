use clap::{Args, Parser, Subcommand};

use crate::errors::param_context;
use crate::transport::ParamValue;

#[derive(Parser, Debug)]
#[command(author, version, about = "page-control: browse paginated listings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fetch one page of a remote listing and print it
    Browse(BrowseArgs),
    /// Print the page window for a position without fetching anything
    Window {
        /// Current page
        #[arg(short, long)]
        current: u32,
        /// Last page
        #[arg(short, long)]
        last: u32,
        /// Number of consecutive pages around the current one
        #[arg(short, long, default_value_t = 5)]
        range: u32,
        /// Do not pin the first and last page into the window
        #[arg(long)]
        no_limits: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BrowseArgs {
    /// Listing URL; relative URLs are resolved against PAGE_CONTROL_BASE_URL
    pub url: String,
    /// Page to fetch (clamped into the pages the server reports)
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,
    /// Results per page
    #[arg(short, long, default_value_t = 25)]
    pub limit: u32,
    /// Number of consecutive pages shown around the current one
    #[arg(short, long, default_value_t = 5)]
    pub range: u32,
    /// Do not pin the first and last page into the window
    #[arg(long)]
    pub no_limits: bool,
    /// Query parameter carrying the page number
    #[arg(long, default_value = "page")]
    pub page_field: String,
    /// Query parameter carrying the page size
    #[arg(long, default_value = "limit")]
    pub limit_field: String,
    /// JSON pointer to the items of a page
    #[arg(long, default_value = "/data")]
    pub data_pointer: String,
    /// JSON pointer to the number of pages
    #[arg(long, default_value = "/pagination/totalPage")]
    pub total_pages_pointer: String,
    /// JSON pointer to the total number of items
    #[arg(long)]
    pub total_pointer: Option<String>,
    /// Extra query parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, ParamValue)>,
    /// Print the page state as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), ParamValue::infer(value)))
        }
        _ => Err(param_context(raw)),
    }
}
