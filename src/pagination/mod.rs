mod builder;
mod controller;
mod total;
mod window;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::PaginatorBuilder;
pub use controller::{PageSnapshot, Paginator};
pub use total::{NoTotal, TotalMode, WithTotal};
pub use window::{page_window, WindowOptions};
