pub mod browse;

pub use browse::BrowseService;
