pub mod toml_loader;

pub use toml_loader::{load_order_book, load_orders_or_demo};
