pub mod detection;
pub mod item;
pub mod loaders;
pub mod order;
pub mod report;

pub use detection::Detection;
pub use item::{ItemLabel, QuantityMapping};
pub use loaders::load_order_book;
pub use order::{Order, OrderBook, OrderStatus};
pub use report::ReconcileReport;
