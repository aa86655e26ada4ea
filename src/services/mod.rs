pub mod detection_filter;
pub mod item_parser;
pub mod order_comparator;
pub mod order_store;
pub mod vision_service;

pub use detection_filter::{filter_detections, FilteredDetections};
pub use item_parser::{parse, parse_line, parse_lines, LineRule, ParsedLine};
pub use order_comparator::{compare, Comparison};
pub use order_store::{InMemoryOrderStore, OrderStore};
pub use vision_service::{VisionAnalyzer, VisionService};
