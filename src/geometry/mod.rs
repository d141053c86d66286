pub mod hit_testing;

pub use hit_testing::{Corner, handle_at, handle_rect, resize_rect};
