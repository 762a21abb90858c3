pub mod hit_testing;

pub use hit_testing::{distance_to_line_segment, is_over_image, is_over_resize_handle, point_in_triangle};
