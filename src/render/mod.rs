mod markdown;

pub use self::markdown::{markdown, visible_items};
