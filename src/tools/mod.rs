pub mod analyze_links;
pub mod normalize_urls;
pub mod reset;
pub mod toggle_keyword;

pub use analyze_links::*;
pub use normalize_urls::*;
pub use reset::*;
pub use toggle_keyword::*;
