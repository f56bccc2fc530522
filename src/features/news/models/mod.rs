mod news;

pub use news::{parse_tags, CreateNews, News, NewsCategory};
