pub mod news_handler;

pub use news_handler::{
    __path_get_news, __path_list_my_news, __path_list_published_news, __path_submit_news,
    get_news, list_my_news, list_published_news, submit_news,
};
