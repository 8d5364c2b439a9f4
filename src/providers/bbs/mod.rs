// Файл: providers/bbs/mod.rs
// Мобильное API сообщества: модели, эндпоинты, заголовки и запросы.

pub mod daily;
pub mod endpoints;
pub mod headers;
pub mod models;
pub mod requests;

pub use daily::{DailyPlan, DailyReport};
pub use models::{
    AppForumInfo, BbsError, Board, Mission, MissionState, PostListPage, PostShareInfo, TasksInfo,
};
pub use requests::AppClient;
