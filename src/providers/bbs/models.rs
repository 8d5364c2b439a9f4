// Файл: providers/bbs/models.rs
// Модели ответов BBS API и ошибка провайдера.

use crate::core::error::CoreError;
use crate::core::json::nullable;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

// --- Ошибка ---

#[derive(Debug, thiserror::Error)]
pub enum BbsError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// API ответило `retcode != 0`.
    #[error("BBS API error {retcode}: {message}")]
    Api { retcode: i64, message: String },

    /// Тело ответа не удалось разобрать; текст сохраняется как есть.
    #[error("Unexpected response for {context}: {body}")]
    UnexpectedBody { context: String, body: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<reqwest::Error> for BbsError {
    fn from(e: reqwest::Error) -> Self {
        BbsError::Core(CoreError::Network(e))
    }
}

// --- Конверт ответа ---

/// Общая обёртка `{retcode, message, data}`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Отсутствующий или `null` код считается успехом (0).
    #[serde(default, deserialize_with = "nullable")]
    pub retcode: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    pub data: Option<T>,
}

impl<T: Default> ApiResponse<T> {
    /// Проверяет `retcode` и отдаёт `data`.
    /// При успехе без `data` возвращается `T::default()`.
    pub fn into_data(self) -> Result<T, BbsError> {
        if self.retcode != 0 {
            return Err(BbsError::Api {
                retcode: self.retcode,
                message: self.message,
            });
        }
        Ok(self.data.unwrap_or_default())
    }
}

// --- Миссии (задания на монеты) ---

/// Ежедневные задания, за которые начисляются монеты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mission {
    BbsSign,
    ReadPosts,
    LikePosts,
    Share,
}

impl Mission {
    /// Порядок, в котором миссии проверяются и выполняются.
    pub const ALL: [Mission; 4] = [
        Mission::BbsSign,
        Mission::ReadPosts,
        Mission::LikePosts,
        Mission::Share,
    ];

    pub fn id(self) -> i64 {
        match self {
            Mission::BbsSign => 58,
            Mission::ReadPosts => 59,
            Mission::LikePosts => 60,
            Mission::Share => 61,
        }
    }

    pub fn from_id(id: i64) -> Option<Mission> {
        Mission::ALL.into_iter().find(|m| m.id() == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MissionState {
    #[serde(deserialize_with = "nullable")]
    pub mission_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub process: i64,
    #[serde(deserialize_with = "nullable")]
    pub happened_times: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_get_award: bool,
    #[serde(deserialize_with = "nullable")]
    pub mission_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TasksInfo {
    #[serde(deserialize_with = "nullable")]
    pub states: Vec<MissionState>,
    /// Монет получено сегодня.
    #[serde(deserialize_with = "nullable")]
    pub already_received_points: i64,
    /// Всего монет на счету.
    #[serde(deserialize_with = "nullable")]
    pub total_points: i64,
    /// Дневной лимит.
    #[serde(deserialize_with = "nullable")]
    pub today_total_points: i64,
    /// Аккаунт без подтверждения личности.
    #[serde(deserialize_with = "nullable")]
    pub is_unclaimed: bool,
    /// Сколько ещё можно получить сегодня.
    #[serde(deserialize_with = "nullable")]
    pub can_get_points: i64,
}

impl TasksInfo {
    /// Миссии без единой записи в `states`, в порядке `Mission::ALL`.
    /// Наличие записи считается выполнением независимо от `is_get_award`.
    pub fn incomplete_missions(&self) -> Vec<Mission> {
        let done: HashSet<Mission> = self
            .states
            .iter()
            .filter_map(|s| Mission::from_id(s.mission_id))
            .collect();
        Mission::ALL
            .into_iter()
            .filter(|m| !done.contains(m))
            .collect()
    }
}

// --- Посты ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostStatus {
    #[serde(deserialize_with = "nullable")]
    pub is_top: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_good: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_official: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Post {
    #[serde(deserialize_with = "nullable")]
    pub game_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub post_id: String,
    #[serde(deserialize_with = "nullable")]
    pub f_forum_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub uid: String,
    #[serde(deserialize_with = "nullable")]
    pub subject: String,
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    #[serde(deserialize_with = "nullable")]
    pub cover: String,
    #[serde(deserialize_with = "nullable")]
    pub view_type: i64,
    #[serde(deserialize_with = "nullable")]
    pub created_at: i64,
    #[serde(deserialize_with = "nullable")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub post_status: PostStatus,
    #[serde(deserialize_with = "nullable")]
    pub topic_ids: Vec<i64>,
    #[serde(deserialize_with = "nullable")]
    pub view_status: i64,
    #[serde(deserialize_with = "nullable")]
    pub max_floor: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_original: i64,
    #[serde(deserialize_with = "nullable")]
    pub republish_authorization: i64,
    #[serde(deserialize_with = "nullable")]
    pub reply_time: String,
    #[serde(deserialize_with = "nullable")]
    pub is_deleted: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_interactive: bool,
    #[serde(deserialize_with = "nullable")]
    pub structured_content: String,
    #[serde(deserialize_with = "nullable")]
    pub structured_content_rows: Vec<Value>,
    #[serde(deserialize_with = "nullable")]
    pub review_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_profit: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_in_profit: bool,
    #[serde(deserialize_with = "nullable")]
    pub updated_at: i64,
    #[serde(deserialize_with = "nullable")]
    pub deleted_at: i64,
    #[serde(deserialize_with = "nullable")]
    pub pre_pub_status: i64,
    #[serde(deserialize_with = "nullable")]
    pub cate_id: i64,
}

impl Post {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_at, 0).single()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForumRef {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub icon: String,
    #[serde(deserialize_with = "nullable")]
    pub game_id: i64,
    pub forum_cate: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Topic {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cover: String,
    #[serde(deserialize_with = "nullable")]
    pub is_top: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_good: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_interactive: bool,
    #[serde(deserialize_with = "nullable")]
    pub game_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub content_type: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Certification {
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub type_: i64,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelExp {
    #[serde(deserialize_with = "nullable")]
    pub level: i64,
    #[serde(deserialize_with = "nullable")]
    pub exp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostAuthor {
    #[serde(deserialize_with = "nullable")]
    pub uid: String,
    #[serde(deserialize_with = "nullable")]
    pub nickname: String,
    #[serde(deserialize_with = "nullable")]
    pub introduce: String,
    #[serde(deserialize_with = "nullable")]
    pub avatar: String,
    #[serde(deserialize_with = "nullable")]
    pub gender: i64,
    #[serde(deserialize_with = "nullable")]
    pub certification: Certification,
    #[serde(deserialize_with = "nullable")]
    pub level_exp: LevelExp,
    #[serde(deserialize_with = "nullable")]
    pub is_following: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_followed: bool,
    #[serde(deserialize_with = "nullable")]
    pub avatar_url: String,
    #[serde(deserialize_with = "nullable")]
    pub pendant: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelfOperation {
    /// 1: пост уже лайкнут текущим пользователем.
    #[serde(deserialize_with = "nullable")]
    pub attitude: i64,
    #[serde(deserialize_with = "nullable")]
    pub is_collected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostStat {
    #[serde(deserialize_with = "nullable")]
    pub view_num: i64,
    #[serde(deserialize_with = "nullable")]
    pub reply_num: i64,
    #[serde(deserialize_with = "nullable")]
    pub like_num: i64,
    #[serde(deserialize_with = "nullable")]
    pub bookmark_num: i64,
    #[serde(deserialize_with = "nullable")]
    pub forward_num: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HelpSys {
    pub top_up: Value,
    #[serde(deserialize_with = "nullable")]
    pub top_n: Vec<Value>,
    #[serde(deserialize_with = "nullable")]
    pub answer_num: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageCrop {
    #[serde(deserialize_with = "nullable")]
    pub x: i64,
    #[serde(deserialize_with = "nullable")]
    pub y: i64,
    #[serde(deserialize_with = "nullable")]
    pub w: i64,
    #[serde(deserialize_with = "nullable")]
    pub h: i64,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub height: i64,
    #[serde(deserialize_with = "nullable")]
    pub width: i64,
    #[serde(deserialize_with = "nullable")]
    pub format: String,
    #[serde(deserialize_with = "nullable")]
    pub size: String,
    pub crop: Option<ImageCrop>,
    #[serde(deserialize_with = "nullable")]
    pub is_user_set_cover: bool,
    #[serde(deserialize_with = "nullable")]
    pub image_id: String,
    #[serde(deserialize_with = "nullable")]
    pub entity_type: String,
    #[serde(deserialize_with = "nullable")]
    pub entity_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VodResolution {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub definition: String,
    #[serde(deserialize_with = "nullable")]
    pub height: i64,
    #[serde(deserialize_with = "nullable")]
    pub width: i64,
    #[serde(deserialize_with = "nullable")]
    pub bitrate: i64,
    #[serde(deserialize_with = "nullable")]
    pub size: String,
    #[serde(deserialize_with = "nullable")]
    pub format: String,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Vod {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub duration: i64,
    #[serde(deserialize_with = "nullable")]
    pub cover: String,
    #[serde(deserialize_with = "nullable")]
    pub resolutions: Vec<VodResolution>,
    #[serde(deserialize_with = "nullable")]
    pub view_num: i64,
    #[serde(deserialize_with = "nullable")]
    pub transcoding_status: i64,
    #[serde(deserialize_with = "nullable")]
    pub review_status: i64,
}

/// Пост вместе с разделом, автором и статистикой, как его отдаёт приложение.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppForumInfo {
    #[serde(deserialize_with = "nullable")]
    pub post: Post,
    #[serde(deserialize_with = "nullable")]
    pub forum: ForumRef,
    #[serde(deserialize_with = "nullable")]
    pub topics: Vec<Topic>,
    #[serde(deserialize_with = "nullable")]
    pub user: PostAuthor,
    #[serde(deserialize_with = "nullable")]
    pub self_operation: SelfOperation,
    #[serde(deserialize_with = "nullable")]
    pub stat: PostStat,
    #[serde(deserialize_with = "nullable")]
    pub help_sys: HelpSys,
    pub cover: Option<Image>,
    #[serde(deserialize_with = "nullable")]
    pub image_list: Vec<Image>,
    #[serde(deserialize_with = "nullable")]
    pub is_official_master: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_user_master: bool,
    #[serde(deserialize_with = "nullable")]
    pub hot_reply_exist: bool,
    #[serde(deserialize_with = "nullable")]
    pub vote_count: i64,
    #[serde(deserialize_with = "nullable")]
    pub last_modify_time: i64,
    #[serde(deserialize_with = "nullable")]
    pub recommend_type: String,
    pub collection: Value,
    #[serde(deserialize_with = "nullable")]
    pub vod_list: Vec<Vod>,
    #[serde(deserialize_with = "nullable")]
    pub is_block_on: bool,
    pub forum_rank_info: Value,
    #[serde(deserialize_with = "nullable")]
    pub link_card_list: Vec<Value>,
}

impl AppForumInfo {
    pub fn post_id(&self) -> &str {
        &self.post.post_id
    }

    pub fn is_liked(&self) -> bool {
        self.self_operation.attitude == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostListPage {
    #[serde(deserialize_with = "nullable")]
    pub list: Vec<AppForumInfo>,
    #[serde(deserialize_with = "nullable")]
    pub last_id: String,
    #[serde(deserialize_with = "nullable")]
    pub is_last: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_origin: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostDetailData {
    #[serde(deserialize_with = "nullable")]
    pub post: AppForumInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostShareInfo {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    #[serde(deserialize_with = "nullable")]
    pub icon: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignResult {
    /// Монеты, начисленные за отметку.
    #[serde(deserialize_with = "nullable")]
    pub points: i64,
}

// --- Тела POST-запросов ---

#[derive(Debug, Serialize)]
pub(super) struct VoteBody<'a> {
    pub post_id: &'a str,
    pub is_cancel: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct SignBody<'a> {
    pub gids: &'a str,
}

// --- Разделы ---

/// Известные разделы сообщества. Для отметки нужен `gids`,
/// для списка постов нужен `forum_id`; они не совпадают.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    HonkaiImpact3,
    Genshin,
    HonkaiGakuen2,
    TearsOfThemis,
    Dabieye,
    StarRail,
    ZenlessZoneZero,
}

impl Board {
    pub const ALL: [Board; 7] = [
        Board::HonkaiImpact3,
        Board::Genshin,
        Board::HonkaiGakuen2,
        Board::TearsOfThemis,
        Board::Dabieye,
        Board::StarRail,
        Board::ZenlessZoneZero,
    ];

    pub fn gids(self) -> &'static str {
        match self {
            Board::HonkaiImpact3 => "1",
            Board::Genshin => "2",
            Board::HonkaiGakuen2 => "3",
            Board::TearsOfThemis => "4",
            Board::Dabieye => "5",
            Board::StarRail => "6",
            Board::ZenlessZoneZero => "8",
        }
    }

    pub fn forum_id(self) -> &'static str {
        match self {
            Board::HonkaiImpact3 => "1",
            Board::Genshin => "26",
            Board::HonkaiGakuen2 => "30",
            Board::TearsOfThemis => "37",
            Board::Dabieye => "34",
            Board::StarRail => "52",
            Board::ZenlessZoneZero => "57",
        }
    }
}
