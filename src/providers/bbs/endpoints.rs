// Файл: providers/bbs/endpoints.rs
// Описание эндпоинтов BBS API: метод, путь и постоянные query-параметры.

use crate::core::error::CoreError;
use reqwest::Method;
use url::Url;

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Параметры, которые не меняются от вызова к вызову.
    pub fixed_query: &'static [(&'static str, &'static str)],
}

pub const TASKS_LIST: Endpoint = Endpoint {
    name: "getUserMissionsState",
    method: Method::GET,
    path: "/apihub/sapi/getUserMissionsState",
    fixed_query: &[("point_sn", "myb")],
};

pub const POSTS_LIST: Endpoint = Endpoint {
    name: "getForumPostList",
    method: Method::GET,
    path: "/post/api/getForumPostList",
    fixed_query: &[("is_good", "false"), ("is_hot", "false"), ("sort_type", "1")],
};

pub const POST_DETAIL: Endpoint = Endpoint {
    name: "getPostFull",
    method: Method::GET,
    path: "/post/api/getPostFull",
    fixed_query: &[],
};

pub const POST_LIKE: Endpoint = Endpoint {
    name: "upvotePost",
    method: Method::POST,
    path: "/apihub/sapi/upvotePost",
    fixed_query: &[],
};

pub const POST_SHARE: Endpoint = Endpoint {
    name: "getShareConf",
    method: Method::GET,
    path: "/apihub/api/getShareConf",
    fixed_query: &[("entity_type", "1")],
};

pub const BBS_SIGN: Endpoint = Endpoint {
    name: "signIn",
    method: Method::POST,
    path: "/apihub/app/api/signIn",
    fixed_query: &[],
};

impl Endpoint {
    /// Собирает полный URL: `base + path`, затем переменные параметры,
    /// затем постоянные. Значения кодируются через `url`.
    pub fn url(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, CoreError> {
        let mut url = base.join(self.path)?;

        if !params.is_empty() || !self.fixed_query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter().chain(self.fixed_query.iter()) {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
