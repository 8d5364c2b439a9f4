// Файл: providers/bbs/requests.rs
// Методы BBS API: задания, посты, лайки, репосты и отметка в разделах.

use super::endpoints::{self, Endpoint};
use super::headers::HeaderBuilder;
use super::models::{
    ApiResponse, AppForumInfo, BbsError, Mission, PostDetailData, PostListPage, PostShareInfo,
    SignBody, SignResult, TasksInfo, VoteBody,
};
use crate::core::config::ClientConfig;
use crate::core::credentials::CookieProvider;
use crate::core::error::CoreError;
use crate::core::{http, json};
use log::{debug, info, warn};
use reqwest::header::HeaderMap;
use reqwest::{Client, Request};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

/// Клиент мобильного API. Каждый метод делает один HTTP-запрос без повторов.
pub struct AppClient {
    client: Client,
    base: Url,
    headers: HeaderBuilder,
}

impl AppClient {
    pub fn new(config: ClientConfig, cookies: Arc<dyn CookieProvider>) -> Result<Self, BbsError> {
        let client = http::create_http_client(&config)?;
        let base = Url::parse(&config.api_base).map_err(CoreError::from)?;
        let headers = HeaderBuilder::new(config, cookies);

        debug!("BBS client created for {} (device {})", base, headers.device_id());

        Ok(Self {
            client,
            base,
            headers,
        })
    }

    pub fn with_cookies<C>(config: ClientConfig, cookies: C) -> Result<Self, BbsError>
    where
        C: CookieProvider + 'static,
    {
        Self::new(config, Arc::new(cookies))
    }

    pub fn device_id(&self) -> &str {
        self.headers.device_id()
    }

    // --- Задания ---

    /// Состояние ежедневных заданий и баланс монет.
    pub async fn get_tasks_info(&self) -> Result<TasksInfo, BbsError> {
        debug!("Fetching mission states");
        let request = self.tasks_info_request()?;
        self.call(&endpoints::TASKS_LIST, request).await
    }

    /// Невыполненные ежедневные задания (отметка, чтение, лайки, репост).
    pub async fn get_tasks_incomplete_id_list(&self) -> Result<Vec<Mission>, BbsError> {
        let info = self.get_tasks_info().await?;
        let pending = info.incomplete_missions();
        info!(
            "Missions pending: {:?} (received today: {}/{})",
            pending, info.already_received_points, info.today_total_points
        );
        Ok(pending)
    }

    // --- Посты ---

    pub async fn get_posts_list(
        &self,
        forum_id: &str,
        page_size: u32,
    ) -> Result<Vec<AppForumInfo>, BbsError> {
        Ok(self.get_posts_page(forum_id, page_size).await?.list)
    }

    /// То же, что `get_posts_list`, но вместе с `last_id`/`is_last`.
    pub async fn get_posts_page(
        &self,
        forum_id: &str,
        page_size: u32,
    ) -> Result<PostListPage, BbsError> {
        debug!("Fetching post list: forum {} (size {})", forum_id, page_size);
        let request = self.posts_list_request(forum_id, page_size)?;
        self.call(&endpoints::POSTS_LIST, request).await
    }

    /// Открывает пост (засчитывается как просмотр).
    pub async fn post_detail(&self, post_id: &str) -> Result<AppForumInfo, BbsError> {
        debug!("Reading post {}", post_id);
        let request = self.post_detail_request(post_id)?;
        let data: PostDetailData = self.call(&endpoints::POST_DETAIL, request).await?;
        Ok(data.post)
    }

    /// Лайк поста; `is_cancel = true` снимает лайк.
    pub async fn post_vote(&self, post_id: &str, is_cancel: bool) -> Result<(), BbsError> {
        debug!("Voting post {} (cancel: {})", post_id, is_cancel);
        let request = self.post_vote_request(post_id, is_cancel)?;
        let _: serde_json::Value = self.call(&endpoints::POST_LIKE, request).await?;
        Ok(())
    }

    pub async fn post_share(&self, post_id: &str) -> Result<PostShareInfo, BbsError> {
        debug!("Sharing post {}", post_id);
        let request = self.post_share_request(post_id)?;
        self.call(&endpoints::POST_SHARE, request).await
    }

    /// Отметка в разделе. Возвращает монеты, полученные за эту отметку.
    pub async fn bbs_sign(&self, forum_id: &str) -> Result<i64, BbsError> {
        debug!("Signing in board {}", forum_id);
        let request = self.bbs_sign_request(forum_id)?;
        let result: SignResult = self.call(&endpoints::BBS_SIGN, request).await?;
        info!("Board {} signed, +{} points", forum_id, result.points);
        Ok(result.points)
    }

    // --- Сборка запросов ---

    pub(crate) fn tasks_info_request(&self) -> Result<Request, BbsError> {
        self.get_request(&endpoints::TASKS_LIST, &[])
    }

    pub(crate) fn posts_list_request(
        &self,
        forum_id: &str,
        page_size: u32,
    ) -> Result<Request, BbsError> {
        require_non_empty(forum_id, "forum_id")?;
        if page_size == 0 {
            return Err(BbsError::InvalidArgument(
                "page_size must be greater than 0".to_string(),
            ));
        }
        let page_size = page_size.to_string();
        self.get_request(
            &endpoints::POSTS_LIST,
            &[("forum_id", forum_id), ("page_size", &page_size)],
        )
    }

    pub(crate) fn post_detail_request(&self, post_id: &str) -> Result<Request, BbsError> {
        require_non_empty(post_id, "post_id")?;
        self.get_request(&endpoints::POST_DETAIL, &[("post_id", post_id)])
    }

    pub(crate) fn post_share_request(&self, post_id: &str) -> Result<Request, BbsError> {
        require_non_empty(post_id, "post_id")?;
        self.get_request(&endpoints::POST_SHARE, &[("entity_id", post_id)])
    }

    pub(crate) fn post_vote_request(
        &self,
        post_id: &str,
        is_cancel: bool,
    ) -> Result<Request, BbsError> {
        require_non_empty(post_id, "post_id")?;
        let body = to_json(&VoteBody { post_id, is_cancel })?;
        let url = endpoints::POST_LIKE.url(&self.base, &[])?;
        let headers = self.headers.build_with_stoken()?;
        self.build(&endpoints::POST_LIKE, url, headers, Some(body))
    }

    pub(crate) fn bbs_sign_request(&self, forum_id: &str) -> Result<Request, BbsError> {
        require_non_empty(forum_id, "forum_id")?;
        // Подписывается ровно та строка, которая уйдёт в теле.
        let body = to_json(&SignBody { gids: forum_id })?;
        let url = endpoints::BBS_SIGN.url(&self.base, &[])?;
        let headers = self
            .headers
            .build_with_ds2(&body, url.query().unwrap_or_default())?;
        self.build(&endpoints::BBS_SIGN, url, headers, Some(body))
    }

    fn get_request(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Request, BbsError> {
        let url = endpoint.url(&self.base, params)?;
        let headers = self.headers.build()?;
        self.build(endpoint, url, headers, None)
    }

    fn build(
        &self,
        endpoint: &Endpoint,
        url: Url,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<Request, BbsError> {
        let mut builder = self
            .client
            .request(endpoint.method.clone(), url)
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }

    async fn call<T>(&self, endpoint: &Endpoint, request: Request) -> Result<T, BbsError>
    where
        T: DeserializeOwned + Default,
    {
        let text = http::send_text(&self.client, request)
            .await
            .map_err(|e| {
                if e.is_http_status() {
                    warn!("{} answered with HTTP error: {}", endpoint.name, e);
                }
                e
            })?;
        decode_response(endpoint.name, &text)
    }
}

/// Разбирает конверт `{retcode, message, data}` и проверяет `retcode`.
/// Если тело не JSON нужной формы, текст ответа возвращается в ошибке.
pub(crate) fn decode_response<T>(context: &str, text: &str) -> Result<T, BbsError>
where
    T: DeserializeOwned + Default,
{
    let response: ApiResponse<T> =
        json::parse_json_from_text(text, context).map_err(|_| BbsError::UnexpectedBody {
            context: context.to_string(),
            body: text.to_string(),
        })?;
    response.into_data()
}

fn to_json<T: serde::Serialize>(body: &T) -> Result<String, BbsError> {
    Ok(serde_json::to_string(body).map_err(CoreError::from)?)
}

fn require_non_empty(value: &str, name: &str) -> Result<(), BbsError> {
    if value.trim().is_empty() {
        return Err(BbsError::InvalidArgument(format!("{} must not be empty", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_DS2_SALT;
    use crate::core::credentials::StaticCookies;
    use crate::core::ds;
    use crate::core::test_server::{api_error, ok_json, TestServer};
    use reqwest::Method;

    fn client() -> AppClient {
        let config = ClientConfig {
            device_id: Some("device-1".to_string()),
            ..ClientConfig::default()
        };
        let cookies = StaticCookies::from_parts("ltoken=abc; ltuid=100", "100", "stoken-v1");
        AppClient::with_cookies(config, cookies).unwrap()
    }

    fn header<'a>(request: &'a Request, name: &str) -> &'a str {
        request.headers().get(name).unwrap().to_str().unwrap()
    }

    fn body(request: &Request) -> &str {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_invalid_api_base() {
        let config = ClientConfig {
            api_base: "not a url".to_string(),
            ..ClientConfig::default()
        };
        let result = AppClient::with_cookies(config, StaticCookies::new("a=1", "b=2"));
        assert!(matches!(
            result,
            Err(BbsError::Core(CoreError::UrlParse(_)))
        ));
    }

    #[test]
    fn test_tasks_info_request() {
        let request = client().tasks_info_request().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://bbs-api.mihoyo.com/apihub/sapi/getUserMissionsState?point_sn=myb"
        );
        assert_eq!(header(&request, "cookie"), "ltoken=abc; ltuid=100");
        assert_eq!(header(&request, "x-rpc-device_id"), "device-1");
        assert!(request.body().is_none());
    }

    #[test]
    fn test_posts_list_request() {
        let request = client().posts_list_request("26", 20).unwrap();
        let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert!(query.contains(&("forum_id".to_string(), "26".to_string())));
        assert!(query.contains(&("page_size".to_string(), "20".to_string())));
        assert!(query.contains(&("sort_type".to_string(), "1".to_string())));
        assert_eq!(request.url().path(), "/post/api/getForumPostList");
    }

    #[test]
    fn test_posts_list_rejects_zero_page_size() {
        assert!(matches!(
            client().posts_list_request("26", 0),
            Err(BbsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_detail_and_share_requests() {
        let c = client();
        let detail = c.post_detail_request("42").unwrap();
        assert_eq!(detail.url().path(), "/post/api/getPostFull");
        assert_eq!(detail.url().query(), Some("post_id=42"));

        let share = c.post_share_request("42").unwrap();
        assert_eq!(share.url().path(), "/apihub/api/getShareConf");
        assert_eq!(share.url().query(), Some("entity_id=42&entity_type=1"));

        assert!(matches!(
            c.post_detail_request(" "),
            Err(BbsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_vote_request_uses_stoken_cookie() {
        let request = client().post_vote_request("42", true).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/apihub/sapi/upvotePost");
        assert_eq!(header(&request, "cookie"), "stuid=100;stoken=stoken-v1");
        assert_eq!(body(&request), r#"{"post_id":"42","is_cancel":true}"#);
    }

    #[test]
    fn test_sign_request_signs_sent_body() {
        let request = client().bbs_sign_request("2").unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/apihub/app/api/signIn");
        assert_eq!(body(&request), r#"{"gids":"2"}"#);

        let ds_value = header(&request, "ds");
        let parts: Vec<&str> = ds_value.split(',').collect();
        let t: i64 = parts[0].parse().unwrap();
        let r: u32 = parts[1].parse().unwrap();
        assert_eq!(
            ds_value,
            ds::compute_ds2(DEFAULT_DS2_SALT, t, r, body(&request), "")
        );
        assert_eq!(header(&request, "cookie"), "ltoken=abc; ltuid=100");
    }

    #[test]
    fn test_headers_are_fresh_per_request() {
        let c = client();
        let names: std::collections::HashSet<String> = (0..10)
            .map(|_| header(&c.tasks_info_request().unwrap(), "x-rpc-device_name").to_string())
            .collect();
        assert!(names.len() > 1);
    }

    #[test]
    fn test_decode_tasks_info() {
        let text = r#"{"retcode":0,"message":"OK","data":{"states":[{"mission_id":58,"process":1,"happened_times":1,"is_get_award":true,"mission_key":"continuous_sign"}],"already_received_points":10,"total_points":500,"today_total_points":110,"is_unclaimed":false,"can_get_points":100}}"#;
        let info: TasksInfo = decode_response("getUserMissionsState", text).unwrap();
        assert_eq!(info.total_points, 500);
        assert_eq!(
            info.incomplete_missions(),
            vec![Mission::ReadPosts, Mission::LikePosts, Mission::Share]
        );
    }

    #[test]
    fn test_decode_api_error() {
        let text = r#"{"retcode":1008,"message":"帖子不存在","data":null}"#;
        let result = decode_response::<PostShareInfo>("getShareConf", text);
        match result {
            Err(BbsError::Api { retcode, message }) => {
                assert_eq!(retcode, 1008);
                assert_eq!(message, "帖子不存在");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_json_keeps_body() {
        let text = "<html>blocked</html>";
        match decode_response::<SignResult>("signIn", text) {
            Err(BbsError::UnexpectedBody { context, body }) => {
                assert_eq!(context, "signIn");
                assert_eq!(body, text);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_sign_points_and_vote() {
        let result: SignResult =
            decode_response("signIn", r#"{"retcode":0,"message":"OK","data":{"points":5}}"#)
                .unwrap();
        assert_eq!(result.points, 5);

        // У лайка data обычно пустая.
        let vote: serde_json::Value =
            decode_response("upvotePost", r#"{"retcode":0,"message":"OK","data":{}}"#).unwrap();
        assert!(vote.is_object());
    }

    #[test]
    fn test_decode_post_detail() {
        let text = r#"{"retcode":0,"message":"OK","data":{"post":{"post":{"post_id":"777","subject":"s"},"forum":{"id":26},"stat":{"view_num":3}}}}"#;
        let data: PostDetailData = decode_response("getPostFull", text).unwrap();
        assert_eq!(data.post.post_id(), "777");
        assert_eq!(data.post.stat.view_num, 3);
    }

    #[test]
    fn test_decode_post_list_page() {
        let text = r#"{"retcode":0,"message":"OK","data":{"list":[{"post":{"post_id":"1"}},{"post":{"post_id":"2"}}],"last_id":"2","is_last":false,"is_origin":false}}"#;
        let page: PostListPage = decode_response("getForumPostList", text).unwrap();
        let ids: Vec<&str> = page.list.iter().map(|p| p.post_id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(page.last_id, "2");
    }

    #[test]
    fn test_decode_post_list_with_null_fields() {
        let text = r#"{"retcode":0,"message":"OK","data":{"list":[{"post":{"post_id":"1"},"help_sys":null,"topics":null}],"last_id":null,"is_last":null}}"#;
        let page: PostListPage = decode_response("getForumPostList", text).unwrap();
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.list[0].post_id(), "1");
        assert_eq!(page.last_id, "");
    }

    #[test]
    fn test_decode_post_detail_with_null_string() {
        let text = r#"{"retcode":0,"message":"OK","data":{"post":{"post":{"post_id":"5","reply_time":null,"structured_content":null}}}}"#;
        let data: PostDetailData = decode_response("getPostFull", text).unwrap();
        assert_eq!(data.post.post_id(), "5");
        assert_eq!(data.post.post.reply_time, "");
    }

    #[test]
    fn test_decode_tasks_with_null_states() {
        let text = r#"{"retcode":0,"message":"OK","data":{"states":null,"can_get_points":110}}"#;
        let info: TasksInfo = decode_response("getUserMissionsState", text).unwrap();
        assert!(info.states.is_empty());
        assert_eq!(info.incomplete_missions().len(), 4);
    }

    fn stub_client(base: &str) -> AppClient {
        let config = ClientConfig {
            api_base: base.to_string(),
            device_id: Some("device-1".to_string()),
            timeout_secs: 5,
            ..ClientConfig::default()
        };
        let cookies = StaticCookies::from_parts("ltoken=abc; ltuid=100", "100", "stoken-v1");
        AppClient::with_cookies(config, cookies).unwrap()
    }

    #[tokio::test]
    async fn test_sign_round_trip() {
        let server = TestServer::start(|_| ok_json(r#"{"points":7}"#)).await;
        let client = stub_client(&server.base);

        assert_eq!(client.bbs_sign("2").await.unwrap(), 7);

        let sent = &server.requests_to("/apihub/app/api/signIn")[0];
        assert_eq!(sent.method, "POST");
        assert_eq!(sent.body, r#"{"gids":"2"}"#);
        let ds_value = sent.header("ds").unwrap();
        let parts: Vec<&str> = ds_value.split(',').collect();
        let t: i64 = parts[0].parse().unwrap();
        let r: u32 = parts[1].parse().unwrap();
        assert_eq!(ds_value, ds::compute_ds2(DEFAULT_DS2_SALT, t, r, &sent.body, ""));
    }

    #[tokio::test]
    async fn test_vote_api_error_round_trip() {
        let server = TestServer::start(|_| api_error(-100, "登录失效")).await;
        let client = stub_client(&server.base);

        match client.post_vote("42", false).await {
            Err(BbsError::Api { retcode, message }) => {
                assert_eq!(retcode, -100);
                assert_eq!(message, "登录失效");
            }
            other => panic!("unexpected: {:?}", other),
        }
        let sent = &server.requests()[0];
        assert_eq!(sent.header("cookie"), Some("stuid=100;stoken=stoken-v1"));
    }

    #[tokio::test]
    async fn test_tasks_http_error_round_trip() {
        let server = TestServer::start(|_| (502, "<html>bad gateway</html>".to_string())).await;
        let client = stub_client(&server.base);

        match client.get_tasks_info().await {
            Err(BbsError::Core(e)) => assert!(e.is_http_status()),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(server.requests()[0].query, "point_sn=myb");
    }

    // Требует живого аккаунта: MHY_COOKIE и MHY_STOKEN_COOKIE.
    #[tokio::test]
    #[ignore = "network test"]
    async fn test_tasks_info_network_call() {
        let _ = env_logger::builder().is_test(true).try_init();

        let cookie = std::env::var("MHY_COOKIE").unwrap_or_default();
        let stoken = std::env::var("MHY_STOKEN_COOKIE").unwrap_or_default();
        let client = AppClient::with_cookies(
            ClientConfig::default().with_env_overrides(),
            StaticCookies::new(cookie, stoken),
        )
        .unwrap();

        let info = client.get_tasks_info().await;
        assert!(info.is_ok(), "{:?}", info.err());
    }

    #[tokio::test]
    #[ignore = "network test"]
    async fn test_posts_list_network_call() {
        let _ = env_logger::builder().is_test(true).try_init();

        let cookie = std::env::var("MHY_COOKIE").unwrap_or_default();
        let client = AppClient::with_cookies(
            ClientConfig::default(),
            StaticCookies::new(cookie, "stuid=0;stoken=0"),
        )
        .unwrap();

        let posts = client.get_posts_list("26", 5).await.unwrap();
        assert!(!posts.is_empty());
        assert!(posts.len() <= 5);
    }
}
