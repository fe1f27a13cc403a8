use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{BloggityClientError, BloggityClientResult, ErrorResponseDto};
use crate::models::{Comment, Page, Post, PostQuery, TokenPair, User, UserUpdate};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateUserRequestDto<'a> {
    username: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ObtainTokenRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequestDto<'a> {
    refresh: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequestDto<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct PostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccessTokenDto {
    access: String,
}

#[derive(Debug, Deserialize)]
struct ListUsersResponseDto {
    users: Vec<User>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct ListPostsResponseDto {
    posts: Vec<Post>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct ListCommentsResponseDto {
    comments: Vec<Comment>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Debug, Serialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PostsQueryDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    include_comments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

#[derive(Debug, Serialize)]
struct IncludeCommentsDto {
    include_comments: bool,
}

fn page<T>(items: Vec<T>, limit: u32, offset: u32, total: i64) -> Page<T> {
    Page {
        items,
        limit,
        offset,
        total: u64::try_from(total).unwrap_or(0),
    }
}

impl From<ListUsersResponseDto> for Page<User> {
    fn from(value: ListUsersResponseDto) -> Self {
        page(value.users, value.limit, value.offset, value.total)
    }
}

impl From<ListPostsResponseDto> for Page<Post> {
    fn from(value: ListPostsResponseDto) -> Self {
        page(value.posts, value.limit, value.offset, value.total)
    }
}

impl From<ListCommentsResponseDto> for Page<Comment> {
    fn from(value: ListCommentsResponseDto) -> Self {
        page(value.comments, value.limit, value.offset, value.total)
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `bloggity-server`.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>) -> BloggityClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BloggityClientError {
        let status = response.status();
        let body = response
            .json::<ErrorResponseDto>()
            .await
            .unwrap_or_default();
        BloggityClientError::from_http_status(status, body.into_message(status))
    }

    /// отправка запроса и разбор JSON-ответа
    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> BloggityClientResult<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    /// для ответов без тела (204)
    async fn execute(request: RequestBuilder) -> BloggityClientResult<()> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(())
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> BloggityClientResult<User> {
        let payload = RegisterRequestDto {
            username,
            first_name,
            last_name,
            password,
        };
        Self::fetch(self.request(Method::POST, "/api/users", None).json(&payload)).await
    }

    pub(crate) async fn obtain_tokens(
        &self,
        username: &str,
        password: &str,
    ) -> BloggityClientResult<TokenPair> {
        let payload = ObtainTokenRequestDto { username, password };
        Self::fetch(self.request(Method::POST, "/api/token", None).json(&payload)).await
    }

    pub(crate) async fn refresh(&self, refresh: &str) -> BloggityClientResult<String> {
        let payload = RefreshRequestDto { refresh };
        let dto: AccessTokenDto =
            Self::fetch(self.request(Method::POST, "/api/token/refresh", None).json(&payload))
                .await?;
        Ok(dto.access)
    }

    pub(crate) async fn verify(&self, token: &str) -> BloggityClientResult<()> {
        let payload = VerifyRequestDto { token };
        Self::execute(self.request(Method::POST, "/api/token/verify", None).json(&payload)).await
    }

    pub(crate) async fn get_user(&self, id: i64) -> BloggityClientResult<User> {
        Self::fetch(self.request(Method::GET, &format!("/api/users/{id}"), None)).await
    }

    pub(crate) async fn list_users(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> BloggityClientResult<Page<User>> {
        let query = PageQuery { limit, offset };
        let dto: ListUsersResponseDto =
            Self::fetch(self.request(Method::GET, "/api/users", None).query(&query)).await?;
        Ok(dto.into())
    }

    pub(crate) async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> BloggityClientResult<User> {
        let payload = UpdateUserRequestDto {
            username: &update.username,
            first_name: &update.first_name,
            last_name: &update.last_name,
            password: update.password.as_deref(),
        };
        Self::fetch(
            self.request(Method::PUT, &format!("/api/users/{id}"), Some(token))
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn create_post(
        &self,
        token: &str,
        title: &str,
        content: &str,
    ) -> BloggityClientResult<Post> {
        let payload = PostRequestDto { title, content };
        Self::fetch(
            self.request(Method::POST, "/api/posts", Some(token))
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn get_post(&self, id: i64, include_comments: bool) -> BloggityClientResult<Post> {
        let query = IncludeCommentsDto { include_comments };
        Self::fetch(
            self.request(Method::GET, &format!("/api/posts/{id}"), None)
                .query(&query),
        )
        .await
    }

    pub(crate) async fn list_posts(&self, query: &PostQuery) -> BloggityClientResult<Page<Post>> {
        let query = PostsQueryDto {
            title: query.title.as_deref(),
            include_comments: query.include_comments,
            limit: query.limit,
            offset: query.offset,
        };
        let dto: ListPostsResponseDto =
            Self::fetch(self.request(Method::GET, "/api/posts", None).query(&query)).await?;
        Ok(dto.into())
    }

    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        title: &str,
        content: &str,
    ) -> BloggityClientResult<Post> {
        let payload = PostRequestDto { title, content };
        Self::fetch(
            self.request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> BloggityClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(token))).await
    }

    pub(crate) async fn list_comments(
        &self,
        post_id: i64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> BloggityClientResult<Page<Comment>> {
        let query = PageQuery { limit, offset };
        let dto: ListCommentsResponseDto = Self::fetch(
            self.request(Method::GET, &format!("/api/posts/{post_id}/comments"), None)
                .query(&query),
        )
        .await?;
        Ok(dto.into())
    }

    pub(crate) async fn get_comment(&self, post_id: i64, id: i64) -> BloggityClientResult<Comment> {
        Self::fetch(self.request(
            Method::GET,
            &format!("/api/posts/{post_id}/comments/{id}"),
            None,
        ))
        .await
    }

    pub(crate) async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        content: &str,
    ) -> BloggityClientResult<Comment> {
        let payload = CommentRequestDto { content };
        Self::fetch(
            self.request(
                Method::POST,
                &format!("/api/posts/{post_id}/comments"),
                Some(token),
            )
            .json(&payload),
        )
        .await
    }

    pub(crate) async fn update_comment(
        &self,
        token: &str,
        post_id: i64,
        id: i64,
        content: &str,
    ) -> BloggityClientResult<Comment> {
        let payload = CommentRequestDto { content };
        Self::fetch(
            self.request(
                Method::PUT,
                &format!("/api/posts/{post_id}/comments/{id}"),
                Some(token),
            )
            .json(&payload),
        )
        .await
    }

    pub(crate) async fn delete_comment(
        &self,
        token: &str,
        post_id: i64,
        id: i64,
    ) -> BloggityClientResult<()> {
        Self::execute(self.request(
            Method::DELETE,
            &format!("/api/posts/{post_id}/comments/{id}"),
            Some(token),
        ))
        .await
    }
}
