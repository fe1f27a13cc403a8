//! Клиентская библиотека для REST API `bloggity-server`.
//!
//! `BloggityClient` хранит пару JWT-токенов после `login` и сам подставляет
//! access token в защищённые операции. Ошибки сервера различаются по смыслу:
//! 401 ([`BloggityClientError::Unauthorized`]) означает, что личность не
//! установлена, 403 ([`BloggityClientError::Forbidden`]) означает, что ресурс
//! принадлежит другому пользователю.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BloggityClientError, BloggityClientResult};
pub use models::{Comment, Page, Post, PostQuery, TokenPair, User, UserUpdate};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент блог-сервиса поверх HTTP.
pub struct BloggityClient {
    http: HttpClient,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl BloggityClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> BloggityClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            access_token: None,
            refresh_token: None,
        })
    }

    /// Устанавливает access token вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Возвращает текущий access token, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Устанавливает refresh token вручную.
    pub fn set_refresh_token(&mut self, token: impl Into<String>) {
        self.refresh_token = Some(token.into());
    }

    /// Возвращает текущий refresh token, если он установлен.
    pub fn get_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Очищает оба сохранённых токена.
    pub fn clear_token(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }

    /// Регистрирует пользователя. Токены не выдаются, нужен отдельный `login`.
    pub async fn register(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> BloggityClientResult<User> {
        self.http
            .register(username, first_name, last_name, password)
            .await
    }

    /// Выполняет вход и сохраняет полученную пару токенов в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> BloggityClientResult<TokenPair> {
        let pair = self.http.obtain_tokens(username, password).await?;
        self.access_token = Some(pair.access.clone());
        self.refresh_token = Some(pair.refresh.clone());
        Ok(pair)
    }

    /// Получает новый access token по сохранённому refresh token.
    pub async fn refresh(&mut self) -> BloggityClientResult<String> {
        let refresh = self
            .refresh_token
            .as_deref()
            .ok_or(BloggityClientError::MissingToken)?;
        let access = self.http.refresh(refresh).await?;
        self.access_token = Some(access.clone());
        Ok(access)
    }

    /// Проверяет подпись и срок действия произвольного токена.
    pub async fn verify(&self, token: &str) -> BloggityClientResult<()> {
        self.http.verify(token).await
    }

    /// Возвращает пользователя по идентификатору.
    pub async fn get_user(&self, id: i64) -> BloggityClientResult<User> {
        self.http.get_user(id).await
    }

    /// Возвращает страницу пользователей.
    pub async fn list_users(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> BloggityClientResult<Page<User>> {
        self.http.list_users(limit, offset).await
    }

    /// Обновляет профиль. Сервер разрешает менять только собственный профиль.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> BloggityClientResult<User> {
        let token = self.require_token()?;
        self.http.update_user(token, id, update).await
    }

    /// Создаёт новый пост от имени текущего пользователя.
    pub async fn create_post(&self, title: &str, content: &str) -> BloggityClientResult<Post> {
        let token = self.require_token()?;
        self.http.create_post(token, title, content).await
    }

    /// Возвращает пост; при `include_comments` вместе с комментариями.
    pub async fn get_post(&self, id: i64, include_comments: bool) -> BloggityClientResult<Post> {
        self.http.get_post(id, include_comments).await
    }

    /// Возвращает страницу постов по параметрам выборки.
    pub async fn list_posts(&self, query: &PostQuery) -> BloggityClientResult<Page<Post>> {
        self.http.list_posts(query).await
    }

    /// Обновляет пост. Доступно только автору.
    pub async fn update_post(&self, id: i64, title: &str, content: &str) -> BloggityClientResult<Post> {
        let token = self.require_token()?;
        self.http.update_post(token, id, title, content).await
    }

    /// Удаляет пост. Доступно только автору.
    pub async fn delete_post(&self, id: i64) -> BloggityClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Возвращает страницу комментариев поста.
    pub async fn list_comments(
        &self,
        post_id: i64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> BloggityClientResult<Page<Comment>> {
        self.http.list_comments(post_id, limit, offset).await
    }

    /// Возвращает комментарий поста.
    pub async fn get_comment(&self, post_id: i64, id: i64) -> BloggityClientResult<Comment> {
        self.http.get_comment(post_id, id).await
    }

    /// Добавляет комментарий к посту.
    pub async fn create_comment(&self, post_id: i64, content: &str) -> BloggityClientResult<Comment> {
        let token = self.require_token()?;
        self.http.create_comment(token, post_id, content).await
    }

    /// Изменяет комментарий. Доступно только автору комментария.
    pub async fn update_comment(
        &self,
        post_id: i64,
        id: i64,
        content: &str,
    ) -> BloggityClientResult<Comment> {
        let token = self.require_token()?;
        self.http.update_comment(token, post_id, id, content).await
    }

    /// Удаляет комментарий. Доступно только автору комментария.
    pub async fn delete_comment(&self, post_id: i64, id: i64) -> BloggityClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_comment(token, post_id, id).await
    }

    fn require_token(&self) -> BloggityClientResult<&str> {
        self.access_token
            .as_deref()
            .ok_or(BloggityClientError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::{BloggityClient, BloggityClientError};

    #[tokio::test]
    async fn protected_calls_fail_fast_without_token() {
        let client = BloggityClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client
            .create_post("t", "c")
            .await
            .expect_err("no token stored");
        assert!(matches!(err, BloggityClientError::MissingToken));
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails_fast() {
        let mut client = BloggityClient::new("http://127.0.0.1:9").expect("client must build");
        client.set_token("access-only");

        let err = client.refresh().await.expect_err("no refresh token");
        assert!(matches!(err, BloggityClientError::MissingToken));
    }

    #[test]
    fn clear_token_drops_both_tokens() {
        let mut client = BloggityClient::new("http://localhost:8080").expect("client must build");
        client.set_token("a");
        client.set_refresh_token("r");
        client.clear_token();
        assert!(client.get_token().is_none());
        assert!(client.get_refresh_token().is_none());
    }
}
