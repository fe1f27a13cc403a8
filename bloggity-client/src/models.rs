use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя. Пароль сервер никогда не возвращает.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Содержимое поста.
    pub content: String,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
    /// Комментарии; заполняются только при `include_comments = true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Идентификатор поста, к которому относится комментарий.
    pub post_id: i64,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Текст комментария.
    pub content: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пара токенов, выданная при входе.
pub struct TokenPair {
    /// Access token для защищённых операций.
    pub access: String,
    /// Refresh token для получения нового access token.
    pub refresh: String,
    /// Пользователь, которому выданы токены.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Одна страница списка с параметрами пагинации.
pub struct Page<T> {
    /// Элементы текущей страницы.
    pub items: Vec<T>,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Общее количество элементов.
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
/// Параметры выборки постов.
pub struct PostQuery {
    /// Точное совпадение заголовка.
    pub title: Option<String>,
    /// Встроить комментарии в каждый пост.
    pub include_comments: bool,
    /// Размер страницы (1..=100).
    pub limit: Option<u32>,
    /// Смещение от начала выборки.
    pub offset: Option<u32>,
}

#[derive(Debug, Clone)]
/// Новые данные профиля. `password: None` оставляет текущий пароль.
pub struct UserUpdate {
    /// Логин.
    pub username: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Новый пароль.
    pub password: Option<String>,
}
