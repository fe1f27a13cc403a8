use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use bloggity_client::{
    BloggityClient, BloggityClientError, Comment, Page, Post, PostQuery, TokenPair, User,
    UserUpdate,
};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

const TOKEN_FILE: &str = ".bloggity_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
const SERVER_ENV: &str = "BLOGGITY_SERVER";

#[derive(Debug, Parser)]
#[command(name = "bloggity-cli", version, about = "CLI клиент для bloggity-server")]
struct Cli {
    /// Адрес сервера. По умолчанию берётся из BLOGGITY_SERVER или http://127.0.0.1:8080.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя; токены сохраняются в .bloggity_token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Обновление access token по сохранённому refresh token.
    Refresh,
    /// Выход: удаляет сохранённые токены.
    Logout,
    /// Операции с пользователями.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Операции с постами.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Операции с комментариями.
    #[command(subcommand)]
    Comments(CommentsCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// Пользователь по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Список пользователей.
    List(PageArgs),
    /// Обновление собственного профиля (требует токен).
    ///
    /// Незаданные поля берутся из текущего профиля, пароль меняется только при `--password`.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Пост по id.
    Get {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        include_comments: bool,
    },
    /// Список постов.
    List {
        /// Точное совпадение заголовка.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        include_comments: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Обновление поста (требует токен).
    ///
    /// Если `--content` не указан, используется текущее содержимое поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum CommentsCommand {
    /// Комментарии поста.
    List {
        #[arg(long)]
        post_id: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Комментарий по id.
    Get {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        id: i64,
    },
    /// Новый комментарий (требует токен).
    Create {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Изменение комментария (требует токен).
    Update {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        content: String,
    },
    /// Удаление комментария (требует токен).
    Delete {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct PageArgs {
    #[arg(long, default_value_t = 10)]
    limit: u32,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

#[derive(Debug, Default, PartialEq)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = BloggityClient::new(server).map_err(map_client_error)?;

    let stored = load_tokens().context("не удалось прочитать .bloggity_token")?;
    if let Some(access) = stored.access {
        client.set_token(access);
    }
    if let Some(refresh) = stored.refresh {
        client.set_refresh_token(refresh);
    }

    match cli.command {
        Command::Register {
            username,
            first_name,
            last_name,
            password,
        } => {
            let user = client
                .register(&username, &first_name, &last_name, &password)
                .await
                .map_err(map_client_error)?;
            print_user("Регистрация успешна", &user);
            println!("Для получения токена выполните `bloggity-cli login ...`");
        }
        Command::Login { username, password } => {
            let pair = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_tokens(&client).context("не удалось сохранить токены")?;
            print_tokens("Вход выполнен", &pair);
        }
        Command::Refresh => {
            let access = client.refresh().await.map_err(map_client_error)?;
            persist_tokens(&client).context("не удалось сохранить токены")?;
            println!("Access token обновлён");
            println!("access: {access}");
        }
        Command::Logout => {
            client.clear_token();
            remove_tokens().context("не удалось удалить .bloggity_token")?;
            println!("Токены удалены");
        }
        Command::Users(command) => run_users(&client, command).await?,
        Command::Posts(command) => run_posts(&client, command).await?,
        Command::Comments(command) => run_comments(&client, command).await?,
    }

    Ok(())
}

async fn run_users(client: &BloggityClient, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::Get { id } => {
            let user = client.get_user(id).await.map_err(map_client_error)?;
            print_user("Пользователь", &user);
        }
        UsersCommand::List(page) => {
            let list = client
                .list_users(Some(page.limit), Some(page.offset))
                .await
                .map_err(map_client_error)?;
            print_page("Пользователей", &list, |user| {
                format!("- [{}] {} ({} {})", user.id, user.username, user.first_name, user.last_name)
            });
        }
        UsersCommand::Update {
            id,
            username,
            first_name,
            last_name,
            password,
        } => {
            // PUT заменяет профиль целиком, поэтому недостающие поля берём с сервера.
            let current = client.get_user(id).await.map_err(map_client_error)?;
            let update = UserUpdate {
                username: username.unwrap_or(current.username),
                first_name: first_name.unwrap_or(current.first_name),
                last_name: last_name.unwrap_or(current.last_name),
                password,
            };
            let user = client
                .update_user(id, &update)
                .await
                .map_err(map_client_error)?;
            print_user("Профиль обновлён", &user);
        }
    }
    Ok(())
}

async fn run_posts(client: &BloggityClient, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::Create { title, content } => {
            let post = client
                .create_post(&title, &content)
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        PostsCommand::Get {
            id,
            include_comments,
        } => {
            let post = client
                .get_post(id, include_comments)
                .await
                .map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        PostsCommand::List {
            title,
            include_comments,
            page,
        } => {
            let query = PostQuery {
                title,
                include_comments,
                limit: Some(page.limit),
                offset: Some(page.offset),
            };
            let list = client.list_posts(&query).await.map_err(map_client_error)?;
            print_page("Постов", &list, |post| {
                let comments = post
                    .comments
                    .as_ref()
                    .map(|comments| format!(", comments={}", comments.len()))
                    .unwrap_or_default();
                format!(
                    "- [{}] {} (author_id={}{comments})",
                    post.id, post.title, post.author_id
                )
            });
        }
        PostsCommand::Update { id, title, content } => {
            // Если пользователь не передал --content, сохраняем текущее содержимое поста.
            let content = match content {
                Some(content) => content,
                None => {
                    client
                        .get_post(id, false)
                        .await
                        .map_err(map_client_error)?
                        .content
                }
            };

            let post = client
                .update_post(id, &title, &content)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        PostsCommand::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_comments(client: &BloggityClient, command: CommentsCommand) -> Result<()> {
    match command {
        CommentsCommand::List { post_id, page } => {
            let list = client
                .list_comments(post_id, Some(page.limit), Some(page.offset))
                .await
                .map_err(map_client_error)?;
            print_page("Комментариев", &list, |comment| {
                format!(
                    "- [{}] author_id={}: {}",
                    comment.id, comment.author_id, comment.content
                )
            });
        }
        CommentsCommand::Get { post_id, id } => {
            let comment = client
                .get_comment(post_id, id)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий", &comment);
        }
        CommentsCommand::Create { post_id, content } => {
            let comment = client
                .create_comment(post_id, &content)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий создан", &comment);
        }
        CommentsCommand::Update {
            post_id,
            id,
            content,
        } => {
            let comment = client
                .update_comment(post_id, id, &content)
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий обновлён", &comment);
        }
        CommentsCommand::Delete { post_id, id } => {
            client
                .delete_comment(post_id, id)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий удалён: id={id}");
        }
    }
    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|server| !server.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn non_blank(value: Option<&serde_json::Value>) -> Option<String> {
    let token = value?.as_str()?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn parse_token_content(raw: &str) -> StoredTokens {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => StoredTokens {
            access: non_blank(value.get("access")),
            refresh: non_blank(value.get("refresh")),
        },
        Err(_) => StoredTokens::default(),
    }
}

fn load_tokens() -> io::Result<StoredTokens> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(StoredTokens::default());
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_tokens(client: &BloggityClient) -> io::Result<()> {
    let body = json!({
        "access": client.get_token(),
        "refresh": client.get_refresh_token(),
    });
    fs::write(TOKEN_FILE, body.to_string())
}

fn remove_tokens() -> io::Result<()> {
    match fs::remove_file(TOKEN_FILE) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn map_client_error(err: BloggityClientError) -> anyhow::Error {
    let message = match err {
        BloggityClientError::MissingToken => {
            "нет сохранённого токена: выполните `bloggity-cli login ...`".to_string()
        }
        BloggityClientError::Unauthorized(message) => {
            format!("требуется авторизация ({message}): выполните `bloggity-cli login ...`")
        }
        BloggityClientError::Forbidden(message) => {
            format!("недостаточно прав: ресурс принадлежит другому пользователю ({message})")
        }
        BloggityClientError::NotFound(message) => format!("ресурс не найден: {message}"),
        BloggityClientError::MethodNotAllowed => "операция не поддерживается".to_string(),
        BloggityClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BloggityClientError::Server(message) => format!("ошибка сервера: {message}"),
        BloggityClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("id: {}", user.id);
    println!("username: {}", user.username);
    println!("first_name: {}", user.first_name);
    println!("last_name: {}", user.last_name);
    println!("created_at: {}", user.created_at);
}

fn print_tokens(title: &str, pair: &TokenPair) {
    println!("{title}");
    println!("access: {}", pair.access);
    println!("refresh: {}", pair.refresh);
    print_user("user:", &pair.user);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    println!("author_id: {}", post.author_id);
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
    if let Some(comments) = &post.comments {
        println!("comments: {}", comments.len());
        for comment in comments {
            println!(
                "  - [{}] author_id={}: {}",
                comment.id, comment.author_id, comment.content
            );
        }
    }
}

fn print_comment(title: &str, comment: &Comment) {
    println!("{title}");
    println!("id: {}", comment.id);
    println!("post_id: {}", comment.post_id);
    println!("author_id: {}", comment.author_id);
    println!("content: {}", comment.content);
    println!("created_at: {}", comment.created_at);
    println!("updated_at: {}", comment.updated_at);
}

fn print_page<T>(label: &str, page: &Page<T>, line: impl Fn(&T) -> String) {
    println!(
        "{label}: {} (limit={}, offset={}, total={})",
        page.items.len(),
        page.limit,
        page.offset,
        page.total
    );

    for item in &page.items {
        println!("{}", line(item));
    }
}
