use std::io::Cursor;

use conduit_core::api::testing::ScriptedTransport;
use conduit_core::api::{ConduitApi, DEFAULT_API_BASE_URL};
use conduit_core::pagination::Paginator;
use conduit_core::persist::{KeyValueStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
use conduit_core::store::Dispatch;
use conduit_core::validation::SignUpForm;
use conduit_core::{Article, AuthUser, UserAction};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::app::{resolve_api_url, App};
use crate::cli::CompletionShell;
use crate::commands::articles::{run_create, run_delete, run_edit, ArticleEdits};
use crate::commands::auth_cmd::{run_login, run_logout, run_register, run_whoami};
use crate::commands::browse::run_browse;
use crate::commands::common::{
    default_editor, format_article_detail, format_pagination, normalize_content, normalize_slug,
    NO_DATA_MESSAGE,
};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config_init;
use crate::commands::favorite::run_favorite;
use crate::commands::list::run_list;
use crate::commands::profile::{run_profile, ProfileEdits};
use crate::commands::show::run_show;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

type TestApp = App<MemoryStorage, ScriptedTransport>;

fn test_app(transport: &ScriptedTransport, storage: &MemoryStorage) -> TestApp {
    let api = ConduitApi::with_transport("https://api.example.com/api", transport.clone()).unwrap();
    App::new(api, storage.clone())
}

fn sign_in(app: &mut TestApp, username: &str) {
    app.store.dispatch(
        UserAction::UpdateUserData(AuthUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            token: format!("{username}-jwt"),
            image: None,
            bio: None,
        })
        .into(),
    );
}

fn article_json(slug: &str, author: &str) -> Value {
    json!({
        "slug": slug,
        "title": format!("Title of {slug}"),
        "description": "A short description",
        "body": "# Heading\n\nSome **bold** text.",
        "tagList": ["rust", "cli"],
        "createdAt": "2024-03-05T10:00:00.000Z",
        "favorited": false,
        "favoritesCount": 2,
        "author": {"username": author, "image": null}
    })
}

fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn normalize_slug_rejects_blank() {
    assert!(matches!(normalize_slug("  "), Err(CliError::EmptySlug)));
    assert_eq!(normalize_slug(" my-post ").unwrap(), "my-post");
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn api_url_precedence() {
    let flag = Some("https://flag.example.com/api".to_string());
    let env = Some("https://env.example.com/api".to_string());
    let profile = Some("https://profile.example.com/api".to_string());

    assert_eq!(
        resolve_api_url(flag, env.clone(), profile.clone()),
        "https://flag.example.com/api"
    );
    assert_eq!(
        resolve_api_url(Some("  ".to_string()), env, profile.clone()),
        "https://env.example.com/api"
    );
    assert_eq!(
        resolve_api_url(None, None, profile),
        "https://profile.example.com/api"
    );
    assert_eq!(resolve_api_url(None, None, None), DEFAULT_API_BASE_URL);
}

#[test]
fn pagination_bar_marks_current_and_blanks_disabled_arrows() {
    assert_eq!(format_pagination(&Paginator::new(3, 1)), "  [1] 2 3 >");
    assert_eq!(format_pagination(&Paginator::new(3, 2)), "< 1 [2] 3 >");
    assert_eq!(format_pagination(&Paginator::new(1, 1)), "  [1]  ");
    assert_eq!(
        format_pagination(&Paginator::new(20, 10)),
        "< 6 7 8 9 [10] 11 12 13 14 >"
    );
}

#[test]
fn detail_offers_edit_only_to_the_author() {
    let article: Article = serde_json::from_value(article_json("post", "jake")).unwrap();

    let own = format_article_detail(&article, Some("jake")).join("\n");
    assert!(own.contains("conduit edit post"));
    assert!(own.contains("March 5, 2024"));
    assert!(own.contains("Some bold text."));

    let other = format_article_detail(&article, Some("anna")).join("\n");
    assert!(!other.contains("conduit edit"));
}

#[tokio::test]
async fn list_renders_page_and_uses_mirrored_token() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"articles": [article_json("a", "jake"), article_json("b", "anna")], "articlesCount": 12}),
    );
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "stored-jwt").unwrap();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    run_list(&mut app, 2, false, &mut out).await.unwrap();

    let rendered = output(out);
    assert!(rendered.contains("Title of a"));
    assert!(rendered.contains("[rust] [cli]"));
    assert!(rendered.contains("< 1 [2] 3 >"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.token.as_deref(), Some("stored-jwt"));
    assert!(request
        .query
        .contains(&("offset".to_string(), "5".to_string())));
}

#[tokio::test]
async fn list_failure_renders_no_data() {
    let transport = ScriptedTransport::new();
    transport.respond(500, "");
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    let error = run_list(&mut app, 1, false, &mut out).await.unwrap_err();

    assert_eq!(output(out).trim(), NO_DATA_MESSAGE);
    assert_eq!(error.to_string(), "Request failed: Error: 500");
}

#[tokio::test]
async fn list_json_outputs_items() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"articles": [article_json("a", "jake")], "articlesCount": 1}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    run_list(&mut app, 1, true, &mut out).await.unwrap();

    let items: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(items[0]["slug"], "a");
    assert_eq!(items[0]["author"], "jake");
}

#[tokio::test]
async fn browse_skips_refetch_for_current_page() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"articles": [article_json("a", "jake")], "articlesCount": 12}),
    );
    transport.respond_json(
        200,
        &json!({"articles": [article_json("f", "jake")], "articlesCount": 12}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut input = Cursor::new("2\n2\nq\n");
    let mut out = Vec::new();

    run_browse(&mut app, 1, &mut input, &mut out, false)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1]
        .query
        .contains(&("offset".to_string(), "5".to_string())));
    assert!(output(out).contains("Title of f"));
}

#[tokio::test]
async fn list_past_the_end_shows_last_page() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"articles": [], "articlesCount": 12}));
    transport.respond_json(
        200,
        &json!({"articles": [article_json("k", "jake"), article_json("l", "anna")], "articlesCount": 12}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    run_list(&mut app, 99, false, &mut out).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0]
        .query
        .contains(&("offset".to_string(), "490".to_string())));
    assert!(requests[1]
        .query
        .contains(&("offset".to_string(), "10".to_string())));

    let rendered = output(out);
    assert!(rendered.contains("Title of k"));
    assert!(!rendered.contains("No articles yet."));
    assert!(rendered.contains("< 1 2 [3]"));
}

#[tokio::test]
async fn browse_from_past_the_end_can_move_back() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"articles": [], "articlesCount": 12}));
    transport.respond_json(
        200,
        &json!({"articles": [article_json("k", "jake")], "articlesCount": 12}),
    );
    transport.respond_json(
        200,
        &json!({"articles": [article_json("f", "jake")], "articlesCount": 12}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut input = Cursor::new("l
p
q
");
    let mut out = Vec::new();

    run_browse(&mut app, 99, &mut input, &mut out, false)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2]
        .query
        .contains(&("offset".to_string(), "5".to_string())));
    let rendered = output(out);
    assert!(rendered.contains("Title of k"));
    assert!(rendered.contains("page 3/3>"));
    assert!(rendered.contains("Title of f"));
    assert!(rendered.contains("page 2/3>"));
}

/// Terminal that refuses escape sequences but accepts plain text.
struct DumbTerminal(Vec<u8>);

impl std::io::Write for DumbTerminal {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if buf.starts_with(b"\x1b") {
            return Err(std::io::Error::other("escape sequences unsupported"));
        }
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn browse_continues_when_screen_cannot_be_cleared() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"articles": [article_json("a", "jake")], "articlesCount": 12}),
    );
    transport.respond_json(
        200,
        &json!({"articles": [article_json("f", "jake")], "articlesCount": 12}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut input = Cursor::new("n\nq\n");
    let mut terminal = DumbTerminal(Vec::new());

    run_browse(&mut app, 1, &mut input, &mut terminal, true)
        .await
        .unwrap();

    assert_eq!(transport.requests().len(), 2);
    let rendered = output(terminal.0);
    assert!(rendered.contains("Title of f"));
    assert!(rendered.contains("page 2/3>"));
}

#[tokio::test]
async fn show_renders_fetched_article() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"article": article_json("post", "jake")}));
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    run_show(&mut app, "post", false, &mut out).await.unwrap();

    let rendered = output(out);
    assert!(rendered.starts_with("Title of post\n"));
    assert!(rendered.contains("Heading\n======="));
}

#[tokio::test]
async fn favorite_requires_sign_in() {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    let error = run_favorite(&mut app, "post", true, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::NotSignedIn));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn favorite_sends_user_token() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"article": {"slug": "post", "favorited": true, "favoritesCount": 3}}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    let mut out = Vec::new();

    run_favorite(&mut app, "post", true, &mut out).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.path, "/articles/post/favorite");
    assert_eq!(request.token.as_deref(), Some("jake-jwt"));
    assert_eq!(output(out).trim(), "Favorited post");
}

#[tokio::test]
async fn login_persists_session_across_runs() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"user": {"username": "jake", "email": "jake@jake.jake", "token": "jwt", "image": null}}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    run_login(
        &mut app,
        "jake@jake.jake".to_string(),
        "jakejake".to_string(),
        &mut out,
    )
    .await
    .unwrap();
    assert_eq!(output(out).trim(), "Signed in as jake");
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt"));
    assert!(storage.get(USER_KEY).unwrap().is_some());

    let next_run = test_app(&transport, &storage);
    let mut out = Vec::new();
    run_whoami(&next_run, &mut out).unwrap();
    assert_eq!(output(out).trim(), "jake <jake@jake.jake>");
}

#[tokio::test]
async fn login_validation_blocks_request() {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    let error = run_login(&mut app, "nope".to_string(), "x".to_string(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Validation(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn register_reports_server_field_error() {
    let transport = ScriptedTransport::new();
    transport.respond_json(422, &json!({"errors": {"username": ["is already taken"]}}));
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();
    let form = SignUpForm {
        username: "jake".to_string(),
        email: "jake@jake.jake".to_string(),
        password: "jakejake".to_string(),
        repeat_password: "jakejake".to_string(),
        agree: true,
    };

    let error = run_register(&mut app, form, &mut out).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Request failed: username: is already taken"
    );
    assert_eq!(app.state().user.user, None);
}

#[test]
fn logout_clears_mirrored_session() {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    storage.set(USER_KEY, "{}").unwrap();
    let mut out = Vec::new();

    run_logout(&mut app, &mut out).unwrap();

    assert_eq!(output(out).trim(), "Signed out");
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    assert!(!app.state().user.is_authenticated());
}

#[tokio::test]
async fn create_posts_article_and_prints_slug() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"article": article_json("new-post", "jake")}));
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    let mut out = Vec::new();

    run_create(
        &mut app,
        "New post".to_string(),
        "About it".to_string(),
        vec!["rust".to_string(), " ".to_string()],
        Some("Body text".to_string()),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(output(out).trim(), "new-post");
    let body = transport.last_request().unwrap().body.unwrap();
    assert_eq!(body["article"]["tagList"], json!(["rust"]));
    assert_eq!(app.state().articles.articles_count(), 1);
}

#[tokio::test]
async fn create_requires_sign_in() {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    let mut out = Vec::new();

    let error = run_create(
        &mut app,
        "New post".to_string(),
        "About it".to_string(),
        Vec::new(),
        Some("Body".to_string()),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, CliError::NotSignedIn));
}

#[tokio::test]
async fn edit_keeps_unchanged_fields() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"article": article_json("post", "jake")}));
    transport.respond_json(200, &json!({"article": article_json("post", "jake")}));
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    let mut out = Vec::new();
    let edits = ArticleEdits {
        title: Some("Renamed".to_string()),
        ..ArticleEdits::default()
    };

    run_edit(&mut app, "post", edits, &mut out).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method.as_str(), "PUT");
    let body = request.body.unwrap();
    assert_eq!(body["article"]["title"], "Renamed");
    assert_eq!(body["article"]["description"], "A short description");
    assert_eq!(body["article"]["tagList"], json!(["rust", "cli"]));
}

#[tokio::test]
async fn delete_refuses_other_authors() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"article": article_json("post", "anna")}));
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    let mut out = Vec::new();

    let error = run_delete(&mut app, "post", true, &mut Cursor::new(""), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::NotAuthor(slug) if slug == "post"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn delete_asks_for_confirmation() {
    let transport = ScriptedTransport::new();
    transport.respond_json(200, &json!({"article": article_json("post", "jake")}));
    transport.respond_json(200, &json!({"article": article_json("post", "jake")}));
    transport.respond(204, "");
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");

    let mut out = Vec::new();
    let error = run_delete(&mut app, "post", false, &mut Cursor::new("n\n"), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Cancelled));

    let mut out = Vec::new();
    run_delete(&mut app, "post", false, &mut Cursor::new("yes\n"), &mut out)
        .await
        .unwrap();
    assert!(output(out).ends_with("Deleted post\n"));
    assert_eq!(transport.last_request().unwrap().method.as_str(), "DELETE");
    assert!(app.state().articles.find("post").is_none());
}

#[tokio::test]
async fn profile_update_keeps_current_values() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        200,
        &json!({"user": {"username": "jake", "email": "jake@example.com", "token": "jake-jwt", "bio": "Hello"}}),
    );
    let storage = MemoryStorage::new();
    let mut app = test_app(&transport, &storage);
    sign_in(&mut app, "jake");
    let mut out = Vec::new();
    let edits = ProfileEdits {
        bio: Some("Hello".to_string()),
        ..ProfileEdits::default()
    };

    run_profile(&mut app, edits, &mut out).await.unwrap();

    let body = transport.last_request().unwrap().body.unwrap();
    assert_eq!(body["user"]["email"], "jake@example.com");
    assert_eq!(body["user"]["bio"], "Hello");
    assert!(body["user"].get("password").is_none());
    assert_eq!(app.state().user.user.as_ref().unwrap().bio.as_deref(), Some("Hello"));
}

#[test]
fn config_init_saves_and_activates_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cli-config.json");
    let mut out = Vec::new();

    run_config_init(
        &path,
        Some("staging"),
        Some("https://staging.example.com/api/".to_string()),
        None,
        false,
        &mut out,
    )
    .unwrap();

    let config = CliProfilesConfig::load_from_path(&path).unwrap();
    assert_eq!(config.active_profile.as_deref(), Some("staging"));
    assert_eq!(
        config.profile("staging").unwrap().api_base_url().as_deref(),
        Some("https://staging.example.com/api")
    );
}

#[test]
fn config_init_rejects_non_http_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cli-config.json");
    let mut out = Vec::new();

    let error = run_config_init(
        &path,
        Some("staging"),
        Some("staging.example.com".to_string()),
        None,
        false,
        &mut out,
    )
    .unwrap_err();

    assert!(matches!(error, CliError::Config(_)));
    assert!(!path.exists());
}

#[test]
fn completions_generate_script() {
    let mut out = Vec::new();
    run_completions(CompletionShell::Bash, None, &mut out).unwrap();
    assert!(output(out).contains("conduit"));
}
