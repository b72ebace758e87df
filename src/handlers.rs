use crate::errors::{AppError, StoreError};
use crate::models::{LogVisitRequest, Notice, NoticeKind, Overview};
use crate::overview::build_overview_at;
use crate::state::AppState;
use crate::storage::VisitStore;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    render_page(&state, None).await
}

pub async fn log_visit(
    State(state): State<AppState>,
    Form(payload): Form<LogVisitRequest>,
) -> Html<String> {
    let date = payload.date;
    let notice = match with_store(&state, move |store| store.insert(date)).await {
        Ok(()) => {
            info!(%date, "office visit logged");
            Notice::success("Office visit logged successfully!")
        }
        Err(StoreError::DuplicateKey(_)) => {
            Notice::warning("An office visit entry already exists for the selected date.")
        }
        Err(err) => {
            error!("failed to log visit: {err}");
            Notice::error(format!("Failed to log the visit: {err}"))
        }
    };

    render_page(&state, Some(notice)).await
}

pub async fn delete_visit(State(state): State<AppState>, Path(key): Path<String>) -> Html<String> {
    let notice = match delete_key(&state, key).await {
        Ok(()) => Notice::success("Entry deleted successfully."),
        Err(err) => {
            error!("failed to delete visit: {err}");
            Notice::error(format!("Failed to delete the entry: {err}"))
        }
    };

    render_page(&state, Some(notice)).await
}

pub async fn get_overview(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    Ok(Json(load_overview(&state, today()).await?))
}

pub async fn create_visit(
    State(state): State<AppState>,
    Json(payload): Json<LogVisitRequest>,
) -> Result<(StatusCode, Json<Overview>), AppError> {
    let date = payload.date;
    with_store(&state, move |store| store.insert(date)).await?;
    info!(%date, "office visit logged");
    Ok((StatusCode::CREATED, Json(load_overview(&state, today()).await?)))
}

pub async fn remove_visit(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Overview>, AppError> {
    delete_key(&state, key).await?;
    Ok(Json(load_overview(&state, today()).await?))
}

/// Re-reads the full table and re-derives the count and weekdays.
pub async fn load_overview(state: &AppState, today: NaiveDate) -> Result<Overview, StoreError> {
    let records = with_store(state, |store| store.list_all()).await?;
    Ok(build_overview_at(today, &records))
}

async fn delete_key(state: &AppState, key: String) -> Result<(), StoreError> {
    let target = key.clone();
    with_store(state, move |store| store.delete(&target)).await?;
    info!(key, "office visit deleted");
    Ok(())
}

async fn render_page(state: &AppState, notice: Option<Notice>) -> Html<String> {
    let today = today();
    match load_overview(state, today).await {
        Ok(overview) => Html(render_index(today, &overview, notice.as_ref())),
        Err(err) => {
            error!("failed to load visits: {err}");
            // Keep the action's own notice when it already reports a failure.
            let notice = notice
                .filter(|n| n.kind == NoticeKind::Error)
                .unwrap_or_else(|| Notice::error(format!("Failed to load office visits: {err}")));
            Html(render_index(today, &Overview::default(), Some(&notice)))
        }
    }
}

/// Runs a store call on the blocking pool, creating the table first so every
/// operation works against a fresh database file.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&VisitStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || {
        store.ensure_schema()?;
        op(&store)
    })
    .await?
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use tempfile::TempDir;
    use tower::util::ServiceExt; // for `oneshot`

    fn setup_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().join("visits.db"));
        (router(state), temp_dir)
    }

    fn setup_broken_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().join("missing").join("visits.db"));
        (router(state), temp_dir)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_shows_empty_state() {
        let (app, _dir) = setup_app();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("No office visits logged yet."));
        assert!(html.contains("Office Visits This Month: <span id=\"month-count\">0</span>"));
    }

    #[tokio::test]
    async fn form_submit_logs_visit_and_warns_on_duplicate() {
        let (app, _dir) = setup_app();

        let first = app
            .clone()
            .oneshot(form_post("/visits", "date=2024-01-01"))
            .await
            .unwrap();
        let html = body_text(first).await;
        assert!(html.contains("Office visit logged successfully!"));
        assert!(html.contains("2024-01-01"));
        assert!(html.contains("Monday"));

        let second = app
            .oneshot(form_post("/visits", "date=2024-01-01"))
            .await
            .unwrap();
        let html = body_text(second).await;
        assert!(html.contains("An office visit entry already exists for the selected date."));
        assert_eq!(html.matches("<td class=\"date\">2024-01-01</td>").count(), 1);
    }

    #[tokio::test]
    async fn delete_control_removes_row() {
        let (app, _dir) = setup_app();
        let logged = app
            .clone()
            .oneshot(form_post("/visits", "date=2024-01-01"))
            .await
            .unwrap();
        let html = body_text(logged).await;
        assert!(html.contains("<td class=\"date\">2024-01-01</td>"));

        let response = app
            .oneshot(form_post("/visits/2024-01-01/delete", ""))
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("Entry deleted successfully."));
        assert!(html.contains("No office visits logged yet."));
    }

    #[tokio::test]
    async fn api_duplicate_is_conflict() {
        let (app, _dir) = setup_app();
        let request = || {
            Request::builder()
                .method(Method::POST)
                .uri("/api/visits")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"date":"2024-01-05"}"#))
                .unwrap()
        };

        let created = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let overview: Overview = serde_json::from_str(&body_text(created).await).unwrap();
        assert_eq!(overview.visits.len(), 1);

        let duplicate = app.oneshot(request()).await.unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn storage_fault_renders_error_notice() {
        let (app, _dir) = setup_broken_app();

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Failed to load office visits"));
    }

    #[tokio::test]
    async fn failed_delete_keeps_its_own_error_notice() {
        let (app, _dir) = setup_broken_app();

        let response = app
            .oneshot(form_post("/visits/2024-01-01/delete", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Failed to delete the entry: "));
        assert!(!html.contains("Failed to load office visits"));
        assert!(html.contains(r#"data-type="error""#));
    }

    #[tokio::test]
    async fn failed_insert_keeps_its_own_error_notice() {
        let (app, _dir) = setup_broken_app();

        let response = app
            .oneshot(form_post("/visits", "date=2024-01-01"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Failed to log the visit: "));
        assert!(!html.contains("Failed to load office visits"));
    }

    #[tokio::test]
    async fn delete_control_acts_on_the_stored_text() {
        let (app, dir) = setup_app();
        let db_path = dir.path().join("visits.db");
        let store = VisitStore::new(&db_path);
        store.ensure_schema().unwrap();
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute("INSERT INTO office_visits (date) VALUES ('2024-1-5')", [])
            .unwrap();
        drop(conn);

        let page = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(page).await;
        assert!(html.contains(r#"<td class="date">2024-1-5</td>"#));
        assert!(html.contains(r#"action="/visits/2024-1-5/delete""#));

        let response = app
            .oneshot(form_post("/visits/2024-1-5/delete", ""))
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("Entry deleted successfully."));
        assert!(html.contains("No office visits logged yet."));
        assert!(store.list_all().unwrap().is_empty());
    }
}
