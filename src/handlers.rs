use crate::dates::maybe_to_iso_date;
use crate::errors::{AppError, PortalError, ValidationError};
use crate::models::{
    AdminConfig, AdminCredential, AdminStatus, ColumnSet, ConfigAction, ConfigForm, LoginForm,
    QueryForm, QueryResponse, UploadResponse,
};
use crate::render::render_results;
use crate::state::AppState;
use crate::ui::{render_page, Alert, AdminView, PageView, QueryView};
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, RawForm, State},
    response::{Html, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};
use uuid::Uuid;

pub const TAB_COOKIE: &str = "portal_tab";
pub const BROWSER_COOKIE: &str = "portal_browser";

struct Visitor {
    tab: Uuid,
    browser: String,
}

fn identify(jar: CookieJar) -> (CookieJar, Visitor) {
    let mut jar = jar;

    let existing_tab = jar
        .get(TAB_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());
    let tab = match existing_tab {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            // No max-age: the browser forgets it when the session ends.
            jar = jar.add(
                Cookie::build((TAB_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .build(),
            );
            id
        }
    };

    let existing_browser = jar.get(BROWSER_COOKIE).map(|c| c.value().to_string());
    let browser = match existing_browser {
        Some(id) if !id.is_empty() => id,
        _ => {
            let id = Uuid::new_v4().to_string();
            jar = jar.add(
                Cookie::build((BROWSER_COOKIE, id.clone()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .permanent()
                    .build(),
            );
            id
        }
    };

    (jar, Visitor { tab, browser })
}

async fn base_view(state: &AppState, visitor: &Visitor) -> PageView {
    let tab = state.sessions.snapshot(visitor.tab).await;
    PageView {
        theme: state.theme(&visitor.browser).await,
        admin: AdminView::from_tab(&tab),
        query: QueryView::default(),
    }
}

async fn admin_page(state: &AppState, visitor: &Visitor, alert: Alert) -> Html<String> {
    let mut view = base_view(state, visitor).await;
    view.admin = view.admin.with_alert(alert);
    Html(render_page(&view))
}

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let view = base_view(&state, &visitor).await;
    (jar, Html(render_page(&view)))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let mut view = base_view(&state, &visitor).await;
    view.admin.login_open = true;
    (jar, Html(render_page(&view)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let result = login_admin(&state, visitor.tab, &form).await;

    let mut view = base_view(&state, &visitor).await;
    view.admin.alert = Some(match &result {
        Ok(()) => Alert::success("Login correcto."),
        Err(err) => Alert::from_error("Error de login", err),
    });
    view.admin.login_open = result.is_err();
    (jar, Html(render_page(&view)))
}

async fn login_admin(state: &AppState, tab: Uuid, form: &LoginForm) -> Result<(), PortalError> {
    let user = form.user.trim();
    let pass = form.pass.trim();
    if user.is_empty() || pass.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }
    let credential = AdminCredential {
        user: user.to_string(),
        pass: pass.to_string(),
    };

    state.sessions.update(tab, |t| t.admin.begin_login()).await;
    match state.backend.login(&credential).await {
        Ok(()) => {
            info!(user = %credential.user, "admin logged in");
            state
                .sessions
                .update(tab, move |t| t.admin.complete_login(credential))
                .await;
            Ok(())
        }
        Err(err) => {
            warn!(user = %credential.user, "admin login failed: {err}");
            state.sessions.update(tab, |t| t.admin.fail_login()).await;
            Err(err)
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, visitor) = identify(jar);
    state.sessions.logout(visitor.tab).await;
    (jar, Redirect::to("/"))
}

struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, ValidationError> {
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(unreadable)?;
        if name.is_empty() || bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedFile {
            name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn unreadable(err: MultipartError) -> ValidationError {
    warn!("rejected upload body: {}", err.body_text());
    ValidationError::UnreadableUpload
}

pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let alert = match upload_roster(&state, visitor.tab, multipart).await {
        Ok(response) => Alert::success(upload_summary(&response)),
        Err(err) => Alert::from_error("Error subiendo Excel", &err),
    };
    (jar, admin_page(&state, &visitor, alert).await)
}

async fn upload_roster(
    state: &AppState,
    tab: Uuid,
    multipart: Multipart,
) -> Result<UploadResponse, PortalError> {
    // The previous column set is gone even if this upload fails.
    let credential = state
        .sessions
        .update(tab, |t| {
            t.reset_columns();
            t.admin.require_credential()
        })
        .await?;
    let file = read_upload(multipart)
        .await?
        .ok_or(ValidationError::MissingFile)?;

    let response = state
        .backend
        .upload(&credential, &file.name, file.bytes)
        .await?;
    info!(file = %file.name, columns = response.columns.len(), "roster uploaded");

    let columns = ColumnSet::new(response.columns.clone());
    state.sessions.update(tab, move |t| t.columns = Some(columns)).await;
    Ok(response)
}

fn upload_summary(response: &UploadResponse) -> String {
    match response.rows {
        Some(rows) => format!(
            "Excel subido. Columnas: {}. Filas: {rows}",
            response.columns.len()
        ),
        None => format!("Excel subido. Columnas: {}", response.columns.len()),
    }
}

pub async fn save_config(
    State(state): State<AppState>,
    jar: CookieJar,
    RawForm(body): RawForm,
) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let form = ConfigForm::parse(&body);
    let action = form.action;

    let alert = match action {
        ConfigAction::SelectAll | ConfigAction::ClearAll => {
            state
                .sessions
                .update(visitor.tab, |t| {
                    t.dni_column = form.dni_column.clone();
                    t.fecha_column = form.fecha_column.clone();
                    if action == ConfigAction::SelectAll {
                        t.select_all();
                    } else {
                        t.clear_all();
                    }
                })
                .await;
            None
        }
        ConfigAction::Save => Some(match save_configuration(&state, visitor.tab, form).await {
            Ok(()) => Alert::success("Configuración guardada correctamente."),
            Err(err) => Alert::from_error("Error guardando configuración", &err),
        }),
    };

    let mut view = base_view(&state, &visitor).await;
    view.admin.alert = alert;
    (jar, Html(render_page(&view)))
}

async fn save_configuration(state: &AppState, tab: Uuid, form: ConfigForm) -> Result<(), PortalError> {
    let (credential, config) = state
        .sessions
        .update(tab, move |t| -> Result<_, ValidationError> {
            t.dni_column = form.dni_column;
            t.fecha_column = form.fecha_column;
            t.visible = form.visible.into_iter().collect();

            let credential = t.admin.require_credential()?;
            if t.dni_column.is_empty() {
                return Err(ValidationError::MissingIdentifierColumn);
            }
            if t.fecha_column.is_empty() {
                return Err(ValidationError::MissingDateColumn);
            }
            if t.visible.is_empty() {
                return Err(ValidationError::NoVisibleColumns);
            }
            let config = AdminConfig {
                dni_column: t.dni_column.clone(),
                fecha_column: t.fecha_column.clone(),
                visible_columns: t.visible_in_order(),
            };
            Ok((credential, config))
        })
        .await?;

    state.backend.save_config(&credential, &config).await?;
    info!(
        dni = %config.dni_column,
        fecha = %config.fecha_column,
        visible = config.visible_columns.len(),
        "configuration saved"
    );
    Ok(())
}

pub async fn status(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let result = fetch_status(&state, visitor.tab).await;

    let mut view = base_view(&state, &visitor).await;
    match result {
        Ok(status) => view.admin.status = Some(status),
        Err(err) => view.admin.alert = Some(Alert::from_error("Error consultando estado", &err)),
    }
    (jar, Html(render_page(&view)))
}

async fn fetch_status(state: &AppState, tab: Uuid) -> Result<AdminStatus, PortalError> {
    let credential = state.sessions.snapshot(tab).await.admin.require_credential()?;
    state.backend.status(&credential).await
}

pub async fn consulta_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(form): Query<QueryForm>,
) -> (CookieJar, Html<String>) {
    consulta(state, jar, form).await
}

pub async fn consulta_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<QueryForm>,
) -> (CookieJar, Html<String>) {
    consulta(state, jar, form).await
}

async fn consulta(state: AppState, jar: CookieJar, form: QueryForm) -> (CookieJar, Html<String>) {
    let (jar, visitor) = identify(jar);
    let result = run_query(&state, &form).await;

    let mut view = base_view(&state, &visitor).await;
    view.query = query_view(&form, result);
    (jar, Html(render_page(&view)))
}

pub async fn api_query(
    State(state): State<AppState>,
    Query(form): Query<QueryForm>,
) -> Result<Json<QueryResponse>, AppError> {
    Ok(Json(run_query(&state, &form).await?))
}

async fn run_query(state: &AppState, form: &QueryForm) -> Result<QueryResponse, PortalError> {
    let dni = form.dni.trim();
    let fecha = form.fecha.trim();
    if dni.is_empty() || fecha.is_empty() {
        return Err(ValidationError::MissingQueryFields.into());
    }
    let fecha = maybe_to_iso_date(fecha);
    state.backend.query(dni, &fecha).await
}

fn query_view(form: &QueryForm, result: Result<QueryResponse, PortalError>) -> QueryView {
    let mut view = QueryView {
        dni: form.dni.trim().to_string(),
        fecha: form.fecha.trim().to_string(),
        ..QueryView::default()
    };
    match result {
        Ok(response) if !response.found => {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "No encontrado".to_string());
            view.alert = Some(Alert::warning(message));
        }
        Ok(response) => {
            let records = response.results.unwrap_or_default();
            view.result = Some(render_results(&records));
        }
        Err(err) => view.alert = Some(Alert::from_error("Error", &err)),
    }
    view
}

pub async fn toggle_theme(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, visitor) = identify(jar);
    let theme = state.toggle_theme(&visitor.browser).await;
    info!(theme = theme.as_str(), "theme changed");
    (jar, Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendClient;
    use crate::models::PortalData;
    use crate::render::NO_RECORDS_NOTICE;

    fn offline_state() -> AppState {
        AppState::new(
            BackendClient::new("http://127.0.0.1:9"),
            std::env::temp_dir().join("vacation_portal_handlers_unused.json"),
            PortalData::default(),
        )
    }

    #[tokio::test]
    async fn rejected_admin_requests_leave_no_tab_behind() {
        let state = offline_state();
        for _ in 0..200 {
            let tab = Uuid::new_v4();
            let form = ConfigForm::parse(b"dni_column=DNI&fecha_column=FECHA&visible=DNI");
            let err = save_configuration(&state, tab, form).await.unwrap_err();
            assert!(matches!(err, PortalError::Validation(ValidationError::NotLoggedIn)));

            let form = LoginForm {
                user: String::new(),
                pass: String::new(),
            };
            assert!(login_admin(&state, tab, &form).await.is_err());
            state.sessions.logout(tab).await;
        }
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn failed_backend_login_leaves_no_tab_behind() {
        let state = offline_state();
        let form = LoginForm {
            user: "admin".into(),
            pass: "secret".into(),
        };
        let err = login_admin(&state, Uuid::new_v4(), &form).await.unwrap_err();
        assert!(matches!(err, PortalError::Network(_)));
        assert!(state.sessions.is_empty().await);
    }

    fn form() -> QueryForm {
        QueryForm {
            dni: " 123 ".into(),
            fecha: "25/12/2024".into(),
        }
    }

    #[test]
    fn not_found_shows_message_without_table() {
        let view = query_view(
            &form(),
            Ok(QueryResponse {
                found: false,
                message: Some("No se encontró registro".into()),
                results: None,
            }),
        );
        assert!(view.result.is_none());
        assert_eq!(view.alert.unwrap().text, "No se encontró registro");
        assert_eq!(view.dni, "123");
    }

    #[test]
    fn not_found_without_message_uses_fallback() {
        let view = query_view(
            &form(),
            Ok(QueryResponse {
                found: false,
                message: None,
                results: Some(Vec::new()),
            }),
        );
        assert!(view.result.is_none());
        assert_eq!(view.alert.unwrap().text, "No encontrado");
    }

    #[test]
    fn found_with_no_results_renders_notice() {
        let view = query_view(
            &form(),
            Ok(QueryResponse {
                found: true,
                message: Some("ignored".into()),
                results: None,
            }),
        );
        assert!(view.alert.is_none());
        let html = view.result.unwrap();
        assert!(html.contains(NO_RECORDS_NOTICE));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn upload_summary_mentions_rows_when_known() {
        let response = UploadResponse {
            columns: vec!["A".into(), "B".into()],
            rows: Some(10),
        };
        assert_eq!(upload_summary(&response), "Excel subido. Columnas: 2. Filas: 10");
        let response = UploadResponse {
            columns: vec!["A".into()],
            rows: None,
        };
        assert_eq!(upload_summary(&response), "Excel subido. Columnas: 1");
    }
}
