use crate::errors::PortalError;
use crate::models::{AdminStatus, ColumnSet, Theme};
use crate::render::html_escape;
use crate::session::TabSession;
use std::collections::BTreeSet;
use std::fmt::Write;

pub const CHOOSE_PLACEHOLDER: &str = r#"<option value="">-- elegir --</option>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Danger,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub text: String,
}

impl Alert {
    pub fn new(kind: AlertKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, text)
    }

    pub fn from_error(operation: &str, err: &PortalError) -> Self {
        if err.is_validation() {
            Self::warning(err.to_string())
        } else {
            Self::new(AlertKind::Danger, format!("{operation}: {err}"))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminView {
    pub user: Option<String>,
    pub login_open: bool,
    pub alert: Option<Alert>,
    pub columns: Option<ColumnSet>,
    pub dni_column: String,
    pub fecha_column: String,
    pub visible: BTreeSet<String>,
    pub status: Option<AdminStatus>,
}

impl AdminView {
    pub fn from_tab(tab: &TabSession) -> Self {
        Self {
            user: tab.admin.credential().map(|c| c.user.clone()),
            login_open: false,
            alert: None,
            columns: tab.columns.clone(),
            dni_column: tab.dni_column.clone(),
            fecha_column: tab.fecha_column.clone(),
            visible: tab.visible.clone(),
            status: None,
        }
    }

    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryView {
    pub dni: String,
    pub fecha: String,
    pub alert: Option<Alert>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub theme: Theme,
    pub admin: AdminView,
    pub query: QueryView,
}

pub fn render_page(view: &PageView) -> String {
    let theme_label = match view.theme {
        Theme::Light => "&#9790; Modo noche",
        Theme::Dark => "&#9728; Modo día",
    };
    let logged_in = view.admin.user.is_some();

    let admin_nav = if logged_in {
        r#"<form method="post" action="/admin/logout"><button id="admin-logout-btn" class="btn-secondary" type="submit">Cerrar sesión</button></form>"#
    } else {
        r#"<a id="admin-login-btn" class="btn-secondary" href="/admin/login">Admin</a>"#
    };

    let login_dialog = if !logged_in && view.admin.login_open {
        LOGIN_DIALOG
    } else {
        ""
    };

    let admin_panel = if logged_in {
        render_admin_panel(&view.admin)
    } else {
        String::new()
    };

    fill_template(
        INDEX_HTML,
        &[
            ("THEME", view.theme.as_str()),
            ("THEME_LABEL", theme_label),
            ("ADMIN_NAV", admin_nav),
            ("LOGIN_DIALOG", login_dialog),
            ("ADMIN_ALERT", render_alert("admin-alert", view.admin.alert.as_ref()).as_str()),
            ("ADMIN_PANEL", admin_panel.as_str()),
            ("QUERY_DNI", html_escape(&view.query.dni).as_str()),
            ("QUERY_FECHA", html_escape(&view.query.fecha).as_str()),
            ("QUERY_ALERT", render_alert("consulta-alert", view.query.alert.as_ref()).as_str()),
            ("RESULT", view.query.result.as_deref().unwrap_or("")),
        ],
    )
}

fn render_alert(id: &str, alert: Option<&Alert>) -> String {
    match alert {
        Some(alert) => format!(
            r#"<div id="{id}" class="alert alert-{}" role="alert"><span>{}</span><a class="alert-close" href="/" aria-label="Cerrar">&times;</a></div>"#,
            alert.kind.class(),
            html_escape(&alert.text),
        ),
        None => String::new(),
    }
}

fn render_admin_panel(admin: &AdminView) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section id="admin-panel" class="card">
      <h2>Administración</h2>
      <p class="hint">Sesión: {}</p>
      <form id="upload-form" method="post" action="/admin/upload" enctype="multipart/form-data">
        <input id="excel-file" type="file" name="file" accept=".xlsx,.xls" />
        <button type="submit">Subir Excel</button>
      </form>
      <form id="config-form" method="post" action="/admin/config">
        <label>Columna DNI
          <select id="dni-col" name="dni_column">{}</select>
        </label>
        <label>Columna Fecha
          <select id="fecha-col" name="fecha_column">{}</select>
        </label>
        <div id="columns-list">{}</div>
        <div class="row">
          <button id="btn-select-all" class="btn-secondary" type="submit" name="action" value="select_all">Seleccionar todo</button>
          <button id="btn-clear-all" class="btn-secondary" type="submit" name="action" value="clear_all">Limpiar</button>
          <button type="submit" name="action" value="save">Guardar configuración</button>
        </div>
      </form>
      <form method="post" action="/admin/status">
        <button class="btn-secondary" type="submit">Ver estado</button>
      </form>
{}    </section>"#,
        html_escape(admin.user.as_deref().unwrap_or_default()),
        render_options(admin.columns.as_ref(), &admin.dni_column),
        render_options(admin.columns.as_ref(), &admin.fecha_column),
        render_checkboxes(admin.columns.as_ref(), &admin.visible),
        render_status(admin.status.as_ref()),
    );
    html
}

fn render_options(columns: Option<&ColumnSet>, selected: &str) -> String {
    let mut html = String::from(CHOOSE_PLACEHOLDER);
    for column in columns.into_iter().flat_map(|c| c.iter()) {
        let escaped = html_escape(column);
        let marker = if column == selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{escaped}"{marker}>{escaped}</option>"#);
    }
    html
}

fn render_checkboxes(columns: Option<&ColumnSet>, visible: &BTreeSet<String>) -> String {
    let mut html = String::new();
    for column in columns.into_iter().flat_map(|c| c.iter()) {
        let escaped = html_escape(column);
        let checked = if visible.contains(column) { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<label class="check"><input type="checkbox" name="visible" value="{escaped}"{checked} /><span>{escaped}</span></label>"#
        );
    }
    html
}

fn render_status(status: Option<&AdminStatus>) -> String {
    let Some(status) = status else {
        return String::new();
    };
    let config = match &status.config {
        Some(config) => format!(
            "DNI: {} · Fecha: {} · Visibles: {}",
            html_escape(config.dni.as_deref().unwrap_or("-")),
            html_escape(config.fecha.as_deref().unwrap_or("-")),
            html_escape(&config.visibles.join(", ")),
        ),
        None => "Sin configuración guardada".to_string(),
    };
    format!(
        "      <div id=\"admin-status\" class=\"hint\"><div>Empleados cargados: {}</div><div>{config}</div></div>\n",
        status.employees
    )
}

/// Single-pass `{{KEY}}` substitution, so inserted values are never rescanned.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

const LOGIN_DIALOG: &str = r#"<div id="admin-login-modal" class="card dialog">
      <h2>Acceso administrador</h2>
      <form id="admin-login-form" method="post" action="/admin/login">
        <input id="admin-user" name="user" placeholder="Usuario" autocomplete="username" />
        <input id="admin-pass" name="pass" type="password" placeholder="Contraseña" autocomplete="current-password" />
        <div class="row">
          <button type="submit">Ingresar</button>
          <a class="btn-secondary" href="/">Cancelar</a>
        </div>
      </form>
    </div>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Consulta de vacaciones</title>
  <style>
    :root {
      --bg: #f4f6fa;
      --ink: #1d2430;
      --muted: #5f6b7a;
      --card: #ffffff;
      --border: rgba(29, 36, 48, 0.1);
      --accent: #1f6feb;
      --info: #e7f1ff;
      --success: #e6f6ec;
      --warning: #fff6db;
      --danger: #fdecea;
      --shadow: 0 18px 44px rgba(29, 36, 48, 0.12);
    }

    [data-theme="dark"] {
      --bg: #0f141b;
      --ink: #e6edf7;
      --muted: #9aa7b8;
      --card: #17202b;
      --border: rgba(255, 255, 255, 0.1);
      --accent: #5cb0ff;
      --info: #15304d;
      --success: #163826;
      --warning: #3d3214;
      --danger: #46201d;
      --shadow: 0 18px 44px rgba(0, 0, 0, 0.4);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", system-ui, sans-serif;
      padding: 24px 16px 48px;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    header nav {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.5rem, 3vw, 2.1rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .dialog {
      max-width: 420px;
    }

    form {
      display: grid;
      gap: 12px;
      margin: 0 0 16px;
    }

    header form {
      margin: 0;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid var(--border);
      background: var(--bg);
      color: var(--ink);
    }

    button, .btn-secondary {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
    }

    .btn-secondary {
      background: transparent;
      color: var(--ink);
      border: 1px solid var(--border);
    }

    #columns-list {
      display: flex;
      flex-wrap: wrap;
      gap: 8px 16px;
    }

    .check {
      display: inline-flex;
      gap: 6px;
      align-items: center;
    }

    .alert {
      display: flex;
      justify-content: space-between;
      gap: 12px;
      padding: 12px 16px;
      border-radius: 12px;
      border: 1px solid var(--border);
    }

    .alert-info { background: var(--info); }
    .alert-success { background: var(--success); }
    .alert-warning { background: var(--warning); }
    .alert-danger { background: var(--danger); }

    .alert-close {
      color: inherit;
      text-decoration: none;
      font-weight: 700;
    }

    .results {
      width: 100%;
      border-collapse: collapse;
      margin-top: 12px;
    }

    .results th, .results td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid var(--border);
    }

    .results tbody tr:nth-child(odd) {
      background: var(--bg);
    }

    .hint {
      color: var(--muted);
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Consulta de vacaciones</h1>
      <nav>
        <form method="post" action="/theme/toggle">
          <button id="theme-toggle" class="btn-secondary" type="submit">{{THEME_LABEL}}</button>
        </form>
        {{ADMIN_NAV}}
      </nav>
    </header>

    {{LOGIN_DIALOG}}
    {{ADMIN_ALERT}}
    {{ADMIN_PANEL}}

    <section class="card">
      <h2>Consulta</h2>
      <form id="consulta-form" method="post" action="/consulta">
        <input id="dni" name="dni" placeholder="DNI" value="{{QUERY_DNI}}" />
        <input id="fecha" name="fecha" placeholder="DD/MM/AAAA" value="{{QUERY_FECHA}}" />
        <button type="submit">Consultar</button>
      </form>
      {{QUERY_ALERT}}
      <div id="resultado">{{RESULT}}</div>
    </section>
  </main>
</body>
</html>
"#;
