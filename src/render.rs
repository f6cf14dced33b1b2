use crate::models::PeriodRecord;
use serde_json::Value;
use std::fmt::Write;

pub const NO_RECORDS_NOTICE: &str = "No se encontraron registros.";

const PLACEHOLDER: &str = "-";

/// Renders the result area for a successful query.
pub fn render_results(records: &[PeriodRecord]) -> String {
    let Some(person) = records.first() else {
        return format!(r#"<div class="alert alert-info" id="no-records">{NO_RECORDS_NOTICE}</div>"#);
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="card" id="result-header">
  <div><strong>DNI:</strong> <span id="result-dni">{}</span></div>
  <div><strong>Apellidos y Nombres:</strong> <span id="result-name">{}</span></div>
</div>
"#,
        cell(&person.dni),
        cell(&person.apellidos_nombres),
    );

    html.push_str(
        r#"<table class="results">
  <thead>
    <tr><th>Periodo</th><th>Fecha ingreso</th><th>Días pendientes</th><th>Vencimiento</th><th>Observación</th></tr>
  </thead>
  <tbody>
"#,
    );
    for record in records {
        let _ = writeln!(
            html,
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            cell(&record.periodo_vacacional),
            cell(&record.fecha_ingreso),
            cell(&record.dias_pendientes),
            cell(&record.vencimiento),
            cell(&record.observacion),
        );
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

fn cell(value: &Option<Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return PLACEHOLDER.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    html_escape(&text)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
