use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub dni_column: String,
    pub fecha_column: String,
    pub visible_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub columns: Vec<String>,
    #[serde(default, alias = "rows_count")]
    pub rows: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedConfig {
    #[serde(alias = "dni_column")]
    pub dni: Option<String>,
    #[serde(alias = "fecha_column")]
    pub fecha: Option<String>,
    #[serde(default, alias = "visible_columns")]
    pub visibles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatus {
    pub employees: u64,
    #[serde(default)]
    pub config: Option<SavedConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(rename = "PERIODO_VACACIONAL", default)]
    pub periodo_vacacional: Option<Value>,
    #[serde(rename = "FECHA_INGRESO", default)]
    pub fecha_ingreso: Option<Value>,
    #[serde(rename = "DIAS_PENDIENTES", default)]
    pub dias_pendientes: Option<Value>,
    #[serde(rename = "VENCIMIENTO", default)]
    pub vencimiento: Option<Value>,
    #[serde(rename = "OBSERVACION", default)]
    pub observacion: Option<Value>,
    #[serde(rename = "DNI", default)]
    pub dni: Option<Value>,
    #[serde(rename = "APELLIDOS_NOMBRES", default)]
    pub apellidos_nombres: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<PeriodRecord>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalData {
    pub themes: BTreeMap<String, Theme>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub fecha: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    Save,
    SelectAll,
    ClearAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub dni_column: String,
    pub fecha_column: String,
    pub visible: Vec<String>,
    pub action: ConfigAction,
}

impl ConfigForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut form = ConfigForm {
            dni_column: String::new(),
            fecha_column: String::new(),
            visible: Vec::new(),
            action: ConfigAction::Save,
        };
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "dni_column" => form.dni_column = value.trim().to_string(),
                "fecha_column" => form.fecha_column = value.trim().to_string(),
                "visible" => {
                    if !form.visible.iter().any(|v| v == value.as_ref()) {
                        form.visible.push(value.into_owned());
                    }
                }
                "action" => {
                    form.action = match value.as_ref() {
                        "select_all" => ConfigAction::SelectAll,
                        "clear_all" => ConfigAction::ClearAll,
                        _ => ConfigAction::Save,
                    }
                }
                _ => {}
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_response_accepts_missing_optional_fields() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"found": false}"#).unwrap();
        assert!(!parsed.found);
        assert!(parsed.message.is_none());
        assert!(parsed.results.is_none());
    }

    #[test]
    fn period_record_keeps_mixed_value_types() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{"found": true, "results": [
                {"DNI": "123", "DIAS_PENDIENTES": 15, "OBSERVACION": null, "EXTRA": "x"}
            ]}"#,
        )
        .unwrap();
        let record = &parsed.results.unwrap()[0];
        assert_eq!(record.dni, Some(Value::String("123".into())));
        assert_eq!(record.dias_pendientes, Some(Value::from(15)));
        assert!(record.observacion.is_none() || record.observacion == Some(Value::Null));
        assert!(record.vencimiento.is_none());
    }

    #[test]
    fn query_response_rejects_non_array_results() {
        let parsed = serde_json::from_str::<QueryResponse>(r#"{"found": true, "results": "nope"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_form_collects_repeated_visible_columns() {
        let form = ConfigForm::parse(
            b"dni_column=DNI&fecha_column=+FECHA+&visible=NOMBRE&visible=DNI&visible=NOMBRE&action=save",
        );
        assert_eq!(form.dni_column, "DNI");
        assert_eq!(form.fecha_column, "FECHA");
        assert_eq!(form.visible, vec!["NOMBRE".to_string(), "DNI".to_string()]);
        assert_eq!(form.action, ConfigAction::Save);
    }

    #[test]
    fn config_form_reads_bulk_actions() {
        assert_eq!(ConfigForm::parse(b"action=select_all").action, ConfigAction::SelectAll);
        assert_eq!(ConfigForm::parse(b"action=clear_all").action, ConfigAction::ClearAll);
        assert_eq!(ConfigForm::parse(b"").action, ConfigAction::Save);
    }

    #[test]
    fn theme_round_trips_through_lowercase_names() {
        let theme: Theme = serde_json::from_str(r#""dark""#).unwrap();
        assert_eq!(theme, Theme::Dark);
        assert_eq!(theme.toggled().as_str(), "light");
    }
}
