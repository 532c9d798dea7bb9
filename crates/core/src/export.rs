//! Tabular export of the patient listing.

use crate::constants::EXPORT_FILE_STEM;
use crate::models::Patient;
use crate::{TrackerError, TrackerResult};
use serde_json::{Map, Value};

/// Export formats offered on the patient listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Latex,
    Tsv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Latex,
        ExportFormat::Tsv,
    ];

    /// Parse the query-string name (`csv`, `json`, `latex`, `tsv`).
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(value.trim()))
    }

    /// Query-string name (`latex` rather than the `tex` extension).
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Latex => "latex",
            other => other.extension(),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Latex => "tex",
            ExportFormat::Tsv => "tsv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Latex => "application/x-tex; charset=utf-8",
            ExportFormat::Tsv => "text/tab-separated-values; charset=utf-8",
        }
    }

    /// Download file name, e.g. `table.csv`.
    pub fn file_name(self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.extension())
    }
}

const HEADERS: [&str; 12] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Detected city",
    "Detected district",
    "Detected state",
    "Nationality",
    "Current status",
    "Diagnosed date",
    "Notes",
    "Source",
];

fn cells(patient: &Patient) -> [String; 12] {
    let f = &patient.fields;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        patient.id.to_string(),
        text(&f.name),
        f.age.map(|a| a.to_string()).unwrap_or_default(),
        f.gender.label().to_string(),
        text(&f.detected_city),
        f.detected_district.as_str().to_string(),
        f.detected_state.as_str().to_string(),
        text(&f.nationality),
        f.current_status.label().to_string(),
        f.diagnosed_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        text(&f.notes),
        text(&f.source),
    ]
}

/// Render `patients` as a complete document in `format`.
pub fn render(patients: &[Patient], format: ExportFormat) -> TrackerResult<String> {
    let rows: Vec<[String; 12]> = patients.iter().map(cells).collect();
    match format {
        ExportFormat::Csv => Ok(delimited(&rows, ',')),
        ExportFormat::Tsv => Ok(delimited(&rows, '\t')),
        ExportFormat::Json => json(&rows),
        ExportFormat::Latex => Ok(latex(&rows)),
    }
}

fn delimited(rows: &[[String; 12]], sep: char) -> String {
    let quote = |cell: &str| {
        if cell.contains([sep, '"', '\n', '\r']) {
            format!("\"{}\"", cell.replace('"', "\"\""))
        } else {
            cell.to_string()
        }
    };
    let line = |cells: Vec<String>| cells.join(&sep.to_string()) + "\r\n";

    let mut out = line(HEADERS.iter().map(|h| quote(*h)).collect());
    for row in rows {
        out.push_str(&line(row.iter().map(|c| quote(c.as_str())).collect()));
    }
    out
}

fn json(rows: &[[String; 12]]) -> TrackerResult<String> {
    let objects: Vec<Value> = rows
        .iter()
        .map(|row| {
            let map: Map<String, Value> = HEADERS
                .iter()
                .zip(row.iter())
                .map(|(h, c)| (h.to_string(), Value::String(c.clone())))
                .collect();
            Value::Object(map)
        })
        .collect();
    serde_json::to_string(&objects).map_err(TrackerError::Serialization)
}

fn latex(rows: &[[String; 12]]) -> String {
    fn escape(cell: &str) -> String {
        let mut out = String::with_capacity(cell.len());
        for c in cell.chars() {
            match c {
                '\\' => out.push_str("\\textbackslash{}"),
                '~' => out.push_str("\\textasciitilde{}"),
                '^' => out.push_str("\\textasciicircum{}"),
                '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                    out.push('\\');
                    out.push(c);
                }
                '\n' | '\r' => out.push(' '),
                _ => out.push(c),
            }
        }
        out
    }
    let line = |cells: Vec<String>| format!("{} \\\\\n", cells.join(" & "));

    let mut out = String::from("\\begin{table}[h]\n\\centering\n");
    out.push_str(&format!("\\begin{{tabular}}{{|{}}}\n\\hline\n", "l|".repeat(HEADERS.len())));
    out.push_str(&line(HEADERS.iter().map(|h| escape(h)).collect()));
    out.push_str("\\hline\n");
    for row in rows {
        out.push_str(&line(row.iter().map(|c| escape(c)).collect()));
    }
    out.push_str("\\hline\n\\end{tabular}\n\\end{table}\n");
    out
}
