//! Pure rendering: dashboard phase in, view model out.

use serde::Serialize;

use crate::dashboard::Phase;
use crate::model::Record;
use crate::summary::{Summary, SummaryRow};

pub mod text;

pub const LOADING_TABLE: &str = "Carregando dados...";
pub const LOADING_CARDS: &str = "Carregando...";
pub const NO_DATA_TABLE: &str = "Nenhum dado encontrado";
pub const NO_DATA_CARDS: &str = "Sem dados para exibir";
pub const TOTAL_TITLE: &str = "TOTAL GERAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Normal,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Over,
    Partial,
    Ok,
    Pending,
}

impl StatusClass {
    /// Substring match in priority order; anything unmatched is pending.
    pub fn for_status(text: &str) -> Self {
        if text.contains("a maior") {
            StatusClass::Over
        } else if text.contains("Registrando") {
            StatusClass::Partial
        } else if text.contains("Registro OK") {
            StatusClass::Ok
        } else {
            StatusClass::Pending
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            StatusClass::Over => "status-maior",
            StatusClass::Partial => "status-parcial",
            StatusClass::Ok => "status-ok",
            StatusClass::Pending => "status-pendente",
        }
    }
}

pub fn detail_path(op_code: &str) -> String {
    format!("/op/{}", op_code)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub status: String,
    pub status_class: StatusClass,
    pub op_code: String,
    pub product_id: String,
    pub product_name: String,
    pub species: String,
    pub sub_species: String,
    pub planned: f64,
    pub registered: f64,
    pub kind_icon: &'static str,
    pub detail_path: String,
}

impl TableRow {
    pub fn from_record(rec: &Record) -> Self {
        let status = rec.status.label().to_string();
        Self {
            status_class: StatusClass::for_status(&status),
            status,
            op_code: rec.op_code.clone(),
            product_id: rec.product_id.clone(),
            product_name: rec.product_name.clone(),
            species: rec.species.clone(),
            sub_species: rec.sub_species.clone(),
            planned: rec.planned_qty,
            registered: rec.registered_qty,
            kind_icon: rec.kind.icon(),
            detail_path: detail_path(&rec.op_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableView {
    Placeholder { text: String, tone: Tone },
    Rows { rows: Vec<TableRow> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Species,
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub planned: f64,
    pub registered: f64,
    pub completion_pct: f64,
    pub kind: CardKind,
}

impl Card {
    fn from_row(row: &SummaryRow, kind: CardKind) -> Self {
        let title = match kind {
            CardKind::Species => row.species.clone(),
            CardKind::Total => TOTAL_TITLE.to_string(),
        };
        Self {
            title,
            planned: row.planned,
            registered: row.registered,
            completion_pct: row.completion_pct(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardsView {
    Placeholder { text: String, tone: Tone },
    Cards { cards: Vec<Card> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub table: TableView,
    pub cards: CardsView,
}

impl ViewModel {
    fn placeholders(table: &str, cards: &str, tone: Tone) -> Self {
        Self {
            table: TableView::Placeholder { text: table.to_string(), tone },
            cards: CardsView::Placeholder { text: cards.to_string(), tone },
        }
    }
}

pub fn render_table(records: &[Record]) -> TableView {
    if records.is_empty() {
        return TableView::Placeholder { text: NO_DATA_TABLE.to_string(), tone: Tone::Normal };
    }
    TableView::Rows { rows: records.iter().map(TableRow::from_record).collect() }
}

/// One card per species, then the grand total.
pub fn render_cards(summary: &Summary) -> CardsView {
    if summary.is_empty() {
        return CardsView::Placeholder { text: NO_DATA_CARDS.to_string(), tone: Tone::Normal };
    }
    let mut cards: Vec<Card> =
        summary.rows.iter().map(|row| Card::from_row(row, CardKind::Species)).collect();
    cards.push(Card::from_row(&summary.total(), CardKind::Total));
    CardsView::Cards { cards }
}

pub fn render(phase: &Phase) -> ViewModel {
    match phase {
        Phase::Idle => ViewModel::placeholders("", "", Tone::Normal),
        Phase::Loading => ViewModel::placeholders(LOADING_TABLE, LOADING_CARDS, Tone::Normal),
        Phase::Loaded { records, summary } => ViewModel {
            table: render_table(records),
            cards: render_cards(summary),
        },
        Phase::Failed { message } => ViewModel::placeholders(
            &format!("Erro ao carregar dados: {}", message),
            &format!("Erro: {}", message),
            Tone::Error,
        ),
    }
}
