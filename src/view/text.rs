//! Plain-text rendering of a [`ViewModel`] for the terminal.

use std::fmt::Write;

use super::{Card, CardKind, CardsView, TableRow, TableView, Tone, ViewModel};

const HEADERS: [&str; 9] = [
    "Status",
    "OP",
    "ID Produto",
    "Produto",
    "Espécie",
    "Subespécie",
    "Qtd Prevista",
    "Qtd Registrada",
    "Tipo",
];

fn cells(row: &TableRow) -> [String; 9] {
    [
        row.status.clone(),
        row.op_code.clone(),
        row.product_id.clone(),
        row.product_name.clone(),
        row.species.clone(),
        row.sub_species.clone(),
        row.planned.to_string(),
        row.registered.to_string(),
        row.kind_icon.to_string(),
    ]
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn placeholder(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Normal => text.to_string(),
        Tone::Error => format!("!! {}", text),
    }
}

pub fn render_table(table: &TableView) -> String {
    let rows = match table {
        TableView::Placeholder { text, tone } => return format!("{}\n", placeholder(text, *tone)),
        TableView::Rows { rows } => rows,
    };

    let body: Vec<[String; 9]> = rows.iter().map(cells).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cols: &[String]| -> String {
        let padded: Vec<String> = cols.iter().zip(widths.iter()).map(|(c, w)| pad(c, *w)).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(out, "{}", line(&header[..]));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", line(&rule[..]));
    for row in &body {
        let _ = writeln!(out, "{}", line(&row[..]));
    }
    out
}

fn render_card(out: &mut String, card: &Card) {
    let title = match card.kind {
        CardKind::Species => format!("[ {} ]", card.title),
        CardKind::Total => format!("== {} ==", card.title),
    };
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "  Qtd Prevista: {}", card.planned);
    let _ = writeln!(out, "  Qtd Registrada: {}", card.registered);
    let _ = writeln!(out, "  Concluído: {}%", card.completion_pct);
}

pub fn render_cards(cards: &CardsView) -> String {
    match cards {
        CardsView::Placeholder { text, tone } => format!("{}\n", placeholder(text, *tone)),
        CardsView::Cards { cards } => {
            let mut out = String::new();
            for card in cards {
                render_card(&mut out, card);
            }
            out
        }
    }
}

pub fn render(view: &ViewModel) -> String {
    format!("{}\n{}", render_table(&view.table), render_cards(&view.cards))
}
