//! Terminal rendering.
//!
//! Turns formatted documents, chat entries and products into styled lines
//! using `console`. Styling is dropped automatically when stdout is not a
//! terminal.

use std::collections::HashSet;
use std::sync::Arc;

use console::{style, Term};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Notify;
use tracing::{debug, warn};
use uuid::Uuid;

use lumina_chat::{Block, DisplayEntry, Document, HeadingLevel, Lane, Session, Span};
use lumina_core::events::SessionEvent;
use lumina_core::types::Product;

pub fn spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(t) => t.clone(),
            Span::Strong(t) => style(t).bold().to_string(),
            Span::Emphasis(t) => style(t).italic().to_string(),
        })
        .collect()
}

pub fn document(doc: &Document) -> String {
    let mut lines = Vec::new();
    for (i, block) in doc.blocks.iter().enumerate() {
        match block {
            Block::Heading { level, spans: s } => {
                if i > 0 {
                    lines.push(String::new());
                }
                let text = spans(s);
                lines.push(match level {
                    HeadingLevel::Section => style(text).cyan().bold().underlined().to_string(),
                    HeadingLevel::Subsection => style(text).cyan().bold().to_string(),
                });
            }
            Block::NumberedItem { number, spans: s } => {
                lines.push(format!("  {} {}", style(number).yellow(), spans(s)));
            }
            Block::BulletItem { spans: s } => {
                lines.push(format!("  {} {}", style("•").dim(), spans(s)));
            }
            Block::Paragraph { lines: para } => {
                lines.extend(para.iter().map(|line| spans(line)));
            }
        }
    }
    lines.join("\n")
}

/// One chat window entry with its lane prefix.
pub fn entry(entry: &DisplayEntry) -> String {
    let body = match &entry.document {
        Some(doc) => document(doc),
        None => entry.text.clone(),
    };
    match entry.lane {
        Lane::User => format!("{} {}", style("you ›").green().bold(), body),
        Lane::Ai if entry.is_error() => {
            format!("{} {}", style("lumina ›").magenta().bold(), style(body).red())
        }
        Lane::Ai => format!("{} {}", style("lumina ›").magenta().bold(), body),
        Lane::Loading => style(body).dim().to_string(),
    }
}

/// Catalog line: checkbox, id, name, brand.
pub fn product_line(product: &Product, selected: bool) -> String {
    let mark = if selected {
        style("[x]").green().to_string()
    } else {
        "[ ]".to_string()
    };
    format!(
        "{} {:>4}  {} {}",
        mark,
        product.id,
        style(&product.name).bold(),
        style(format!("({})", product.brand)).dim()
    )
}

pub fn product_detail(product: &Product, selected: bool) -> Vec<String> {
    vec![
        format!("{} {}", style(&product.name).bold(), style(format!("#{}", product.id)).dim()),
        format!("Brand:    {}", product.brand),
        format!("Category: {}", product.category),
        format!("Image:    {}", product.image),
        String::new(),
        product.description.clone(),
        String::new(),
        if selected {
            style("Selected").green().to_string()
        } else {
            style("Not selected").dim().to_string()
        },
    ]
}

pub fn error_line(message: &str) -> String {
    style(format!("error: {}", message)).red().to_string()
}

pub fn notice(message: &str) -> String {
    style(message).dim().to_string()
}

/// Print chat window entries as they appear.
///
/// Runs until the event bus closes or `shutdown` is notified. Entries are
/// printed once, by id; an entry removed before the next redraw is never
/// printed. A final redraw on shutdown catches entries whose events were
/// still queued.
pub async fn follow_display(
    session: Arc<Session>,
    mut rx: broadcast::Receiver<SessionEvent>,
    term: Term,
    shutdown: Arc<Notify>,
) {
    let mut shown: HashSet<Uuid> = session.display_entries().iter().map(|e| e.id).collect();

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(SessionEvent::DisplayUpdated) => print_new(&session, &mut shown, &term),
                Ok(SessionEvent::SelectionChanged { selected }) => {
                    debug!(count = selected.len(), "Selection changed");
                }
                Ok(event) => debug!(?event, "Session event"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Display renderer lagged");
                    print_new(&session, &mut shown, &term);
                }
                Err(RecvError::Closed) => break,
            },
            _ = shutdown.notified() => {
                print_new(&session, &mut shown, &term);
                break;
            }
        }
    }
}

fn print_new(session: &Session, shown: &mut HashSet<Uuid>, term: &Term) {
    for e in session.display_entries() {
        if shown.insert(e.id) {
            if let Err(err) = term.write_line(&entry(&e)) {
                warn!(error = %err, "Failed to write to terminal");
            }
        }
    }
}
