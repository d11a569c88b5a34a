//! REPL commands.
//!
//! Lines starting with `/` are commands; anything else is a chat message.
//! Selection and catalog commands run synchronously against the session.
//! Chat and routine requests are handed back to the caller to spawn.

use lumina_chat::{ChatError, Session};
use lumina_core::selection::SelectionChange;
use lumina_core::types::ProductId;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Categories,
    List(String),
    Show(ProductId),
    Toggle(ProductId),
    Remove(ProductId),
    Clear,
    Selected,
    Routine,
    Help,
    Quit,
    Chat(String),
    Empty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("usage: /{0}")]
    Usage(&'static str),
    #[error("not a product id: {0}")]
    InvalidId(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Chat(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "categories" => Ok(Command::Categories),
            "list" if arg.is_empty() => Err(CommandError::Usage("list <category>")),
            "list" => Ok(Command::List(arg.to_string())),
            "show" => parse_id(arg, "show <id>").map(Command::Show),
            "toggle" => parse_id(arg, "toggle <id>").map(Command::Toggle),
            "remove" => parse_id(arg, "remove <id>").map(Command::Remove),
            "clear" => Ok(Command::Clear),
            "selected" => Ok(Command::Selected),
            "routine" => Ok(Command::Routine),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(arg: &str, usage: &'static str) -> Result<ProductId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    arg.parse()
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

/// What the input loop should do next.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Print(Vec<String>),
    Ask(String),
    Routine,
    Quit,
    Nothing,
}

pub fn execute(command: Command, session: &Session) -> Result<Action, ChatError> {
    let catalog = session.catalog();
    let action = match command {
        Command::Categories => Action::Print(
            catalog
                .categories()
                .into_iter()
                .map(|c| format!("{} ({})", c, catalog.by_category(c).count()))
                .collect(),
        ),
        Command::List(category) => {
            let lines: Vec<String> = catalog
                .by_category(&category)
                .map(|p| render::product_line(p, session.is_selected(p.id)))
                .collect();
            if lines.is_empty() {
                Action::Print(vec![render::notice(&format!(
                    "No products in category \"{}\".",
                    category
                ))])
            } else {
                Action::Print(lines)
            }
        }
        Command::Show(id) => match catalog.get(id) {
            Some(product) => Action::Print(render::product_detail(product, session.is_selected(id))),
            None => Action::Print(vec![unknown_product(id)]),
        },
        Command::Toggle(id) => {
            let line = match session.toggle(id)? {
                SelectionChange::Added => format!("Selected {}.", product_name(session, id)),
                SelectionChange::Removed => format!("Unselected {}.", product_name(session, id)),
                SelectionChange::Ignored => unknown_product(id),
            };
            Action::Print(vec![line])
        }
        Command::Remove(id) => {
            session.remove(id)?;
            Action::Print(vec![render::notice(&format!("Product #{} removed.", id))])
        }
        Command::Clear => {
            session.clear_selection()?;
            Action::Print(vec![render::notice("Selection cleared.")])
        }
        Command::Selected => {
            let products = session.selected_products();
            if products.is_empty() {
                Action::Print(vec![render::notice("No products selected.")])
            } else {
                Action::Print(
                    products
                        .iter()
                        .map(|p| render::product_line(p, true))
                        .collect(),
                )
            }
        }
        Command::Routine => Action::Routine,
        Command::Help => Action::Print(help()),
        Command::Quit => Action::Quit,
        Command::Chat(text) => Action::Ask(text),
        Command::Empty => Action::Nothing,
    };
    Ok(action)
}

fn product_name(session: &Session, id: ProductId) -> String {
    session
        .catalog()
        .get(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("#{}", id))
}

fn unknown_product(id: ProductId) -> String {
    render::notice(&format!("No product with id {}.", id))
}

pub fn help() -> Vec<String> {
    [
        "/categories         list product categories",
        "/list <category>    list products in a category",
        "/show <id>          show one product",
        "/toggle <id>        select or unselect a product",
        "/remove <id>        unselect a product",
        "/clear              clear the selection",
        "/selected           list selected products",
        "/routine            generate a routine from the selection",
        "/help               show this help",
        "/quit               exit",
        "anything else       ask the assistant",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use console::strip_ansi_codes;
    use lumina_core::selection::SELECTION_KEY;
    use lumina_core::{Catalog, EventBus, MemoryStore};

    fn session() -> Session {
        let json = r#"{"products": [
            {"id": 1, "name": "Micellar Water", "brand": "Garnier", "category": "skincare",
             "description": "Gentle cleanser.", "image": "https://cdn.example/1.webp"},
            {"id": 2, "name": "Voluminous Mascara", "brand": "L'Oreal Paris", "category": "makeup",
             "description": "Builds volume.", "image": "https://cdn.example/2.webp"},
            {"id": 3, "name": "Vitamin C Serum", "brand": "CeraVe", "category": "skincare",
             "description": "Brightening serum.", "image": "https://cdn.example/3.webp"}
        ]}"#;
        Session::new(
            Arc::new(Catalog::from_json(json).unwrap()),
            Arc::new(MemoryStore::new()),
            SELECTION_KEY,
            EventBus::default(),
        )
    }

    fn lines(action: Action) -> Vec<String> {
        match action {
            Action::Print(lines) => lines
                .iter()
                .map(|l| strip_ansi_codes(l).to_string())
                .collect(),
            other => panic!("expected printed output, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/categories"), Ok(Command::Categories));
        assert_eq!(
            Command::parse("/list  skincare "),
            Ok(Command::List("skincare".to_string()))
        );
        assert_eq!(Command::parse("/show 4"), Ok(Command::Show(4)));
        assert_eq!(Command::parse("/toggle 12"), Ok(Command::Toggle(12)));
        assert_eq!(Command::parse("/remove 3"), Ok(Command::Remove(3)));
        assert_eq!(Command::parse("/clear"), Ok(Command::Clear));
        assert_eq!(Command::parse("/selected"), Ok(Command::Selected));
        assert_eq!(Command::parse("/routine"), Ok(Command::Routine));
        assert_eq!(Command::parse("/help"), Ok(Command::Help));
        assert_eq!(Command::parse("/quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("/exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_chat_and_empty() {
        assert_eq!(
            Command::parse("  what is niacinamide?  "),
            Ok(Command::Chat("what is niacinamide?".to_string()))
        );
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("/dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(Command::parse("/toggle"), Err(CommandError::Usage("toggle <id>")));
        assert_eq!(Command::parse("/list"), Err(CommandError::Usage("list <category>")));
        assert_eq!(
            Command::parse("/show abc"),
            Err(CommandError::InvalidId("abc".to_string()))
        );
    }

    #[test]
    fn test_categories_in_catalog_order() {
        let session = session();
        let out = lines(execute(Command::Categories, &session).unwrap());
        assert_eq!(out, vec!["skincare (2)", "makeup (1)"]);
    }

    #[test]
    fn test_list_marks_selected() {
        let session = session();
        session.toggle(3).unwrap();

        let out = lines(execute(Command::List("skincare".to_string()), &session).unwrap());
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("[ ]"));
        assert!(out[1].starts_with("[x]"));
    }

    #[test]
    fn test_list_unknown_category() {
        let session = session();
        let out = lines(execute(Command::List("fragrance".to_string()), &session).unwrap());
        assert_eq!(out, vec!["No products in category \"fragrance\"."]);
    }

    #[test]
    fn test_toggle_reports_change() {
        let session = session();
        let out = lines(execute(Command::Toggle(2), &session).unwrap());
        assert_eq!(out, vec!["Selected Voluminous Mascara."]);
        assert!(session.is_selected(2));

        let out = lines(execute(Command::Toggle(2), &session).unwrap());
        assert_eq!(out, vec!["Unselected Voluminous Mascara."]);

        let out = lines(execute(Command::Toggle(42), &session).unwrap());
        assert_eq!(out, vec!["No product with id 42."]);
    }

    #[test]
    fn test_remove_clear_and_selected() {
        let session = session();
        session.toggle(1).unwrap();
        session.toggle(2).unwrap();

        execute(Command::Remove(1), &session).unwrap();
        let out = lines(execute(Command::Selected, &session).unwrap());
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("Voluminous Mascara"));

        execute(Command::Clear, &session).unwrap();
        let out = lines(execute(Command::Selected, &session).unwrap());
        assert_eq!(out, vec!["No products selected."]);
    }

    #[test]
    fn test_show_product() {
        let session = session();
        let out = lines(execute(Command::Show(3), &session).unwrap());
        assert_eq!(out[0], "Vitamin C Serum #3");

        let out = lines(execute(Command::Show(9), &session).unwrap());
        assert_eq!(out, vec!["No product with id 9."]);
    }

    #[test]
    fn test_exchange_commands_are_deferred() {
        let session = session();
        assert_eq!(execute(Command::Routine, &session).unwrap(), Action::Routine);
        assert_eq!(
            execute(Command::Chat("hi".to_string()), &session).unwrap(),
            Action::Ask("hi".to_string())
        );
        assert_eq!(execute(Command::Quit, &session).unwrap(), Action::Quit);
        assert_eq!(execute(Command::Empty, &session).unwrap(), Action::Nothing);
    }
}
