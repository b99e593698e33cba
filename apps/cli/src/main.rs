use std::io::{self, BufRead};

use anyhow::Result;
use clap::Parser;
use client_core::PersistenceClient;
use editor::RowStore;
use shared::protocol::{CellEditEvent, RawValue};

/// Line-oriented stand-in for the grid widget: translates commands into
/// edit events and store operations, re-renders from the snapshot, and
/// submits batches to the persistence service.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the persistence service
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut store = RowStore::new();
    let client = PersistenceClient::new(args.server_url);

    print_help();
    render(&store);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if !dispatch(&mut store, &client, line.trim()).await {
            break;
        }
    }
    Ok(())
}

async fn dispatch(store: &mut RowStore, client: &PersistenceClient, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("add") => {
            store.add_row();
            render(store);
        }
        Some("delete") => match parse_position(parts.next()) {
            Some(position) => {
                match store.delete_row(position) {
                    Ok(()) => render(store),
                    Err(err) => println!("error: {err}"),
                }
            }
            None => println!("usage: delete POSITION"),
        },
        Some("set") => {
            let position = parse_position(parts.next());
            let field = parts.next().map(str::to_string);
            let value = parts.collect::<Vec<_>>().join(" ");
            match (position, field) {
                (Some(position), Some(field)) => {
                    let last = store.snapshot().len().saturating_sub(1);
                    let event = CellEditEvent {
                        position,
                        field: field.clone(),
                        raw_value: RawValue::Text(value),
                    };
                    match store.apply_event(&event) {
                        Ok(()) => {
                            // price is the last editable column: tabbing
                            // out of it on the last row starts a new one
                            if field == "price" && position == last {
                                store.add_row();
                            }
                            render(store);
                        }
                        Err(err) => println!("error: {err}"),
                    }
                }
                _ => println!("usage: set POSITION FIELD VALUE"),
            }
        }
        Some("select") => match parse_position(parts.next()) {
            Some(position) => match store.select_row(position) {
                Ok(row) => println!("selected row {} (id {})", position, row.0),
                Err(err) => println!("error: {err}"),
            },
            None => println!("usage: select POSITION"),
        },
        Some("clear") => {
            store.clear_all();
            render(store);
        }
        Some("show") => render(store),
        Some("save") => {
            let snapshot = store.snapshot();
            match client.save_rows(&snapshot.rows).await {
                Ok(message) => println!("{message}"),
                Err(err) => println!("save failed: {err}"),
            }
        }
        Some("save-ids") => {
            let identifiers = store.snapshot().identifiers();
            match client.save_identifiers(&identifiers).await {
                Ok(message) => println!("{message}"),
                Err(err) => println!("save failed: {err}"),
            }
        }
        Some("quit") | Some("exit") => return false,
        Some(other) => {
            println!("unknown command '{other}'");
            print_help();
        }
    }
    true
}

fn parse_position(token: Option<&str>) -> Option<usize> {
    token.and_then(|t| t.parse().ok())
}

fn render(store: &RowStore) {
    let snapshot = store.snapshot();
    println!(
        "{:<4} {:<12} {:<14} {:>12} {:>12} {:>12}  {}",
        "#", "identifier", "category", "price", "tax", "total", "last paid"
    );
    if snapshot.is_empty() {
        println!("(no rows)");
    }
    for (position, row) in snapshot.rows.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:<14} {:>12.2} {:>12.2} {:>12.2}  {}",
            position,
            row.identifier,
            row.category.label(),
            row.price,
            row.tax_amount,
            row.total,
            row.last_payment_date
        );
    }
    for (position, diagnostic) in snapshot.located_diagnostics() {
        println!("! row {position}: {}", diagnostic.message);
    }
}

fn print_help() {
    println!("commands:");
    println!("  add                       append a blank row");
    println!("  delete POSITION           remove the row at POSITION");
    println!("  set POSITION FIELD VALUE  edit a cell (identifier, category, price)");
    println!("  select POSITION           mark a row as selected");
    println!("  clear                     remove all rows");
    println!("  show                      re-render the grid");
    println!("  save                      submit all rows to the persistence service");
    println!("  save-ids                  submit the identifier column only");
    println!("  quit                      leave");
}
