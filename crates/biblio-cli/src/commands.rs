use std::sync::Arc;

use anyhow::Context;
use biblio_catalog::{Book, BookCatalog, BookFields, BookId};
use biblio_server::{BiblioServer, ServerConfig};
use biblio_store::{InMemoryKvStore, RedisKvStore};
use colored::Colorize;
use tracing::warn;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ServerConfig::load(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::List => cmd_list(&connect(&config).await?, &format).await,
        Command::Show(args) => cmd_show(&connect(&config).await?, book_id(args.id)?, &format).await,
        Command::Add(args) => cmd_add(&connect(&config).await?, args, &format).await,
        Command::Edit(args) => cmd_edit(&connect(&config).await?, args, &format).await,
        Command::Delete(args) => cmd_delete(&connect(&config).await?, book_id(args.id)?).await,
        Command::Search(args) => cmd_search(&connect(&config).await?, &args.query, &format).await,
    }
}

async fn connect(config: &ServerConfig) -> anyhow::Result<BookCatalog> {
    let store = RedisKvStore::connect(&config.store)
        .await
        .with_context(|| format!("connecting to {}", config.store.url()))?;
    Ok(BookCatalog::new(Arc::new(store)))
}

fn book_id(raw: u64) -> anyhow::Result<BookId> {
    Ok(BookId::new(raw)?)
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    let server = if args.memory {
        warn!("using in-memory store; books are lost on exit");
        BiblioServer::new(config, Arc::new(InMemoryKvStore::new()))
    } else {
        BiblioServer::connect(config).await?
    };
    server.serve().await?;
    Ok(())
}

pub(crate) fn book_line(book: &Book) -> String {
    format!(
        "{:>5}  {}  {} {}  {}",
        format!("#{}", book.id).yellow(),
        book.title().bold(),
        "by".dimmed(),
        book.author(),
        format!("[{}]", book.genre()).cyan(),
    )
}

fn print_books(books: &[Book], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(books)?),
        OutputFormat::Text => {
            if books.is_empty() {
                println!("No books.");
            }
            for book in books {
                println!("{}", book_line(book));
            }
        }
    }
    Ok(())
}

fn print_book(book: &Book, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(book)?),
        OutputFormat::Text => println!("{}", book_line(book)),
    }
    Ok(())
}

async fn cmd_list(catalog: &BookCatalog, format: &OutputFormat) -> anyhow::Result<()> {
    let books = catalog.list_all().await?;
    print_books(&books, format)
}

async fn cmd_show(catalog: &BookCatalog, id: BookId, format: &OutputFormat) -> anyhow::Result<()> {
    let book = catalog
        .get(id)
        .await?
        .with_context(|| format!("book {id} not found"))?;
    print_book(&book, format)
}

async fn cmd_add(catalog: &BookCatalog, args: AddArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let book = catalog
        .create(BookFields::new(args.title, args.author, args.genre))
        .await?;
    if let OutputFormat::Text = format {
        print!("{} ", "✓ Added".green().bold());
    }
    print_book(&book, format)
}

/// Apply the given fields over the stored ones; unspecified fields are kept.
pub(crate) fn merge_fields(current: BookFields, args: EditArgs) -> BookFields {
    BookFields {
        title: args.title.unwrap_or(current.title),
        author: args.author.unwrap_or(current.author),
        genre: args.genre.unwrap_or(current.genre),
    }
}

async fn cmd_edit(catalog: &BookCatalog, args: EditArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let id = book_id(args.id)?;
    let current = catalog
        .get(id)
        .await?
        .with_context(|| format!("book {id} not found"))?;
    let fields = merge_fields(current.fields, args);
    catalog.save(id, &fields).await?;
    if let OutputFormat::Text = format {
        print!("{} ", "✓ Updated".green().bold());
    }
    print_book(&Book::new(id, fields), format)
}

async fn cmd_delete(catalog: &BookCatalog, id: BookId) -> anyhow::Result<()> {
    if catalog.delete(id).await? {
        println!("{} Deleted book {}", "✓".green().bold(), format!("#{id}").yellow());
    } else {
        println!("Book {} does not exist.", format!("#{id}").yellow());
    }
    Ok(())
}

async fn cmd_search(catalog: &BookCatalog, query: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let results = catalog.search(query).await?;
    if let OutputFormat::Text = format {
        println!("{} result(s) for {:?}", results.len().to_string().bold(), query);
    }
    print_books(&results, format)
}
