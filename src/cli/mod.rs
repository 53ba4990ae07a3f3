//! `bm` command tree and execution
//!
//! Every command talks to the API through `CatalogClient`. Output goes to the
//! writer passed in; failures are reported as per-field problems or a single
//! apology line, never as raw errors.

pub mod table;

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};

use crate::client::{CatalogClient, ClientError};
use crate::domain::{Book, BookFilter, BookInput, BookMetadata, CollectionInput};

pub const APOLOGY: &str = "Something went horribly wrong and I'm so sorry";

/// Book Manager is a nifty system to manage books
#[derive(Debug, Parser)]
#[command(name = "bm")]
#[command(about = "Book Manager is a nifty system to manage books")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the version number of Book Manager
    Version,
    /// Add books or collections
    #[command(subcommand)]
    Add(AddCommand),
    /// View books and collections
    #[command(subcommand)]
    View(ViewCommand),
    /// Edit a book
    #[command(subcommand)]
    Edit(EditCommand),
    /// Remove books, or books from a collection
    #[command(subcommand)]
    Remove(RemoveCommand),
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    /// Add a book
    Book(BookArgs),
    /// Add a collection
    Collection {
        /// name of the collection
        #[arg(long, default_value = "")]
        name: String,
        /// description of the collection
        #[arg(long = "collection-description", default_value = "")]
        collection_description: String,
    },
    /// Add books to a collection
    ToCollection(MembershipArgs),
}

#[derive(Debug, Subcommand)]
pub enum ViewCommand {
    /// List books, optionally filtered
    Books(BookFilterArgs),
    /// Show one book and its collections
    Book {
        /// isbn of the book
        #[arg(long)]
        isbn: String,
    },
    /// List collections with their book counts
    Collections,
    /// Show one collection and its books
    Collection {
        /// id of the collection
        #[arg(long)]
        id: i32,
    },
}

#[derive(Debug, Subcommand)]
pub enum EditCommand {
    /// Replace a book's details
    Book(BookArgs),
}

#[derive(Debug, Subcommand)]
pub enum RemoveCommand {
    /// Remove a book
    Book {
        /// isbn of the book
        #[arg(long)]
        isbn: String,
    },
    /// Remove books from a collection
    FromCollection(MembershipArgs),
}

#[derive(Debug, Default, Args)]
pub struct BookArgs {
    /// isbn of the book
    #[arg(long, default_value = "")]
    pub isbn: String,
    /// title of the book
    #[arg(long, default_value = "")]
    pub title: String,
    /// author of the book
    #[arg(long, default_value = "")]
    pub author: String,
    /// description of the book
    #[arg(long, default_value = "")]
    pub description: String,
    /// year the book was published
    #[arg(long)]
    pub published: Option<i32>,
    /// genres of the book, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub genres: Vec<String>,
}

impl From<BookArgs> for BookInput {
    fn from(args: BookArgs) -> Self {
        BookInput {
            isbn: args.isbn,
            title: args.title,
            author: args.author,
            description: args.description,
            published_year: args.published,
            metadata: BookMetadata {
                genres: args.genres,
            },
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct BookFilterArgs {
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub published: Option<i32>,
    /// match books having any of these genres, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub genres: Vec<String>,
}

impl From<BookFilterArgs> for BookFilter {
    fn from(args: BookFilterArgs) -> Self {
        BookFilter {
            isbn: args.isbn,
            title: args.title,
            author: args.author,
            description: args.description,
            published_year: args.published,
            genres: args.genres,
        }
    }
}

#[derive(Debug, Args)]
pub struct MembershipArgs {
    /// id of the collection
    #[arg(long)]
    pub id: i32,
    /// isbns of the books, comma-separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub isbns: Vec<String>,
}

pub fn version_line() -> String {
    format!("Book Manager CLI v{}", env!("CARGO_PKG_VERSION"))
}

/// Print what went wrong in terms the user can act on
pub fn report_failure<W: Write>(out: &mut W, err: &ClientError) -> io::Result<()> {
    tracing::debug!("Command failed: {}", err);

    match err {
        ClientError::Api { status, errors } if !status.is_server_error() && !errors.is_empty() => {
            for e in errors {
                match &e.field {
                    Some(field) => writeln!(out, "problem with {}: {}", field, e.message)?,
                    None => writeln!(out, "problem: {}", e.message)?,
                }
            }
            Ok(())
        }
        _ => writeln!(out, "{}", APOLOGY),
    }
}

fn book_rows(books: &[Book]) -> Vec<Vec<String>> {
    books
        .iter()
        .map(|b| {
            vec![
                b.isbn.clone(),
                b.title.clone(),
                b.author.clone(),
                b.description.clone(),
                b.published_year.map(|y| y.to_string()).unwrap_or_default(),
            ]
        })
        .collect()
}

const BOOK_HEADERS: [&str; 5] = ["ISBN", "Title", "Author", "Description", "Published"];

/// Run one command against the API
pub async fn execute<W: Write>(
    command: Command,
    client: &CatalogClient,
    out: &mut W,
) -> io::Result<()> {
    match command {
        Command::Version => writeln!(out, "{}", version_line()),
        Command::Add(add) => execute_add(add, client, out).await,
        Command::View(view) => execute_view(view, client, out).await,
        Command::Edit(EditCommand::Book(args)) => {
            let input = BookInput::from(args);
            if input.isbn.trim().is_empty() {
                return writeln!(out, "problem with isbn: required");
            }
            match client.edit_book(&input.isbn, &input).await {
                Ok(book) => writeln!(out, "{} successfully updated", book.isbn),
                Err(e) => report_failure(out, &e),
            }
        }
        Command::Remove(RemoveCommand::Book { isbn }) => match client.remove_book(&isbn).await {
            Ok(()) => writeln!(out, "{} successfully removed from books", isbn),
            Err(e) => report_failure(out, &e),
        },
        Command::Remove(RemoveCommand::FromCollection(args)) => {
            match client
                .remove_books_from_collection(args.id, args.isbns)
                .await
            {
                Ok(outcome) => writeln!(
                    out,
                    "removed {} book(s) from collection {} ({} not in it)",
                    outcome.changed.len(),
                    outcome.collection_id,
                    outcome.unchanged.len()
                ),
                Err(e) => report_failure(out, &e),
            }
        }
    }
}

async fn execute_add<W: Write>(
    command: AddCommand,
    client: &CatalogClient,
    out: &mut W,
) -> io::Result<()> {
    match command {
        AddCommand::Book(args) => {
            let input = BookInput::from(args);
            match client.add_book(&input).await {
                Ok(book) => writeln!(out, "{} successfully added to books", book.title),
                Err(e) => report_failure(out, &e),
            }
        }
        AddCommand::Collection {
            name,
            collection_description,
        } => {
            let input = CollectionInput {
                name,
                description: collection_description,
            };
            match client.add_collection(&input).await {
                Ok(collection) => writeln!(
                    out,
                    "collection {} successfully added to collections with id {}",
                    collection.name, collection.id
                ),
                Err(e) => report_failure(out, &e),
            }
        }
        AddCommand::ToCollection(args) => {
            match client.add_books_to_collection(args.id, args.isbns).await {
                Ok(outcome) => writeln!(
                    out,
                    "added {} book(s) to collection {} ({} already in it)",
                    outcome.changed.len(),
                    outcome.collection_id,
                    outcome.unchanged.len()
                ),
                Err(e) => report_failure(out, &e),
            }
        }
    }
}

async fn execute_view<W: Write>(
    command: ViewCommand,
    client: &CatalogClient,
    out: &mut W,
) -> io::Result<()> {
    match command {
        ViewCommand::Books(args) => match client.list_books(&BookFilter::from(args)).await {
            Ok(books) => writeln!(out, "{}", table::render(&BOOK_HEADERS, &book_rows(&books))),
            Err(e) => report_failure(out, &e),
        },
        ViewCommand::Book { isbn } => match client.get_book(&isbn).await {
            Ok(book) => {
                writeln!(out, "ISBN:        {}", book.isbn)?;
                writeln!(out, "Title:       {}", book.title)?;
                writeln!(out, "Author:      {}", book.author)?;
                writeln!(out, "Description: {}", book.description)?;
                if let Some(year) = book.published_year {
                    writeln!(out, "Published:   {}", year)?;
                }
                writeln!(out, "Genres:      {}", book.metadata.genres.join(", "))?;
                let collections: Vec<String> = book
                    .collections
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| format!("{} ({})", c.name, c.id))
                    .collect();
                writeln!(out, "Collections: {}", collections.join(", "))
            }
            Err(e) => report_failure(out, &e),
        },
        ViewCommand::Collections => match client.list_collections().await {
            Ok(collections) => {
                let rows: Vec<Vec<String>> = collections
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.description.clone(),
                            c.total_books.to_string(),
                        ]
                    })
                    .collect();
                writeln!(
                    out,
                    "{}",
                    table::render(&["ID", "Name", "Description", "Books"], &rows)
                )
            }
            Err(e) => report_failure(out, &e),
        },
        ViewCommand::Collection { id } => match client.get_collection(id).await {
            Ok(collection) => {
                writeln!(out, "Collection {}: {}", collection.id, collection.name)?;
                if !collection.description.is_empty() {
                    writeln!(out, "{}", collection.description)?;
                }
                let books = collection.books.unwrap_or_default();
                writeln!(out, "{}", table::render(&BOOK_HEADERS, &book_rows(&books)))
            }
            Err(e) => report_failure(out, &e),
        },
    }
}
