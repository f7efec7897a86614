//! Server-rendered HTML views.
//!
//! Every view is a plain function from its context to a complete page.
//! All user-provided text goes through [`escape`] before it reaches markup.

use std::fmt::Write;

use biblio_types::Book;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Biblio</title>
</head>
<body>
<nav><a href="/">Books</a> | <a href="/add">Add book</a> | <a href="/search">Search</a></nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn book_table(books: &[Book], with_actions: bool) -> String {
    let mut rows = String::new();
    for book in books {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            book.id,
            escape(book.title()),
            escape(book.author()),
            escape(book.genre()),
        );
        if with_actions {
            let _ = write!(
                rows,
                r#"<td><a href="/edit/{id}">Edit</a> <a href="/delete/{id}">Delete</a></td>"#,
                id = book.id,
            );
        }
        rows.push_str("</tr>\n");
    }
    let actions = if with_actions { "<th></th>" } else { "" };
    format!(
        "<table>\n<tr><th>ID</th><th>Title</th><th>Author</th><th>Genre</th>{actions}</tr>\n{rows}</table>"
    )
}

fn book_form(action: &str, title: &str, author: &str, genre: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Title <input type="text" name="title" value="{title}" required></label>
<label>Author <input type="text" name="author" value="{author}" required></label>
<label>Genre <input type="text" name="genre" value="{genre}" required></label>
<button type="submit">{submit}</button>
</form>"#,
        title = escape(title),
        author = escape(author),
        genre = escape(genre),
    )
}

/// All books, with edit and delete links.
pub fn list(books: &[Book]) -> String {
    let body = if books.is_empty() {
        r#"<p>No books yet. <a href="/add">Add one</a>.</p>"#.to_string()
    } else {
        book_table(books, true)
    };
    page("Books", &body)
}

/// Empty form for a new book.
pub fn add_form() -> String {
    page("Add book", &book_form("/add", "", "", "", "Add"))
}

/// Form pre-filled with the current fields of `book`.
pub fn edit_form(book: &Book) -> String {
    let action = format!("/edit/{}", book.id);
    page(
        "Edit book",
        &book_form(&action, book.title(), book.author(), book.genre(), "Save"),
    )
}

/// Asks for confirmation before deleting `book`.
pub fn delete_confirmation(book: &Book) -> String {
    let body = format!(
        r#"<p>Delete <strong>{title}</strong> by {author} ({genre})?</p>
<form method="post" action="/delete/confirm/{id}">
<button type="submit">Delete</button>
<a href="/">Cancel</a>
</form>"#,
        title = escape(book.title()),
        author = escape(book.author()),
        genre = escape(book.genre()),
        id = book.id,
    );
    page("Delete book", &body)
}

pub fn search_form() -> String {
    page("Search", &search_box(""))
}

fn search_box(query: &str) -> String {
    format!(
        r#"<form method="post" action="/search">
<input type="text" name="query" value="{}" placeholder="title, author or genre">
<button type="submit">Search</button>
</form>"#,
        escape(query)
    )
}

/// Search hits for `query`, echoing the query back.
pub fn search_results(results: &[Book], query: &str) -> String {
    let mut body = search_box(query);
    let _ = write!(
        body,
        "\n<p>{} result(s) for &quot;{}&quot;</p>\n",
        results.len(),
        escape(query)
    );
    if !results.is_empty() {
        body.push_str(&book_table(results, true));
    }
    page("Search results", &body)
}

pub fn error(message: &str) -> String {
    let body = format!(
        r#"<p class="error">{}</p>
<p><a href="/">Back to the list</a></p>"#,
        escape(message)
    );
    page("Error", &body)
}
