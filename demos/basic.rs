//! Minimal genuz example: a function route, a parameterized route, a
//! resource, JSON, templates, static files, middleware and an exception
//! handler.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8080/hello/alice
//!   curl http://localhost:8080/books
//!   curl -X POST http://localhost:8080/books -d '{"title":"Dune"}'
//!   curl -X DELETE http://localhost:8080/books        # 405
//!   curl http://localhost:8080/boom                   # exception handler
//!   curl http://localhost:8080/static/site.css        # needs ./static/site.css

use genuz::middleware::Trace;
use genuz::{App, BoxError, Config, Params, Request, Resource, Response, Server, Status, context};
use serde::Deserialize;

#[derive(Deserialize)]
struct NewBook {
    title: String,
}

#[tokio::main]
async fn main() -> Result<(), genuz::Error> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut app = App::with_config(config)?;
    let templates = app.templates();

    app.add_middleware(Trace)
        .add_exception_handler(|_: &Request, resp: &mut Response, err: &BoxError| {
            resp.set_status(Status::InternalServerError);
            resp.set_text(format!("Something bad happened: {err}"));
        });

    app.route("/hello/{name}", greeting)?
        .resource("/books", Resource::new().get(list_books).post(create_book))?
        .route("/boom", boom)?
        .route("/", move |_: &Request, resp: &mut Response, _: &Params| -> Result<(), BoxError> {
            resp.set_html(templates.render(
                "home.html",
                context! { new_title => "genuz", new_body => "It works." },
            )?);
            Ok(())
        })?;

    Server::from_config(&app)?.serve(app).await
}

// GET /hello/{name}
fn greeting(_req: &Request, resp: &mut Response, params: &Params) {
    resp.set_text(format!("Hello, {}", params.get("name").unwrap_or("stranger")));
}

// GET /books
fn list_books(_req: &Request, resp: &mut Response, _: &Params) -> Result<(), BoxError> {
    resp.set_json(&["Dune", "Solaris"])?;
    Ok(())
}

// POST /books  → 201
fn create_book(req: &Request, resp: &mut Response, _: &Params) -> Result<(), BoxError> {
    let book: NewBook = req.json()?;
    resp.set_status(Status::Created);
    resp.set_header("location", "/books/99");
    resp.set_json(&serde_json::json!({ "id": 99, "title": book.title }))?;
    Ok(())
}

// GET /boom → handled by the exception handler
fn boom(_req: &Request, _resp: &mut Response, _: &Params) -> Result<(), BoxError> {
    Err("the handler gave up".into())
}
