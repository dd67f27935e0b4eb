use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use genuz::middleware::Middleware;
use genuz::{
    App, BoxError, Config, Error, HandlerPanic, Method, Params, Request, Resource, Response, context,
};

fn fixtures_config() -> Config {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    Config {
        static_dir: format!("{root}/static").into(),
        templates_dir: format!("{root}/templates").into(),
        ..Config::default()
    }
}

fn app() -> App {
    App::with_config(fixtures_config()).unwrap()
}

fn home(_: &Request, resp: &mut Response, _: &Params) {
    resp.set_text("Hello from Home");
}

#[test]
fn basic_route() {
    let mut app = app();
    app.route("/home", home).unwrap();

    let resp = app.test_client().get("http://testserver/home").unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text(), "Hello from Home");
}

#[test]
fn duplicate_route_is_rejected() {
    let mut app = app();
    app.route("/home", home).unwrap();

    let err = app
        .route("/home", |_: &Request, resp: &mut Response, _: &Params| resp.set_text("imposter"))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateRoute { .. }));
    assert_eq!(app.test_client().get("/home").unwrap().text(), "Hello from Home");
}

#[test]
fn parameterized_routing() {
    let mut app = app();
    app.route("/hello/{name}", |_: &Request, resp: &mut Response, params: &Params| {
        resp.set_text(format!("Hello, {}", params.get("name").unwrap_or_default()));
    })
    .unwrap();

    let client = app.test_client();
    assert_eq!(client.get("http://testserver/hello/Ezozbek").unwrap().text(), "Hello, Ezozbek");
    assert_eq!(client.get("http://testserver/hello/Bob").unwrap().text(), "Hello, Bob");

    let extra = client.get("http://testserver/hello/Bob/extra").unwrap();
    assert_eq!(extra.status(), 404);
}

#[test]
fn default_response_is_404() {
    let app = app();
    let resp = app.test_client().get("http://testserver/nonexistent").unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text(), "Not Found.");
}

#[test]
fn class_based_get_and_post() {
    let mut app = app();
    app.resource(
        "/books",
        Resource::new()
            .get(|_: &Request, resp: &mut Response, _: &Params| resp.set_text("Books page"))
            .post(|_: &Request, resp: &mut Response, _: &Params| {
                resp.set_text("endpoint to create a book")
            }),
    )
    .unwrap();

    let client = app.test_client();
    assert_eq!(client.get("http://testserver/books").unwrap().text(), "Books page");
    assert_eq!(
        client.post("http://testserver/books", "").unwrap().text(),
        "endpoint to create a book"
    );
}

#[test]
fn class_based_method_not_allowed() {
    let mut app = app();
    app.resource(
        "/books",
        Resource::new().post(|_: &Request, resp: &mut Response, _: &Params| {
            resp.set_text("endpoint to create a book")
        }),
    )
    .unwrap();

    let resp = app.test_client().get("http://testserver/books").unwrap();
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.text(), "Method Not Allowed");
}

#[test]
fn allowed_methods_for_function_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut app = app();
    app.route_with(
        "/home",
        move |_: &Request, resp: &mut Response, _: &Params| {
            seen.fetch_add(1, Ordering::SeqCst);
            resp.set_text("Hello from home");
        },
        &[Method::Post],
    )
    .unwrap();

    let resp = app.test_client().get("http://testserver/home").unwrap();
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.text(), "Method Not Allowed");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let resp = app.test_client().post("http://testserver/home", "").unwrap();
    assert_eq!(resp.text(), "Hello from home");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn template_handler() {
    let mut app = app();
    let templates = app.templates();
    app.route("/html", move |_: &Request, resp: &mut Response, _: &Params| -> Result<(), Error> {
        resp.set_html(templates.render(
            "home.html",
            context! { new_title => "Best title", new_body => "Best body" },
        )?);
        Ok(())
    })
    .unwrap();

    let resp = app.test_client().get("http://testserver/html").unwrap();
    assert!(resp.header("Content-Type").unwrap().contains("text/html"));
    assert!(resp.text().contains("Best title"));
    assert!(resp.text().contains("Best body"));
}

#[test]
fn app_template_shortcut() {
    let app = app();
    let html = app.template("home.html", context! { new_title => "T", new_body => "B" }).unwrap();
    assert!(html.contains("<title>T</title>"));
}

#[test]
fn custom_exception_handler() {
    let mut app = app();
    app.add_exception_handler(|_: &Request, resp: &mut Response, _: &BoxError| {
        resp.set_text("Something bad happened");
    });
    app.route("/exception", |_: &Request, _: &mut Response, _: &Params| -> Result<(), BoxError> {
        Err("some error".into())
    })
    .unwrap();

    let resp = app.test_client().get("http://testserver/exception").unwrap();
    assert_eq!(resp.text(), "Something bad happened");
}

#[test]
fn panicking_handler_reaches_exception_handler() {
    let mut app = app();
    app.add_exception_handler(|_: &Request, resp: &mut Response, err: &BoxError| {
        resp.set_status(500u16);
        match err.downcast_ref::<HandlerPanic>() {
            Some(_) => resp.set_text("handled panic"),
            None => resp.set_text("handled error"),
        }
    });
    app.route("/boom", |_: &Request, resp: &mut Response, params: &Params| {
        resp.set_text(params.get("missing").unwrap().to_owned());
    })
    .unwrap();

    let resp = app.test_client().get("http://testserver/boom").unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text(), "handled panic");

    // The app keeps serving after a panic.
    app.route("/home", home).unwrap();
    assert_eq!(app.test_client().get("/home").unwrap().text(), "Hello from Home");
}

#[test]
fn unhandled_handler_error_propagates() {
    let mut app = app();
    app.route("/exception", |_: &Request, _: &mut Response, _: &Params| -> Result<(), BoxError> {
        Err("some error".into())
    })
    .unwrap();

    let err = app.test_client().get("/exception").unwrap_err();
    assert!(matches!(err, Error::Handler(_)));
}

#[test]
fn static_files() {
    let app = app();
    let client = app.test_client();

    let resp = client.get("http://testserver/static/test.css").unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text(), "body {background-color: chocolate;}");

    assert_eq!(client.get("http://testserver/static/missing.css").unwrap().status(), 404);
    assert_eq!(client.get("http://testserver/nonexistent.css").unwrap().status(), 404);
}

#[test]
fn static_files_bypass_middleware() {
    struct Stamp;
    impl Middleware for Stamp {
        fn process_response(&self, _: &Request, resp: &mut Response) {
            resp.set_header("x-stamp", "1");
        }
    }

    let mut app = app();
    app.add_middleware(Stamp).route("/home", home).unwrap();
    let client = app.test_client();

    assert_eq!(client.get("/home").unwrap().header("x-stamp"), Some("1"));
    assert_eq!(client.get("/static/test.css").unwrap().header("x-stamp"), None);
}

#[test]
fn middleware_hooks_run_once_in_order() {
    #[derive(Clone)]
    struct Simple(Arc<std::sync::Mutex<Vec<&'static str>>>);

    impl Middleware for Simple {
        fn process_request(&self, req: &mut Request) {
            self.0.lock().unwrap().push("process_request");
            req.insert_header("x-middleware", "yes");
        }

        fn process_response(&self, _: &Request, _: &mut Response) {
            self.0.lock().unwrap().push("process_response");
        }
    }

    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let handler_log = Arc::clone(&log);

    let mut app = app();
    app.add_middleware(Simple(Arc::clone(&log)));
    app.route("/home", move |req: &Request, resp: &mut Response, _: &Params| {
        handler_log.lock().unwrap().push("handler");
        resp.set_text(req.header("x-middleware").unwrap_or("no").to_owned());
    })
    .unwrap();

    let resp = app.test_client().get("http://testserver/home").unwrap();
    assert_eq!(resp.text(), "yes");
    assert_eq!(*log.lock().unwrap(), ["process_request", "handler", "process_response"]);
}

#[test]
fn json_response_helper() {
    let mut app = app();
    app.route("/json", |_: &Request, resp: &mut Response, _: &Params| -> Result<(), Error> {
        resp.set_json(&serde_json::json!({ "name": "Ezozbek" }))
    })
    .unwrap();

    let resp = app.test_client().get("http://testserver/json").unwrap();
    assert_eq!(resp.header("Content-Type"), Some("application/json"));
    let data: serde_json::Value = resp.json().unwrap();
    assert_eq!(data["name"], "Ezozbek");
}

#[test]
fn text_response_helper() {
    let mut app = app();
    app.route("/text", |_: &Request, resp: &mut Response, _: &Params| resp.set_text("plain text"))
        .unwrap();

    let resp = app.test_client().get("http://testserver/text").unwrap();
    assert!(resp.header("Content-Type").unwrap().contains("text/plain"));
    assert_eq!(resp.text(), "plain text");
}

#[test]
fn config_prefix_is_honoured() {
    let mut config = fixtures_config();
    config.static_prefix = "/assets".to_owned();
    let app = App::with_config(config).unwrap();
    let client = app.test_client();

    assert_eq!(client.get("/assets/test.css").unwrap().status(), 200);
    assert_eq!(client.get("/static/test.css").unwrap().text(), "Not Found.");
}

#[test]
fn static_prefix_must_be_a_real_path() {
    for prefix in ["/", "assets", ""] {
        let config = Config { static_prefix: prefix.to_owned(), ..fixtures_config() };
        assert!(
            matches!(App::with_config(config), Err(Error::InvalidStaticPrefix { .. })),
            "{prefix:?}"
        );
    }
}
