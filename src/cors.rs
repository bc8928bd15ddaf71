//! Permissive cross-origin access, so the browser front-end can be served
//! from anywhere.

use std::path::PathBuf;

use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Status},
    Request, Response, Route,
};

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub fn routes() -> Vec<Route> {
    routes![preflight]
}

/// Answer every pre-flight request; the headers are added by [`CorsFairing`].
#[options("/<path..>")]
fn preflight(path: PathBuf) -> Status {
    debug!("Pre-flight for /{}", path.display());
    Status::NoContent
}

/// A fairing that adds the CORS headers to every response.
#[derive(Debug, Copy, Clone)]
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        res.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
        // Echo back whatever headers the pre-flight asked for.
        if let Some(requested) = req.headers().get_one("Access-Control-Request-Headers") {
            res.set_header(Header::new(
                "Access-Control-Allow-Headers",
                requested.to_string(),
            ));
            res.adjoin_header(Header::new("Vary", "Access-Control-Request-Headers"));
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::{http::Header, local::blocking::Client};

    use super::*;

    #[get("/ping")]
    fn ping() -> &'static str {
        "pong"
    }

    fn client() -> Client {
        let rocket = rocket::build()
            .attach(CorsFairing)
            .mount("/", routes![ping])
            .mount("/", super::routes());
        Client::untracked(rocket).unwrap()
    }

    #[test]
    fn every_response_allows_any_origin() {
        let client = client();
        let response = client.get("/ping").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
    }

    #[test]
    fn preflight_echoes_requested_headers() {
        let client = client();
        let response = client
            .options("/api/vote")
            .header(Header::new("Origin", "http://localhost:5173"))
            .header(Header::new("Access-Control-Request-Method", "POST"))
            .header(Header::new("Access-Control-Request-Headers", "content-type"))
            .dispatch();
        assert_eq!(response.status(), Status::NoContent);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Headers"),
            Some("content-type")
        );
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Methods"),
            Some(ALLOWED_METHODS)
        );
    }
}
