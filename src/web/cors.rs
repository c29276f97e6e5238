// src/web/cors.rs
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

/// CORS fairing that echoes the request origin only when it is on the
/// configured allow-list. Non-listed origins get no CORS header at all.
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Allow-listed CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            if self.allows(origin) {
                response.set_header(Header::new(
                    "Access-Control-Allow-Origin",
                    origin.to_string(),
                ));
                response.set_header(Header::new(
                    "Access-Control-Allow-Methods",
                    "POST, GET, OPTIONS",
                ));
                response.set_header(Header::new(
                    "Access-Control-Allow-Headers",
                    "Content-Type, Authorization",
                ));
                response.set_header(Header::new("Vary", "Origin"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_listed_origin_only() {
        let cors = Cors::new(vec![
            "https://app.introlink.app".to_string(),
            "http://localhost:5173".to_string(),
        ]);

        assert!(cors.allows("https://app.introlink.app"));
        assert!(cors.allows("http://localhost:5173"));
        assert!(!cors.allows("https://evil.example.com"));
        assert!(!cors.allows("https://app.introlink.app.evil.com"));
    }

    #[test]
    fn test_empty_list_allows_nothing() {
        let cors = Cors::new(Vec::new());
        assert!(!cors.allows("http://localhost:5173"));
    }
}
