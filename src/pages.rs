//! Minimal HTML shell for the browser routes. The client bundle renders the
//! actual page; the server only decides who may see it.

use axum::http::Uri;
use axum::response::Html;

/// Known route and its title. Anything else renders as the home page.
fn route_for(path: &str) -> (&'static str, &'static str) {
    match path {
        "/movies" => ("/movies", "Filmes"),
        "/series" => ("/series", "Séries"),
        "/my-list" => ("/my-list", "Minha lista"),
        "/search" => ("/search", "Buscar"),
        "/lancamentos" => ("/lancamentos", "Lançamentos"),
        "/auth/signin" => ("/auth/signin", "Entrar"),
        "/auth/signup" => ("/auth/signup", "Criar conta"),
        "/auth/error" => ("/auth/error", "Erro de autenticação"),
        _ => ("/", "Início"),
    }
}

pub async fn shell(uri: Uri) -> Html<String> {
    let (route, title) = route_for(uri.path());
    Html(format!(
        "<!doctype html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>StreamFlix | {}</title>\n</head>\n\
         <body><div id=\"root\" data-route=\"{}\"></div>\
         <script type=\"module\" src=\"/static/app.js\"></script></body>\n</html>\n",
        title, route
    ))
}
