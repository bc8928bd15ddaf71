use rocket::Route;

mod comments;
mod health;
mod properties;
mod votes;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(health::routes());
    routes.extend(properties::routes());
    routes.extend(votes::routes());
    routes.extend(comments::routes());
    routes
}
