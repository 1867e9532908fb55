use http::StatusCode;
use mini_web::Server;
use mini_web::router::{Router, get};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .route("/", get(|writer, _request| writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, b"hello world")))
        .build()
        .expect("router must build");

    let server = Server::builder().router(router).address("127.0.0.1:3000").build().expect("server must build");

    if let Err(e) = server.run() {
        eprintln!("server stopped: {e}");
    }
}
