#[tokio::main]
async fn main() {
    forum::start_server().await;
}
