#[tokio::main]
async fn main() {
    blog::start_server().await;
}
