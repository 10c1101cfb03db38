#[actix_web::main]
async fn main() -> std::io::Result<()> {
    gst_certificate_server::run().await
}
