#[derive(Debug)]
pub struct CrawlerResponse {
    pub body: String,
}
