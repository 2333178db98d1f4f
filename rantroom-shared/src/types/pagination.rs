use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 10 }

impl PaginationParams {
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, 100)
    }

    /// Inclusive offset window for this page, `[(page-1)*limit, page*limit - 1]`.
    pub fn window(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.limit() - 1)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: default_per_page() }
    }
}
