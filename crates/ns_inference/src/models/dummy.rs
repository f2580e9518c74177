use std::fmt;
use ns_core::{Article, InferenceModel, Result};

/// Offline model: echoes a short digest of the articles instead of calling an API.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn analyze(&self, prompt: &str, articles: &[Article]) -> Result<String> {
        let mut lines = vec![format!("{} ({} articles)", prompt.trim(), articles.len())];
        for article in articles {
            // First 20 words of each body
            let words: Vec<&str> = article.text.split_whitespace().take(20).collect();
            lines.push(format!("- {}: {}", article.title, words.join(" ")));
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_analyze_is_deterministic() {
        let model = DummyModel::new();
        let articles = vec![Article {
            title: "주식 433억".to_string(),
            link: "https://n.news.naver.com/a".to_string(),
            text: "경기도에 사는 40대 A씨는 오래전 투자했던 비상장 주식의 존재를 잊고 지냈다.".to_string(),
        }];

        let first = model.analyze("요약해줘", &articles).await.unwrap();
        let second = model.analyze("요약해줘", &articles).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("요약해줘 (1 articles)"));
        assert!(first.contains("- 주식 433억: 경기도에"));
    }
}
