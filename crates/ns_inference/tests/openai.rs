use ns_core::config::InferenceConfig;
use ns_core::{Article, Error, InferenceModel, Transcriber};
use ns_inference::models::OpenAiModel;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model(server: &MockServer) -> OpenAiModel {
    OpenAiModel::new(&InferenceConfig {
        api_key: Some("sk-test".to_string()),
        base_url: format!("{}/v1", server.uri()),
        ..Default::default()
    })
    .unwrap()
}

fn articles() -> Vec<Article> {
    vec![Article {
        title: "주식 433억".to_string(),
        link: "https://n.news.naver.com/mnews/article/003/0013553420".to_string(),
        text: "경기도에 사는 40대 A씨는 오래전 투자했던 비상장 주식의 존재를 잊고 지냈다.".to_string(),
    }]
}

#[tokio::test]
async fn test_analyze_sends_prompt_and_articles() {
    let server = MockServer::start().await;
    let user_turn = serde_json::to_string_pretty(&articles()).unwrap();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "세 줄로 요약해줘" },
                { "role": "user", "content": user_turn }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "요약 결과" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analysis = model(&server).analyze("세 줄로 요약해줘", &articles()).await.unwrap();
    assert_eq!(analysis, "요약 결과");
}

#[tokio::test]
async fn test_analyze_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = model(&server).analyze("prompt", &articles()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("429") && msg.contains("rate limited")));
}

#[tokio::test]
async fn test_analyze_without_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = model(&server).analyze("prompt", &articles()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_analyze_malformed_body_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = model(&server).analyze("prompt", &articles()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("Invalid response")));
}

#[tokio::test]
async fn test_analyze_unreachable_host_is_inference_error() {
    let model = OpenAiModel::new(&InferenceConfig {
        api_key: Some("sk-test".to_string()),
        base_url: "http://127.0.0.1:9/v1".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = model.analyze("prompt", &articles()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("request failed")));
}

#[tokio::test]
async fn test_transcribe_uploads_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("filename=\"voice.wav\""))
        .and(body_string_contains("RIFF-voice-sample"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": " 비상장 주식 \n" })))
        .expect(1)
        .mount(&server)
        .await;

    let text = model(&server)
        .transcribe(b"RIFF-voice-sample".to_vec(), "voice.wav")
        .await
        .unwrap();
    assert_eq!(text, "비상장 주식");
}

#[tokio::test]
async fn test_transcribe_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid file format"))
        .mount(&server)
        .await;

    let err = model(&server)
        .transcribe(b"not audio".to_vec(), "note.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(ref msg) if msg.contains("400") && msg.contains("Invalid file format")));

    let err = model(&server).transcribe(Vec::new(), "empty.wav").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
